//! The per-frame input snapshot consumed by the gameplay cores.

use parallax_config::InputConfig;
use tracing::debug;
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::axis::{AxisSettings, VirtualAxis};
use crate::keyboard::KeyboardState;
use crate::keycode::{InputError, parse_key_code, parse_key_codes};

/// Immutable view of the inputs the cores read in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    /// The switch key went down this frame.
    pub switch_pressed: bool,
    /// Smoothed horizontal axis in `[-1, 1]`.
    pub horizontal: f32,
    /// Unsmoothed horizontal axis (−1, 0, 1).
    pub horizontal_raw: f32,
    /// Unsmoothed jump axis (0 or 1).
    pub jump_raw: f32,
}

/// Turns keyboard state into [`InputSnapshot`]s using the configured bindings.
#[derive(Clone, Debug)]
pub struct InputMapper {
    switch_key: KeyCode,
    horizontal: VirtualAxis,
    jump: VirtualAxis,
}

impl InputMapper {
    /// Resolves the key names in `config`.
    pub fn from_config(config: &InputConfig) -> Result<Self, InputError> {
        let settings = AxisSettings {
            sensitivity: config.axis_sensitivity,
            gravity: config.axis_gravity,
            snap: config.axis_snap,
            dead: config.axis_dead,
        };
        let switch_key = parse_key_code(&config.switch_key)?;
        let left = parse_key_codes(&config.move_left)?;
        let right = parse_key_codes(&config.move_right)?;
        let jump = parse_key_codes(&config.jump)?;
        debug!(?switch_key, ?left, ?right, ?jump, "input bindings resolved");
        Ok(Self {
            switch_key,
            horizontal: VirtualAxis::new(left, right, settings),
            jump: VirtualAxis::new(Vec::new(), jump, settings),
        })
    }

    /// Advances axis smoothing by `dt` (unscaled seconds) and captures this
    /// frame's snapshot.
    pub fn update(&mut self, keyboard: &KeyboardState, dt: f32) -> InputSnapshot {
        self.horizontal.update(keyboard, dt);
        self.jump.update(keyboard, dt);
        InputSnapshot {
            switch_pressed: keyboard.just_pressed(PhysicalKey::Code(self.switch_key)),
            horizontal: self.horizontal.value(),
            horizontal_raw: self.horizontal.raw(keyboard),
            jump_raw: self.jump.raw(keyboard),
        }
    }

    /// The key bound to the world switch.
    pub fn switch_key(&self) -> KeyCode {
        self.switch_key
    }
}
