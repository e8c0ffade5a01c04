//! Virtual axes driven by digital keys.
//!
//! A [`VirtualAxis`] turns a set of negative and positive keys into a value in
//! `[-1, 1]`. [`raw`](VirtualAxis::raw) reports the keys directly (−1, 0, 1);
//! [`value`](VirtualAxis::value) is smoothed: it rises toward the pressed
//! direction at `sensitivity` units per second and falls back to zero at
//! `gravity` units per second.

use winit::keyboard::KeyCode;

use crate::keyboard::KeyboardState;

/// Smoothing parameters of a [`VirtualAxis`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisSettings {
    /// Rise speed toward a pressed direction, in units per second.
    pub sensitivity: f32,
    /// Fall-back speed toward zero when nothing is pressed, in units per second.
    pub gravity: f32,
    /// When the pressed direction reverses, restart from zero instead of
    /// travelling back through it.
    pub snap: bool,
    /// Smoothed values with magnitude below this read as zero.
    pub dead: f32,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            sensitivity: 3.0,
            gravity: 3.0,
            snap: true,
            dead: 0.001,
        }
    }
}

/// A key-driven axis with raw and smoothed readings.
#[derive(Clone, Debug)]
pub struct VirtualAxis {
    negative: Vec<KeyCode>,
    positive: Vec<KeyCode>,
    settings: AxisSettings,
    value: f32,
}

impl VirtualAxis {
    /// Creates an axis at rest.
    pub fn new(negative: Vec<KeyCode>, positive: Vec<KeyCode>, settings: AxisSettings) -> Self {
        Self {
            negative,
            positive,
            settings,
            value: 0.0,
        }
    }

    /// The unsmoothed reading: −1, 0, or 1. Opposing keys cancel out.
    pub fn raw(&self, keyboard: &KeyboardState) -> f32 {
        let negative = keyboard.any_pressed(&self.negative);
        let positive = keyboard.any_pressed(&self.positive);
        match (negative, positive) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// Advances the smoothed value by `dt` seconds toward the raw reading.
    pub fn update(&mut self, keyboard: &KeyboardState, dt: f32) {
        let target = self.raw(keyboard);

        if target != 0.0 {
            if self.settings.snap && self.value * target < 0.0 {
                self.value = 0.0;
            }
            self.value = move_towards(self.value, target, self.settings.sensitivity * dt);
        } else {
            self.value = move_towards(self.value, 0.0, self.settings.gravity * dt);
        }
    }

    /// The smoothed reading in `[-1, 1]`, with the dead zone applied.
    pub fn value(&self) -> f32 {
        if self.value.abs() < self.settings.dead {
            0.0
        } else {
            self.value
        }
    }
}

fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}
