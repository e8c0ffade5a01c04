//! ECS resources shared by the host systems.

use std::collections::BTreeMap;

use bevy_ecs::prelude::*;
use glam::Vec3;
use parallax_input::{InputMapper, InputSnapshot, KeyboardState};
use parallax_layers::{LayerCollisionMatrix, LayerMask};
use parallax_physics::CharacterBody;
use parallax_player::LocomotionController;
use parallax_worlds::{AnimatorId, CameraPose, TransitionPhase, WorldSwitchController};

/// Per-frame timing. `delta` is scaled by `time_scale`; `unscaled_delta` is not.
#[derive(Resource, Debug, Clone)]
pub struct FrameClock {
    pub unscaled_delta: f32,
    pub delta: f32,
    /// Global simulation time scale. 1 is real time.
    pub time_scale: f32,
    pub elapsed: f64,
    pub unscaled_elapsed: f64,
    pub frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            unscaled_delta: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            elapsed: 0.0,
            unscaled_elapsed: 0.0,
            frame_count: 0,
        }
    }
}

impl FrameClock {
    /// Starts a frame of `unscaled_delta` seconds at the current time scale.
    pub fn begin_frame(&mut self, unscaled_delta: f32) {
        self.unscaled_delta = unscaled_delta;
        self.delta = unscaled_delta * self.time_scale;
        self.elapsed += f64::from(self.delta);
        self.unscaled_elapsed += f64::from(unscaled_delta);
        self.frame_count += 1;
    }
}

/// Fixed-step timing.
#[derive(Resource, Debug, Clone)]
pub struct FixedClock {
    pub fixed_dt: f32,
    /// Fixed steps run since startup.
    pub total_steps: u64,
}

impl FixedClock {
    pub fn new(fixed_dt: f32) -> Self {
        Self {
            fixed_dt,
            total_steps: 0,
        }
    }
}

/// Input bindings plus this frame's snapshot.
#[derive(Resource, Debug, Clone)]
pub struct InputRes {
    pub mapper: InputMapper,
    pub snapshot: InputSnapshot,
}

impl InputRes {
    pub fn new(mapper: InputMapper) -> Self {
        Self {
            mapper,
            snapshot: InputSnapshot::default(),
        }
    }

    /// Samples `keyboard` for this frame.
    pub fn capture(&mut self, keyboard: &KeyboardState, unscaled_delta: f32) {
        self.snapshot = self.mapper.update(keyboard, unscaled_delta);
    }
}

/// Global host state written only by [`apply_commands`](crate::apply_commands).
#[derive(Resource, Debug, Clone)]
pub struct HostState {
    pub rig_position: Vec3,
    pub camera: CameraPose,
    pub culling_mask: LayerMask,
    /// Transition tint overlay alpha.
    pub tint_alpha: f32,
    pub collision: LayerCollisionMatrix,
    pub animator_speeds: BTreeMap<AnimatorId, f32>,
}

impl Default for HostState {
    fn default() -> Self {
        Self {
            rig_position: Vec3::ZERO,
            camera: CameraPose::default(),
            culling_mask: LayerMask::ALL,
            tint_alpha: 0.0,
            collision: LayerCollisionMatrix::new(),
            animator_speeds: BTreeMap::new(),
        }
    }
}

/// Host tunables that are not owned by a core.
#[derive(Resource, Debug, Clone)]
pub struct HostSettings {
    pub max_frame_time: f32,
    pub max_fixed_steps: u32,
    /// Log every applied command at `trace`.
    pub trace_commands: bool,
}

#[derive(Resource, Debug)]
pub struct Switcher(pub WorldSwitchController);

#[derive(Resource, Debug)]
pub struct Locomotion(pub LocomotionController);

#[derive(Resource)]
pub struct PlayerBody(pub CharacterBody);

/// What the camera follows: the player body's position, refreshed after the
/// fixed steps of each frame.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct FollowTarget(pub Vec3);

/// The outcome of the latest switcher tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct LastSwitch {
    pub switched_to: Option<usize>,
    pub phase: TransitionPhase,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock_scales_delta() {
        let mut clock = FrameClock::default();
        clock.begin_frame(0.1);
        assert_eq!(clock.delta, 0.1);

        clock.time_scale = 0.5;
        clock.begin_frame(0.1);
        assert_eq!(clock.delta, 0.05);
        assert_eq!(clock.unscaled_delta, 0.1);
        assert_eq!(clock.frame_count, 2);
        assert!((clock.elapsed - 0.15).abs() < 1e-6);
        assert!((clock.unscaled_elapsed - 0.2).abs() < 1e-6);
    }
}
