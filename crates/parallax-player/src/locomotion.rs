//! Fixed-step velocity integration.

use glam::{Vec2, Vec3};
use parallax_config::Config;
use parallax_layers::{LayerError, LayerMask, LayerRegistry};
use tracing::trace;

use crate::probe::GroundProbe;

/// A jump is refused while already rising at least this fast (m/s).
const MAX_JUMP_START_SPEED: f32 = 1.0;

/// Locomotion tunables.
#[derive(Clone, Debug, PartialEq)]
pub struct LocomotionSettings {
    /// Horizontal speed at full axis deflection, in m/s.
    pub speed: f32,
    /// Launch multiplier: launch speed is `-gravity_y * jump_force * dt`.
    pub jump_force: f32,
    /// Vertical gravity in m/s².
    pub gravity_y: f32,
    /// Layers the ground probe may hit.
    pub terrain_mask: LayerMask,
    pub body_height: f32,
    pub probe_radius: f32,
    /// Depth coordinate the body is kept on.
    pub depth_plane: f32,
}

impl LocomotionSettings {
    /// Reads the player and physics sections, resolving terrain layer names.
    pub fn from_config(config: &Config, registry: &LayerRegistry) -> Result<Self, LayerError> {
        Ok(Self {
            speed: config.player.speed,
            jump_force: config.player.jump_force,
            gravity_y: config.physics.gravity_y,
            terrain_mask: registry.mask_of(&config.player.terrain_layers)?,
            body_height: config.player.body_height,
            probe_radius: config.player.probe_radius,
            depth_plane: config.player.depth_plane,
        })
    }
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            speed: 5.0,
            jump_force: 15.0,
            gravity_y: -9.81,
            terrain_mask: LayerMask::ALL,
            body_height: 2.0,
            probe_radius: 0.2,
            depth_plane: 0.0,
        }
    }
}

/// Inputs for one fixed step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepContext {
    /// Fixed step duration in seconds.
    pub dt: f32,
    /// Smoothed horizontal axis in `[-1, 1]`.
    pub horizontal: f32,
    /// Raw jump axis.
    pub jump_raw: f32,
    /// The host's contact flag from the previous move.
    pub grounded: bool,
    /// Whether the [`GroundProbe`] hit anything this step.
    pub probe_hit: bool,
}

/// Movement requested from the host for one fixed step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveIntent {
    /// Displacement to attempt, before collision resolution.
    pub delta: Vec3,
    /// Depth the body's z is snapped to after moving.
    pub depth: f32,
}

/// Velocity integrator for a side-on character.
///
/// Horizontal velocity is set directly from input with no acceleration.
/// Vertical velocity accumulates gravity while airborne and resets to zero
/// on contact. A jump fires when the body is grounded or the probe sees
/// ground within reach, which forgives presses made just before landing.
#[derive(Clone, Debug)]
pub struct LocomotionController {
    settings: LocomotionSettings,
    velocity: Vec2,
}

impl LocomotionController {
    /// Starts with velocity equal to gravity, as if already falling.
    pub fn new(settings: LocomotionSettings) -> Self {
        let velocity = Vec2::new(0.0, settings.gravity_y);
        Self { settings, velocity }
    }

    /// The probe the host should run before each [`fixed_step`](Self::fixed_step).
    pub fn ground_probe(&self) -> GroundProbe {
        GroundProbe::new(
            self.settings.probe_radius,
            self.settings.body_height,
            self.settings.terrain_mask,
        )
    }

    /// Integrates one fixed step.
    pub fn fixed_step(&mut self, ctx: &StepContext) -> MoveIntent {
        if ctx.grounded {
            self.velocity.y = 0.0;
        } else {
            self.velocity.y += self.settings.gravity_y * ctx.dt;
        }

        self.velocity.x = ctx.horizontal * self.settings.speed;

        let grounded_soon = ctx.grounded || ctx.probe_hit;
        if grounded_soon && ctx.jump_raw > 0.0 && self.velocity.y < MAX_JUMP_START_SPEED {
            self.velocity.y = -self.settings.gravity_y * self.settings.jump_force * ctx.dt;
            trace!(vy = self.velocity.y, probe = ctx.probe_hit, "jump");
        }

        let step = self.velocity * ctx.dt;
        MoveIntent {
            delta: Vec3::new(step.x, step.y, 0.0),
            depth: self.settings.depth_plane,
        }
    }

    /// Current (horizontal, vertical) velocity in m/s.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn settings(&self) -> &LocomotionSettings {
        &self.settings
    }
}
