//! The world switch controller: camera follow plus the transition cycle.

use glam::Vec3;
use parallax_config::Config;
use parallax_layers::{LayerId, LayerRegistry};
use tracing::{debug, error, info, trace};

use crate::command::{CommandBuffer, WorldCommand};
use crate::error::WorldSwitchError;
use crate::transition::{StepOutcome, TransitionPhase, TransitionState, clamp01};
use crate::world::{ObstacleScanner, WorldDef, WorldObstacleCache};

/// Tunables of the controller.
#[derive(Clone, Debug, PartialEq)]
pub struct SwitcherSettings {
    /// Rig smoothing rate toward the follow target, per scaled second.
    pub follow_speed: f32,
    /// Transition smoothing rate, per unscaled second.
    pub transition_speed: f32,
    /// Layer of the player body. Collision between it and each world's
    /// layer is toggled on switch.
    pub player_layer: String,
}

impl SwitcherSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            follow_speed: config.camera.follow_speed,
            transition_speed: config.camera.transition_speed,
            player_layer: config.player.layer.clone(),
        }
    }
}

impl Default for SwitcherSettings {
    fn default() -> Self {
        Self {
            follow_speed: 6.0,
            transition_speed: 10.0,
            player_layer: "Player".to_string(),
        }
    }
}

/// Everything the controller reads in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameContext {
    /// Scaled frame delta in seconds.
    pub delta: f32,
    /// Unscaled frame delta in seconds. Drives the transition so a slowed
    /// time scale does not slow the fade itself.
    pub unscaled_delta: f32,
    /// Current position of the followed object.
    pub follow_target: Vec3,
    /// The switch key went down this frame.
    pub switch_pressed: bool,
}

/// Result of one [`WorldSwitchController::tick`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameOutput {
    /// Commands to apply, in order.
    pub commands: CommandBuffer,
    /// The world switched to during this frame, if any.
    pub switched_to: Option<usize>,
    /// Phase after the frame.
    pub phase: TransitionPhase,
}

/// Manages the rotary list of worlds and the transition between them.
///
/// Exactly one world is active at a time. Its layer collides with the player
/// and its obstacles animate; every other world's layer is ignored and its
/// obstacles are frozen. A switch is either instant ([`switch`](Self::switch))
/// or wrapped in a fade triggered through [`tick`](Self::tick). Only one
/// transition runs at a time; presses during a transition are ignored.
#[derive(Debug)]
pub struct WorldSwitchController {
    settings: SwitcherSettings,
    worlds: Vec<WorldDef>,
    world_layers: Vec<LayerId>,
    player_layer: LayerId,
    caches: Vec<WorldObstacleCache>,
    current: usize,
    follow_offset: Vec3,
    rig_position: Vec3,
    transition: TransitionState,
}

impl WorldSwitchController {
    /// Builds the controller and activates world 0.
    ///
    /// `rig_position` and `follow_target` are the initial positions; their
    /// difference is kept as the follow offset. Each world's obstacle cache is
    /// filled once, here, through `scanner`.
    ///
    /// Returns the controller together with the startup commands that put the
    /// host into world 0.
    pub fn new(
        settings: SwitcherSettings,
        worlds: Vec<WorldDef>,
        registry: &LayerRegistry,
        rig_position: Vec3,
        follow_target: Vec3,
        scanner: &dyn ObstacleScanner,
    ) -> Result<(Self, CommandBuffer), WorldSwitchError> {
        if worlds.is_empty() {
            return Err(WorldSwitchError::NoWorlds);
        }

        let resolve = |name: &str| {
            registry
                .name_to_layer(name)
                .ok_or_else(|| WorldSwitchError::UnknownLayer(name.to_string()))
        };
        let player_layer = resolve(&settings.player_layer)?;
        let world_layers = worlds
            .iter()
            .map(|w| resolve(&w.layer))
            .collect::<Result<Vec<_>, _>>()?;

        let caches: Vec<WorldObstacleCache> = worlds
            .iter()
            .map(|w| {
                let animators = scanner.scan(&w.obstacles);
                debug!(
                    world = %w.name,
                    container = %w.obstacles,
                    animators = animators.len(),
                    "cached world obstacles"
                );
                WorldObstacleCache::new(animators)
            })
            .collect();

        let mut controller = Self {
            settings,
            worlds,
            world_layers,
            player_layer,
            caches,
            current: 0,
            follow_offset: rig_position - follow_target,
            rig_position,
            transition: TransitionState::default(),
        };

        let mut startup = CommandBuffer::new();
        controller.activate(0, &mut startup);
        Ok((controller, startup))
    }

    /// Builds the worlds listed in `config` and then calls [`new`](Self::new).
    pub fn from_config(
        config: &Config,
        registry: &LayerRegistry,
        follow_target: Vec3,
        scanner: &dyn ObstacleScanner,
    ) -> Result<(Self, CommandBuffer), WorldSwitchError> {
        let worlds = config
            .worlds
            .iter()
            .map(|w| WorldDef::from_config(w, registry))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(
            SwitcherSettings::from_config(config),
            worlds,
            registry,
            Vec3::from_array(config.camera.initial_rig_position),
            follow_target,
            scanner,
        )
    }

    /// Advances one rendered frame: camera follow, transition trigger, and
    /// one transition step.
    pub fn tick(&mut self, ctx: &FrameContext) -> FrameOutput {
        let mut out = CommandBuffer::new();
        self.follow(ctx, &mut out);

        if ctx.switch_pressed {
            if self.transition.begin() {
                debug!(from = self.current, "world transition started");
            } else {
                trace!(phase = ?self.transition.phase, "switch ignored during transition");
            }
        }

        let t = clamp01(self.settings.transition_speed * ctx.unscaled_delta);
        let mut switched_to = None;
        match self.transition.phase {
            TransitionPhase::Idle => {}
            TransitionPhase::FadingOut | TransitionPhase::Switching => {
                if self.transition.phase == TransitionPhase::Switching
                    || self.transition.step_out(t, &mut out) == StepOutcome::NeedsSwitch
                {
                    switched_to = Some(self.switch_into(&mut out));
                    self.transition.step_in(t, &mut out);
                }
            }
            TransitionPhase::FadingIn => {
                if self.transition.step_in(t, &mut out) == StepOutcome::Finished {
                    debug!(world = self.current, "world transition finished");
                }
            }
        }

        FrameOutput {
            commands: out,
            switched_to,
            phase: self.transition.phase,
        }
    }

    /// Activates world `index`.
    ///
    /// Disables player collision with every world layer and freezes every
    /// world's obstacles, then re-enables both for the chosen world and moves
    /// the camera to it. An out-of-range index, or a call while a transition
    /// is running, changes nothing.
    pub fn set_world(&mut self, index: usize) -> Result<CommandBuffer, WorldSwitchError> {
        let count = self.worlds.len();
        if index >= count {
            error!(index, count, "world index out of range");
            return Err(WorldSwitchError::IndexOutOfRange { index, count });
        }
        if self.transition.is_active() {
            debug!(index, phase = ?self.transition.phase, "set_world refused during transition");
            return Err(WorldSwitchError::TransitionActive);
        }
        let mut out = CommandBuffer::new();
        self.activate(index, &mut out);
        Ok(out)
    }

    /// Instantly activates the next world, wrapping after the last.
    ///
    /// Does nothing while a transition is running; the transition performs
    /// its own switch.
    pub fn switch(&mut self) -> CommandBuffer {
        let mut out = CommandBuffer::new();
        if self.transition.is_active() {
            debug!(phase = ?self.transition.phase, "instant switch refused during transition");
            return out;
        }
        self.switch_into(&mut out);
        out
    }

    /// Restores neutral global state if a transition is mid-flight.
    ///
    /// The time scale and tint are process-wide on the host, so they must not
    /// outlive the controller in a dilated state.
    pub fn shutdown(&mut self) -> CommandBuffer {
        let mut out = CommandBuffer::new();
        if self.transition.is_active() {
            debug!(phase = ?self.transition.phase, "transition interrupted by shutdown");
            self.transition.finish(&mut out);
        }
        out
    }

    pub fn current_world(&self) -> usize {
        self.current
    }

    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    /// The active world's definition.
    pub fn world(&self) -> &WorldDef {
        &self.worlds[self.current]
    }

    pub fn transition_height(&self) -> f32 {
        self.transition.height
    }

    pub fn phase(&self) -> TransitionPhase {
        self.transition.phase
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_active()
    }

    pub fn obstacle_cache(&self, index: usize) -> Option<&WorldObstacleCache> {
        self.caches.get(index)
    }

    pub fn rig_position(&self) -> Vec3 {
        self.rig_position
    }

    fn follow(&mut self, ctx: &FrameContext, out: &mut CommandBuffer) {
        let mut target = ctx.follow_target + self.follow_offset;
        let h = self.transition.height;
        target.y *= h * h;
        let t = clamp01(self.settings.follow_speed * ctx.delta);
        self.rig_position = self.rig_position.lerp(target, t);
        out.push(WorldCommand::SetRigPosition(self.rig_position));
    }

    fn switch_into(&mut self, out: &mut CommandBuffer) -> usize {
        let next = (self.current + 1) % self.worlds.len();
        self.activate(next, out);
        next
    }

    /// `index` must be in range.
    fn activate(&mut self, index: usize, out: &mut CommandBuffer) {
        for (layer, cache) in self.world_layers.iter().zip(self.caches.iter_mut()) {
            out.push(WorldCommand::SetLayerCollision {
                a: self.player_layer,
                b: *layer,
                enabled: false,
            });
            set_speed(cache, 0.0, out);
        }

        out.push(WorldCommand::SetLayerCollision {
            a: self.player_layer,
            b: self.world_layers[index],
            enabled: true,
        });
        set_speed(&mut self.caches[index], 1.0, out);

        let world = &self.worlds[index];
        out.push(WorldCommand::SetCameraPose(world.camera));
        out.push(WorldCommand::SetCullingMask(world.culling_mask));
        self.current = index;
        info!(index, world = %world.name, "world activated");
    }
}

fn set_speed(cache: &mut WorldObstacleCache, speed: f32, out: &mut CommandBuffer) {
    cache.speed = speed;
    for &animator in &cache.animators {
        out.push(WorldCommand::SetAnimatorSpeed { animator, speed });
    }
}
