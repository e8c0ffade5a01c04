//! The host: builds the ECS world from config and runs frames.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::IntoSystemConfigs;
use glam::Vec3;
use parallax_config::Config;
use parallax_input::{InputMapper, KeyboardState};
use parallax_layers::LayerRegistry;
use parallax_physics::{CharacterBody, PhysicsWorld, physics_step_system};
use parallax_player::{LocomotionController, LocomotionSettings};
use parallax_worlds::{TransitionPhase, WorldSwitchController};
use tracing::{info, warn};

use crate::apply::apply_commands;
use crate::error::HostError;
use crate::resources::{
    FixedClock, FollowTarget, FrameClock, HostSettings, HostState, InputRes, LastSwitch,
    Locomotion, PlayerBody, Switcher,
};
use crate::scene::Scene;
use crate::schedule::{HostSchedules, HostStage};
use crate::systems::{follow_target_system, locomotion_step_system, world_switch_system};

/// Summary of one [`Host::frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// World switched to this frame, if any.
    pub switched_to: Option<usize>,
    /// Transition phase after the frame.
    pub phase: TransitionPhase,
    /// Fixed steps run this frame.
    pub fixed_steps: u32,
    /// Time scale in effect for the next frame.
    pub time_scale: f32,
}

/// Headless host for the world switcher and the player.
pub struct Host {
    world: World,
    schedules: HostSchedules,
    registry: LayerRegistry,
    scene: Scene,
}

impl Host {
    /// Validates `config` and builds the world: layers, terrain, player body,
    /// both cores, and the startup world.
    pub fn new(config: &Config) -> Result<Self, HostError> {
        config.validate()?;

        let registry = LayerRegistry::new(&config.layers)?;
        let scene = Scene::from_config(&config.scene);

        let mut physics = PhysicsWorld::from_config(&config.physics);
        Scene::spawn_terrain(&config.scene, &registry, &mut physics)?;

        let spawn = Vec3::from_array(config.player.spawn_position);
        let body = CharacterBody::spawn(
            &mut physics,
            spawn,
            config.player.body_height,
            config.player.body_radius,
            registry.resolve(&config.player.layer)?,
        );
        // Register the scene with the broad phase before the first query.
        physics.step();

        let locomotion =
            LocomotionController::new(LocomotionSettings::from_config(config, &registry)?);
        let (switcher, startup) =
            WorldSwitchController::from_config(config, &registry, spawn, &scene)?;

        let mut state = HostState::default();
        let mut clock = FrameClock::default();
        apply_commands(&mut state, &mut clock, startup, config.debug.trace_commands);

        let mut world = World::new();
        world.insert_resource(clock);
        world.insert_resource(FixedClock::new(config.physics.fixed_dt));
        world.insert_resource(InputRes::new(InputMapper::from_config(&config.input)?));
        world.insert_resource(state);
        world.insert_resource(HostSettings {
            max_frame_time: config.physics.max_frame_time,
            max_fixed_steps: config.physics.max_fixed_steps,
            trace_commands: config.debug.trace_commands,
        });
        world.insert_resource(Switcher(switcher));
        world.insert_resource(Locomotion(locomotion));
        world.insert_resource(PlayerBody(body));
        world.insert_resource(physics);
        world.insert_resource(FollowTarget(spawn));
        world.insert_resource(LastSwitch::default());

        let mut schedules =
            HostSchedules::new(config.physics.fixed_dt, config.physics.max_fixed_steps);
        schedules.add_system(HostStage::Update, world_switch_system);
        schedules.add_system(
            HostStage::FixedUpdate,
            (locomotion_step_system, physics_step_system).chain(),
        );
        schedules.add_system(HostStage::PostUpdate, follow_target_system);
        schedules.initialize_all(&mut world);

        info!(
            worlds = config.worlds.len(),
            layers = registry.len(),
            animators = scene.animator_count(),
            "host ready"
        );

        Ok(Self {
            world,
            schedules,
            registry,
            scene,
        })
    }

    /// Runs one rendered frame of `unscaled_dt` seconds.
    ///
    /// Deltas longer than the configured maximum are clamped; negative ones
    /// are treated as zero.
    pub fn frame(&mut self, unscaled_dt: f32, keyboard: &KeyboardState) -> FrameReport {
        let max = self.world.resource::<HostSettings>().max_frame_time;
        let mut dt = unscaled_dt.max(0.0);
        if dt > max {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                dt * 1000.0,
                max * 1000.0
            );
            dt = max;
        }

        self.world.resource_mut::<FrameClock>().begin_frame(dt);
        self.world
            .resource_mut::<InputRes>()
            .capture(keyboard, dt);

        self.schedules.run_update(&mut self.world);

        let scaled = self.world.resource::<FrameClock>().delta;
        let fixed_steps = self.schedules.run_fixed(&mut self.world, scaled, |world| {
            world.resource_mut::<FixedClock>().total_steps += 1;
        });

        self.schedules.run_post_update(&mut self.world);

        let last = *self.world.resource::<LastSwitch>();
        FrameReport {
            switched_to: last.switched_to,
            phase: last.phase,
            fixed_steps,
            time_scale: self.world.resource::<FrameClock>().time_scale,
        }
    }

    /// Restores neutral global state if a transition is still running.
    pub fn shutdown(&mut self) {
        let commands = self.world.resource_mut::<Switcher>().0.shutdown();
        if commands.is_empty() {
            return;
        }
        let trace_commands = self.world.resource::<HostSettings>().trace_commands;
        self.world
            .resource_scope(|world, mut state: Mut<HostState>| {
                let mut clock = world.resource_mut::<FrameClock>();
                apply_commands(&mut state, &mut clock, commands, trace_commands);
            });
        info!("transition interrupted, host state restored");
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn state(&self) -> &HostState {
        self.world.resource::<HostState>()
    }

    pub fn clock(&self) -> &FrameClock {
        self.world.resource::<FrameClock>()
    }

    pub fn fixed_clock(&self) -> &FixedClock {
        self.world.resource::<FixedClock>()
    }

    pub fn switcher(&self) -> &WorldSwitchController {
        &self.world.resource::<Switcher>().0
    }

    pub fn locomotion(&self) -> &LocomotionController {
        &self.world.resource::<Locomotion>().0
    }

    pub fn player_position(&self) -> Vec3 {
        let physics = self.world.resource::<PhysicsWorld>();
        self.world.resource::<PlayerBody>().0.position(physics)
    }

    pub fn player_grounded(&self) -> bool {
        self.world.resource::<PlayerBody>().0.grounded()
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}

#[cfg(test)]
mod tests {
    use parallax_config::TerrainConfig;
    use winit::keyboard::KeyCode;

    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn run(host: &mut Host, keyboard: &mut KeyboardState, frames: usize) -> Vec<FrameReport> {
        (0..frames)
            .map(|_| {
                let report = host.frame(DT, keyboard);
                keyboard.clear_transients();
                report
            })
            .collect()
    }

    fn press(host: &mut Host, keyboard: &mut KeyboardState, key: KeyCode) -> FrameReport {
        keyboard.press(key);
        let report = host.frame(DT, keyboard);
        keyboard.clear_transients();
        keyboard.release(key);
        report
    }

    fn collides_with_world(host: &Host, index: usize) -> bool {
        let registry = host.registry();
        let player = registry.name_to_layer("Player").unwrap();
        let layer = registry
            .name_to_layer(["Dawn", "Dusk", "Night"][index])
            .unwrap();
        host.state().collision.collides(player, layer)
    }

    #[test]
    fn test_startup_activates_first_world() {
        let host = Host::new(&Config::default()).unwrap();
        assert_eq!(host.switcher().current_world(), 0);
        assert!(collides_with_world(&host, 0));
        assert!(!collides_with_world(&host, 1));
        assert!(!collides_with_world(&host, 2));
        assert_eq!(host.clock().time_scale, 1.0);
        assert_eq!(host.state().camera.position, Vec3::new(0.0, 2.0, -12.0));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = Config {
            worlds: Vec::new(),
            ..Config::default()
        };
        assert!(matches!(Host::new(&config), Err(HostError::Config(_))));
    }

    #[test]
    fn test_player_settles_on_ground() {
        let mut host = Host::new(&Config::default()).unwrap();
        let mut keyboard = KeyboardState::new();
        run(&mut host, &mut keyboard, 120);

        assert!(host.player_grounded());
        let y = host.player_position().y;
        assert!((y - 1.0).abs() < 0.2, "player should stand near y=1, got {y}");
        assert_eq!(host.player_position().z, 0.0);
    }

    #[test]
    fn test_full_transition_restores_time_scale() {
        let mut host = Host::new(&Config::default()).unwrap();
        let mut keyboard = KeyboardState::new();
        run(&mut host, &mut keyboard, 10);

        let first = press(&mut host, &mut keyboard, KeyCode::KeyX);
        assert_eq!(first.phase, TransitionPhase::FadingOut);

        let mut switched = Vec::new();
        let mut min_scale = f32::MAX;
        for _ in 0..300 {
            let report = host.frame(DT, &keyboard);
            keyboard.clear_transients();
            min_scale = min_scale.min(report.time_scale);
            switched.extend(report.switched_to);
            if report.phase == TransitionPhase::Idle {
                break;
            }
        }

        assert_eq!(switched, vec![1]);
        assert!(min_scale < 0.5);
        assert_eq!(host.clock().time_scale, 1.0);
        assert_eq!(host.state().tint_alpha, 0.0);
        assert!(collides_with_world(&host, 1));
        assert!(!collides_with_world(&host, 0));
    }

    #[test]
    fn test_dilated_time_runs_fewer_fixed_steps() {
        let mut host = Host::new(&Config::default()).unwrap();
        let mut keyboard = KeyboardState::new();
        let normal: u32 = run(&mut host, &mut keyboard, 30)
            .iter()
            .map(|r| r.fixed_steps)
            .sum();

        press(&mut host, &mut keyboard, KeyCode::KeyX);
        let dilated: u32 = run(&mut host, &mut keyboard, 30)
            .iter()
            .map(|r| r.fixed_steps)
            .sum();
        assert!(dilated < normal, "dilated {dilated} vs normal {normal}");
    }

    #[test]
    fn test_fixed_clock_counts_every_step() {
        let mut host = Host::new(&Config::default()).unwrap();
        let mut keyboard = KeyboardState::new();
        let before = host.fixed_clock().total_steps;
        let reported: u64 = run(&mut host, &mut keyboard, 20)
            .iter()
            .map(|r| u64::from(r.fixed_steps))
            .sum();
        assert!(reported > 0);
        assert_eq!(host.fixed_clock().total_steps - before, reported);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut host = Host::new(&Config::default()).unwrap();
        let keyboard = KeyboardState::new();
        let report = host.frame(5.0, &keyboard);
        assert!((host.clock().unscaled_delta - 0.25).abs() < 1e-6);
        assert!(report.fixed_steps <= 10);
    }

    #[test]
    fn test_switching_world_drops_platform() {
        let mut config = Config::default();
        config.scene.terrain = vec![TerrainConfig {
            layer: "Dawn".to_string(),
            center: [0.0, -0.5, 0.0],
            half_extents: [5.0, 0.5, 5.0],
        }];
        let mut host = Host::new(&config).unwrap();
        let mut keyboard = KeyboardState::new();

        run(&mut host, &mut keyboard, 90);
        assert!(host.player_grounded(), "should stand on the Dawn platform");
        let standing = host.player_position().y;

        press(&mut host, &mut keyboard, KeyCode::KeyX);
        run(&mut host, &mut keyboard, 120);
        assert_eq!(host.switcher().current_world(), 1);
        assert!(host.player_position().y < standing - 1.0);
    }

    #[test]
    fn test_walking_moves_along_x_only() {
        let mut host = Host::new(&Config::default()).unwrap();
        let mut keyboard = KeyboardState::new();
        run(&mut host, &mut keyboard, 60);
        let start = host.player_position();

        keyboard.press(KeyCode::KeyD);
        run(&mut host, &mut keyboard, 60);
        let end = host.player_position();
        assert!(end.x > start.x + 1.0);
        assert_eq!(end.z, 0.0);
    }

    #[test]
    fn test_camera_follows_player() {
        let mut host = Host::new(&Config::default()).unwrap();
        let mut keyboard = KeyboardState::new();
        keyboard.press(KeyCode::KeyD);
        run(&mut host, &mut keyboard, 120);
        assert!(host.state().rig_position.x > 1.0);
    }

    #[test]
    fn test_shutdown_mid_transition() {
        let mut host = Host::new(&Config::default()).unwrap();
        let mut keyboard = KeyboardState::new();
        press(&mut host, &mut keyboard, KeyCode::KeyX);
        run(&mut host, &mut keyboard, 5);
        assert!(host.clock().time_scale < 1.0);

        host.shutdown();
        assert_eq!(host.clock().time_scale, 1.0);
        assert_eq!(host.state().tint_alpha, 0.0);
        assert!(!host.switcher().is_transitioning());
    }
}
