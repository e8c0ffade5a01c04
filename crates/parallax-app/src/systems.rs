//! Host systems.

use bevy_ecs::prelude::*;
use parallax_physics::PhysicsWorld;
use parallax_player::StepContext;
use parallax_worlds::FrameContext;

use crate::apply::apply_commands;
use crate::resources::{
    FixedClock, FollowTarget, FrameClock, HostSettings, HostState, InputRes, LastSwitch,
    Locomotion, PlayerBody, Switcher,
};

/// Ticks the world switcher once and applies what it emits.
pub fn world_switch_system(
    mut clock: ResMut<FrameClock>,
    input: Res<InputRes>,
    target: Res<FollowTarget>,
    settings: Res<HostSettings>,
    mut switcher: ResMut<Switcher>,
    mut state: ResMut<HostState>,
    mut last: ResMut<LastSwitch>,
) {
    let ctx = FrameContext {
        delta: clock.delta,
        unscaled_delta: clock.unscaled_delta,
        follow_target: target.0,
        switch_pressed: input.snapshot.switch_pressed,
    };
    let output = switcher.0.tick(&ctx);
    apply_commands(
        &mut state,
        &mut clock,
        output.commands,
        settings.trace_commands,
    );
    *last = LastSwitch {
        switched_to: output.switched_to,
        phase: output.phase,
    };
}

/// Probes the ground, integrates locomotion, and moves the player body.
pub fn locomotion_step_system(
    fixed: Res<FixedClock>,
    input: Res<InputRes>,
    state: Res<HostState>,
    mut locomotion: ResMut<Locomotion>,
    mut player: ResMut<PlayerBody>,
    mut physics: ResMut<PhysicsWorld>,
) {
    let probe = locomotion.0.ground_probe();
    let probe_hit = player.0.probe_ground(&physics, &probe);
    let ctx = StepContext {
        dt: fixed.fixed_dt,
        horizontal: input.snapshot.horizontal,
        jump_raw: input.snapshot.jump_raw,
        grounded: player.0.grounded(),
        probe_hit,
    };
    let intent = locomotion.0.fixed_step(&ctx);
    player
        .0
        .apply_move(&mut physics, &intent, &state.collision, fixed.fixed_dt);
}

/// Points the camera's follow target at the player body.
pub fn follow_target_system(
    physics: Res<PhysicsWorld>,
    player: Res<PlayerBody>,
    mut target: ResMut<FollowTarget>,
) {
    target.0 = player.0.position(&physics);
}
