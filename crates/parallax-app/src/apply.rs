//! The single place global host state changes.

use parallax_worlds::WorldCommand;
use tracing::trace;

use crate::resources::{FrameClock, HostState};

/// Applies switcher commands in order.
///
/// The time scale takes effect from the next frame's
/// [`begin_frame`](FrameClock::begin_frame).
pub fn apply_commands(
    state: &mut HostState,
    clock: &mut FrameClock,
    commands: impl IntoIterator<Item = WorldCommand>,
    trace_commands: bool,
) {
    for command in commands {
        if trace_commands {
            trace!(?command, "apply");
        }
        match command {
            WorldCommand::SetRigPosition(position) => state.rig_position = position,
            WorldCommand::SetCameraPose(pose) => state.camera = pose,
            WorldCommand::SetCullingMask(mask) => state.culling_mask = mask,
            WorldCommand::SetTintAlpha(alpha) => state.tint_alpha = alpha,
            WorldCommand::SetTimeScale(scale) => clock.time_scale = scale,
            WorldCommand::SetLayerCollision { a, b, enabled } => {
                state.collision.set(a, b, enabled);
            }
            WorldCommand::SetAnimatorSpeed { animator, speed } => {
                state.animator_speeds.insert(animator, speed);
            }
        }
    }
}
