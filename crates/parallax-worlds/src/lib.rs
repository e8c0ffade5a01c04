//! World switching: the rotary list of parallel worlds, the fade and
//! time-dilation transition between them, and camera follow.
//!
//! The [`WorldSwitchController`] never touches engine state directly. Every
//! effect (camera pose, culling mask, tint, time scale, layer collision,
//! obstacle animation) is emitted as a [`WorldCommand`] for the host to apply.

mod command;
mod controller;
mod error;
mod transition;
mod world;

pub use command::{CommandBuffer, WorldCommand};
pub use controller::{FrameContext, FrameOutput, SwitcherSettings, WorldSwitchController};
pub use error::WorldSwitchError;
pub use transition::{FADE_IN_EPSILON, FADE_OUT_EPSILON, TransitionPhase, TransitionState};
pub use world::{AnimatorId, CameraPose, ObstacleScanner, WorldDef, WorldObstacleCache};
