//! Headless host: owns the ECS world, the physics scene, and the global state
//! the gameplay cores only describe through commands.
//!
//! One [`Host::frame`] captures input, ticks the world switcher and applies
//! its commands, runs the fixed steps owed on scaled time, then updates the
//! camera's follow target.

mod apply;
mod error;
mod host;
mod resources;
mod scene;
mod schedule;
mod systems;

pub use apply::apply_commands;
pub use error::HostError;
pub use host::{FrameReport, Host};
pub use resources::{
    FixedClock, FollowTarget, FrameClock, HostSettings, HostState, InputRes, LastSwitch,
    Locomotion, PlayerBody, Switcher,
};
pub use scene::Scene;
pub use schedule::{HostSchedules, HostStage};
