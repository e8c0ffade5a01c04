//! Side-on player locomotion: gravity, direct horizontal speed, and a jump
//! that may fire slightly before landing.
//!
//! [`LocomotionController`] owns only the velocity. Collision and the ground
//! probe are run by the host, which feeds the results back through
//! [`StepContext`] and applies the returned [`MoveIntent`].

mod locomotion;
mod probe;

pub use locomotion::{LocomotionController, LocomotionSettings, MoveIntent, StepContext};
pub use probe::GroundProbe;
