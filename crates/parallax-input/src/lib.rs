//! Input abstraction: physical keyboard state, smoothed virtual axes, and the
//! immutable per-frame [`InputSnapshot`] handed to the gameplay cores.

pub mod axis;
pub mod keyboard;
pub mod keycode;
pub mod snapshot;

pub use axis::{AxisSettings, VirtualAxis};
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use keycode::{InputError, parse_key_code};
pub use snapshot::{InputMapper, InputSnapshot};
