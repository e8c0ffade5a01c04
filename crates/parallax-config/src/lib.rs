//! Configuration system for Parallax.
//!
//! Startup settings for the world switcher, the locomotion controller, the
//! host physics, and input bindings, persisted to disk as RON. Supports CLI
//! overrides via clap, hot-reload detection, startup validation, and
//! forward/backward compatible serialization.

mod cli;
mod config;
mod error;
mod validate;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, InputConfig, PhysicsConfig, PlayerConfig, SceneConfig,
    TerrainConfig, WorldConfig, default_config_dir,
};
pub use error::ConfigError;
