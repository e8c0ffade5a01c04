//! Command-line arguments shared by Parallax binaries.

use std::path::PathBuf;

use clap::Args;

use crate::Config;

/// Common command-line arguments.
///
/// CLI values override settings loaded from `config.ron`. Binaries embed this
/// with `#[command(flatten)]`.
#[derive(Args, Debug, Default)]
pub struct CliArgs {
    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Camera follow smoothing rate.
    #[arg(long)]
    pub follow_speed: Option<f32>,

    /// World transition smoothing rate.
    #[arg(long)]
    pub transition_speed: Option<f32>,

    /// Fixed simulation step in seconds.
    #[arg(long)]
    pub fixed_dt: Option<f32>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(speed) = args.follow_speed {
            self.camera.follow_speed = speed;
        }
        if let Some(speed) = args.transition_speed {
            self.camera.transition_speed = speed;
        }
        if let Some(dt) = args.fixed_dt {
            self.physics.fixed_dt = dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            log_level: Some("debug".to_string()),
            transition_speed: Some(4.0),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.debug.log_level, "debug");
        assert_eq!(config.camera.transition_speed, 4.0);
        // Non-overridden fields retain defaults
        assert_eq!(config.camera.follow_speed, 6.0);
        assert_eq!(config.physics.fixed_dt, 0.02);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }
}
