//! Parallax headless runner.
//!
//! Loads `config.ron`, builds the host, and plays a scripted session: the
//! player spawns, optionally walks right, and the world switches on the
//! requested frames. Useful for checking transitions and tuning from logs.
//!
//! Run with: `cargo run -p parallax-game -- --switch-at 60 --switch-at 200`

mod script;

use std::process::ExitCode;

use clap::Parser;
use glam::Vec3;
use parallax_app::{Host, HostError};
use parallax_config::{CliArgs, Config, default_config_dir};
use parallax_input::KeyboardState;
use tracing::{error, info};

use crate::script::SessionScript;

/// CLI arguments for the runner.
#[derive(Parser, Debug)]
#[command(name = "parallax", about = "Parallax world-switching platformer (headless)")]
struct GameArgs {
    #[command(flatten)]
    cli: CliArgs,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Unscaled duration of each frame in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f32,

    /// Frame on which to press the switch key. Repeatable.
    #[arg(long = "switch-at")]
    switch_at: Vec<u64>,

    /// Frame on which to press jump. Repeatable.
    #[arg(long = "jump-at")]
    jump_at: Vec<u64>,

    /// Hold the move-right key for the whole session.
    #[arg(long)]
    walk: bool,
}

/// What a session did, for the closing log line.
struct SessionSummary {
    frames: u64,
    switches: usize,
    world: String,
    player: Vec3,
    /// Scaled seconds simulated. Falls behind `real_time` while transitions
    /// dilate time.
    sim_time: f64,
    real_time: f64,
    fixed_steps: u64,
}

fn main() -> ExitCode {
    let args = GameArgs::parse();

    let config_dir = args.cli.config.clone().unwrap_or_else(default_config_dir);
    let loaded = Config::load_or_create(&config_dir);
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    config.apply_cli_overrides(&args.cli);

    parallax_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );

    if let Err(err) = loaded {
        error!(dir = %config_dir.display(), "failed to load config: {err}");
        return ExitCode::FAILURE;
    }

    info!("Parallax headless session");
    info!(
        "Frames: {} x {:.1}ms | worlds: {} | switches scheduled: {}",
        args.frames,
        args.frame_dt * 1000.0,
        config.worlds.len(),
        args.switch_at.len()
    );

    match run(&config, &args) {
        Ok(summary) => {
            info!(
                frames = summary.frames,
                switches = summary.switches,
                world = %summary.world,
                sim_time = summary.sim_time,
                real_time = summary.real_time,
                fixed_steps = summary.fixed_steps,
                "session finished, player at ({:.2}, {:.2}, {:.2})",
                summary.player.x,
                summary.player.y,
                summary.player.z
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("session failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, args: &GameArgs) -> Result<SessionSummary, HostError> {
    let mut host = Host::new(config)?;
    let script = SessionScript::new(&config.input, &args.switch_at, &args.jump_at, args.walk)?;
    let mut keyboard = KeyboardState::new();
    let mut switches = 0;

    for frame in 0..args.frames {
        script.drive(frame, &mut keyboard);
        let report = host.frame(args.frame_dt, &keyboard);
        keyboard.clear_transients();

        if let Some(index) = report.switched_to {
            switches += 1;
            let name = config.worlds.get(index).map_or("?", |w| w.name.as_str());
            info!(frame, index, world = name, "switched world");
        }
    }

    host.shutdown();

    Ok(SessionSummary {
        frames: args.frames,
        switches,
        world: host.switcher().world().name.clone(),
        player: host.player_position(),
        sim_time: host.clock().elapsed,
        real_time: host.clock().unscaled_elapsed,
        fixed_steps: host.fixed_clock().total_steps,
    })
}
