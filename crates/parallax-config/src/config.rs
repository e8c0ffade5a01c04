//! Configuration structs with sensible defaults and RON persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level game configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Named layers in id order. A layer's id is its index in this list.
    pub layers: Vec<String>,
    /// Camera follow and world-transition settings.
    pub camera: CameraConfig,
    /// The rotary world list. World 0 is active at startup.
    pub worlds: Vec<WorldConfig>,
    /// Locomotion settings.
    pub player: PlayerConfig,
    /// Host physics and timestep settings.
    pub physics: PhysicsConfig,
    /// Input bindings.
    pub input: InputConfig,
    /// Obstacle containers and terrain placed in the headless host scene.
    pub scene: SceneConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Camera follow and transition settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Smoothing rate of the camera rig toward its follow target, per second.
    pub follow_speed: f32,
    /// Smoothing rate of the fade/time-dilation transition, per unscaled second.
    pub transition_speed: f32,
    /// Rig position at startup. The follow offset is measured from here.
    pub initial_rig_position: [f32; 3],
}

/// One entry of the rotary world list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Display name used in logs.
    pub name: String,
    /// Collision layer the world's geometry lives on.
    pub layer: String,
    /// Camera position while this world is active.
    pub camera_position: [f32; 3],
    /// Camera orientation while this world is active, as a quaternion `[x, y, z, w]`.
    pub camera_rotation: [f32; 4],
    /// Layers rendered while this world is active. Empty renders everything.
    pub culling_layers: Vec<String>,
    /// Scene container holding this world's animated obstacles.
    pub obstacles: String,
}

/// Locomotion settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Layer the player body lives on.
    pub layer: String,
    /// Horizontal speed in m/s at full axis deflection.
    pub speed: f32,
    /// Jump launch multiplier (launch speed = -gravity_y * jump_force * fixed_dt).
    pub jump_force: f32,
    /// Layers the anticipatory ground probe may hit.
    pub terrain_layers: Vec<String>,
    /// Capsule height in meters.
    pub body_height: f32,
    /// Capsule radius in meters.
    pub body_radius: f32,
    /// Radius of the ground-probe sphere.
    pub probe_radius: f32,
    /// Where the body starts.
    pub spawn_position: [f32; 3],
    /// Depth coordinate the body is pinned to after every step.
    pub depth_plane: f32,
}

/// Host physics and timestep settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical gravity in m/s² (negative is down).
    pub gravity_y: f32,
    /// Fixed simulation step in seconds.
    pub fixed_dt: f32,
    /// Longest frame delta accepted before clamping, in seconds.
    pub max_frame_time: f32,
    /// Upper bound on fixed steps run in a single frame.
    pub max_fixed_steps: u32,
}

/// Input bindings, by physical key name (winit `KeyCode` debug names).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Key that triggers a world switch.
    pub switch_key: String,
    /// Keys that push the horizontal axis toward -1.
    pub move_left: Vec<String>,
    /// Keys that push the horizontal axis toward +1.
    pub move_right: Vec<String>,
    /// Keys that drive the jump axis.
    pub jump: Vec<String>,
    /// Axis rise speed in units per second.
    pub axis_sensitivity: f32,
    /// Axis fall-back speed toward zero in units per second.
    pub axis_gravity: f32,
    /// Jump the smoothed value to zero when input reverses direction.
    pub axis_snap: bool,
    /// Smoothed values with magnitude below this read as zero.
    pub axis_dead: f32,
}

/// Static scene content for the headless host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Obstacle container name -> animator names found under it.
    pub obstacle_containers: BTreeMap<String, Vec<String>>,
    /// Static terrain boxes.
    pub terrain: Vec<TerrainConfig>,
}

/// A static axis-aligned terrain box.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Layer of the box's collider.
    pub layer: String,
    /// Box center.
    pub center: [f32; 3],
    /// Box half extents.
    pub half_extents: [f32; 3],
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log every command the world switcher emits at `trace` level.
    pub trace_commands: bool,
}

// --- Default implementations ---

impl Default for Config {
    fn default() -> Self {
        Self {
            layers: ["Default", "Player", "Terrain", "Dawn", "Dusk", "Night"]
                .into_iter()
                .map(String::from)
                .collect(),
            camera: CameraConfig::default(),
            worlds: vec![
                WorldConfig::named("Dawn", [0.0, 2.0, -12.0]),
                WorldConfig::named("Dusk", [0.0, 3.0, -14.0]),
                WorldConfig::named("Night", [0.0, 4.0, -16.0]),
            ],
            player: PlayerConfig::default(),
            physics: PhysicsConfig::default(),
            input: InputConfig::default(),
            scene: SceneConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            follow_speed: 6.0,
            transition_speed: 10.0,
            initial_rig_position: [0.0, 4.0, -10.0],
        }
    }
}

impl WorldConfig {
    fn named(name: &str, camera_position: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            layer: name.to_string(),
            camera_position,
            camera_rotation: [0.0, 0.0, 0.0, 1.0],
            culling_layers: vec![
                "Default".to_string(),
                "Player".to_string(),
                "Terrain".to_string(),
                name.to_string(),
            ],
            obstacles: format!("{name}Obstacles"),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            layer: "Default".to_string(),
            camera_position: [0.0, 0.0, -10.0],
            camera_rotation: [0.0, 0.0, 0.0, 1.0],
            culling_layers: Vec::new(),
            obstacles: String::new(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            layer: "Player".to_string(),
            speed: 5.0,
            jump_force: 15.0,
            terrain_layers: vec!["Terrain".to_string()],
            body_height: 2.0,
            body_radius: 0.5,
            probe_radius: 0.2,
            spawn_position: [0.0, 1.5, 0.0],
            depth_plane: 0.0,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_y: -9.81,
            fixed_dt: 0.02,
            max_frame_time: 0.25,
            max_fixed_steps: 10,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            switch_key: "KeyX".to_string(),
            move_left: vec!["KeyA".to_string(), "ArrowLeft".to_string()],
            move_right: vec!["KeyD".to_string(), "ArrowRight".to_string()],
            jump: vec!["Space".to_string()],
            axis_sensitivity: 3.0,
            axis_gravity: 3.0,
            axis_snap: true,
            axis_dead: 0.001,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        let mut obstacle_containers = BTreeMap::new();
        obstacle_containers.insert(
            "DawnObstacles".to_string(),
            vec!["dawn_saw".to_string(), "dawn_piston".to_string()],
        );
        obstacle_containers.insert(
            "DuskObstacles".to_string(),
            vec!["dusk_pendulum".to_string()],
        );
        obstacle_containers.insert(
            "NightObstacles".to_string(),
            vec![
                "night_crusher".to_string(),
                "night_spinner".to_string(),
                "night_lift".to_string(),
            ],
        );
        Self {
            obstacle_containers,
            terrain: vec![
                TerrainConfig::default(),
                TerrainConfig {
                    layer: "Dawn".to_string(),
                    center: [6.0, 1.0, 0.0],
                    half_extents: [1.5, 0.25, 2.0],
                },
                TerrainConfig {
                    layer: "Dusk".to_string(),
                    center: [10.0, 2.0, 0.0],
                    half_extents: [1.5, 0.25, 2.0],
                },
                TerrainConfig {
                    layer: "Night".to_string(),
                    center: [14.0, 3.0, 0.0],
                    half_extents: [1.5, 0.25, 2.0],
                },
            ],
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            layer: "Terrain".to_string(),
            center: [0.0, -0.5, 0.0],
            half_extents: [50.0, 0.5, 5.0],
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            trace_commands: false,
        }
    }
}

/// Platform config directory for Parallax, falling back to the working directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("parallax"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    ///
    /// The settings are startup-only; callers decide whether a changed config
    /// warrants a restart.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
