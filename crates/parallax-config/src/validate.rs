//! Startup validation: turns misconfiguration into an explicit error before
//! anything runs.

use std::collections::HashSet;

use crate::Config;
use crate::error::ConfigError;

const MAX_LAYERS: usize = 32;

impl Config {
    /// Checks the invariants the runtime relies on.
    ///
    /// Fails on the first violation with [`ConfigError::Invalid`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layers.len() > MAX_LAYERS {
            return invalid(format!(
                "{} layers declared, at most {MAX_LAYERS} are supported",
                self.layers.len()
            ));
        }
        let mut layers = HashSet::new();
        for layer in &self.layers {
            if !layers.insert(layer.as_str()) {
                return invalid(format!("layer `{layer}` is declared twice"));
            }
        }
        let known = |name: &str, context: &str| -> Result<(), ConfigError> {
            if layers.contains(name) {
                Ok(())
            } else {
                invalid(format!("{context} refers to unknown layer `{name}`"))
            }
        };

        if self.worlds.is_empty() {
            return invalid("at least one world is required".to_string());
        }
        for world in &self.worlds {
            let context = format!("world `{}`", world.name);
            known(&world.layer, &context)?;
            for layer in &world.culling_layers {
                known(layer, &context)?;
            }
            if !self.scene.obstacle_containers.contains_key(&world.obstacles) {
                return invalid(format!(
                    "{context} uses obstacle container `{}` which is not in the scene",
                    world.obstacles
                ));
            }
            if world.camera_rotation.iter().all(|c| *c == 0.0) {
                return invalid(format!("{context} has a zero camera_rotation quaternion"));
            }
        }

        known(&self.player.layer, "player")?;
        for layer in &self.player.terrain_layers {
            known(layer, "player terrain mask")?;
        }
        for terrain in &self.scene.terrain {
            known(&terrain.layer, "terrain box")?;
        }

        positive(self.camera.transition_speed, "camera.transition_speed")?;
        non_negative(self.camera.follow_speed, "camera.follow_speed")?;
        non_negative(self.player.speed, "player.speed")?;
        non_negative(self.player.jump_force, "player.jump_force")?;
        positive(self.player.body_height, "player.body_height")?;
        positive(self.player.body_radius, "player.body_radius")?;
        positive(self.player.probe_radius, "player.probe_radius")?;
        if self.player.body_radius * 2.0 > self.player.body_height {
            return invalid(format!(
                "player.body_radius {} exceeds half of player.body_height {}",
                self.player.body_radius, self.player.body_height
            ));
        }
        if !(self.physics.gravity_y.is_finite() && self.physics.gravity_y < 0.0) {
            return invalid(format!(
                "physics.gravity_y must be negative, got {}",
                self.physics.gravity_y
            ));
        }
        positive(self.physics.fixed_dt, "physics.fixed_dt")?;
        positive(self.physics.max_frame_time, "physics.max_frame_time")?;
        if self.physics.max_fixed_steps == 0 {
            return invalid("physics.max_fixed_steps must be at least 1".to_string());
        }
        positive(self.input.axis_sensitivity, "input.axis_sensitivity")?;
        positive(self.input.axis_gravity, "input.axis_gravity")?;
        if self.input.switch_key.is_empty() {
            return invalid("input.switch_key must name a key".to_string());
        }

        Ok(())
    }
}

fn invalid(message: String) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid(message))
}

fn positive(value: f32, name: &str) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        invalid(format!("{name} must be positive, got {value}"))
    }
}

fn non_negative(value: f32, name: &str) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        invalid(format!("{name} must be non-negative, got {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(config: &Config) -> String {
        match config.validate() {
            Err(ConfigError::Invalid(message)) => message,
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_empty_world_list_rejected() {
        let mut config = Config::default();
        config.worlds.clear();
        assert!(message(&config).contains("at least one world"));
    }

    #[test]
    fn test_unknown_world_layer_rejected() {
        let mut config = Config::default();
        config.worlds[1].layer = "Twilight".to_string();
        let msg = message(&config);
        assert!(msg.contains("Dusk"), "{msg}");
        assert!(msg.contains("Twilight"), "{msg}");
    }

    #[test]
    fn test_duplicate_layer_rejected() {
        let mut config = Config::default();
        config.layers.push("Player".to_string());
        assert!(message(&config).contains("declared twice"));
    }

    #[test]
    fn test_missing_obstacle_container_rejected() {
        let mut config = Config::default();
        config.worlds[0].obstacles = "Nowhere".to_string();
        assert!(message(&config).contains("Nowhere"));
    }

    #[test]
    fn test_zero_transition_speed_rejected() {
        let mut config = Config::default();
        config.camera.transition_speed = 0.0;
        assert!(message(&config).contains("transition_speed"));
    }

    #[test]
    fn test_nan_fixed_dt_rejected() {
        let mut config = Config::default();
        config.physics.fixed_dt = f32::NAN;
        assert!(message(&config).contains("fixed_dt"));
    }

    #[test]
    fn test_unknown_terrain_layer_rejected() {
        let mut config = Config::default();
        config.player.terrain_layers.push("Lava".to_string());
        assert!(message(&config).contains("Lava"));
    }

    #[test]
    fn test_capsule_wider_than_tall_rejected() {
        let mut config = Config::default();
        config.player.body_radius = 1.2;
        assert!(message(&config).contains("body_radius"));

        config.player.body_radius = 1.0;
        config.validate().unwrap();
    }

    #[test]
    fn test_non_negative_gravity_rejected() {
        for gravity in [0.0, 9.81, f32::NAN] {
            let mut config = Config::default();
            config.physics.gravity_y = gravity;
            assert!(message(&config).contains("gravity_y"), "gravity {gravity}");
        }
    }

    #[test]
    fn test_non_positive_axis_rates_rejected() {
        let mut config = Config::default();
        config.input.axis_sensitivity = 0.0;
        assert!(message(&config).contains("axis_sensitivity"));

        let mut config = Config::default();
        config.input.axis_gravity = -3.0;
        assert!(message(&config).contains("axis_gravity"));
    }

    #[test]
    fn test_zero_camera_rotation_rejected() {
        let mut config = Config::default();
        config.worlds[2].camera_rotation = [0.0; 4];
        assert!(message(&config).contains("camera_rotation"));
    }
}
