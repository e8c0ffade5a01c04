//! World definitions, obstacle caches, and the scene query used to fill them.

use glam::{Quat, Vec3};
use parallax_config::WorldConfig;
use parallax_layers::{LayerMask, LayerRegistry};

use crate::error::WorldSwitchError;

/// Camera position and orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Host handle of an obstacle animator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimatorId(pub u32);

/// One parallel world in the rotary list.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldDef {
    /// Display name, used in logs.
    pub name: String,
    /// Collision layer holding this world's geometry.
    pub layer: String,
    /// Where the active camera sits while this world is shown.
    pub camera: CameraPose,
    /// Layers rendered while this world is shown.
    pub culling_mask: LayerMask,
    /// Scene container whose animators are this world's obstacles.
    pub obstacles: String,
}

impl WorldDef {
    /// Builds a world from its config entry, resolving culling layer names.
    ///
    /// An empty culling list renders everything.
    pub fn from_config(
        config: &WorldConfig,
        registry: &LayerRegistry,
    ) -> Result<Self, WorldSwitchError> {
        let culling_mask = if config.culling_layers.is_empty() {
            LayerMask::ALL
        } else {
            let mut mask = LayerMask::NONE;
            for name in &config.culling_layers {
                let layer = registry
                    .name_to_layer(name)
                    .ok_or_else(|| WorldSwitchError::UnknownLayer(name.clone()))?;
                mask = mask.with(layer);
            }
            mask
        };

        Ok(Self {
            name: config.name.clone(),
            layer: config.layer.clone(),
            camera: CameraPose {
                position: Vec3::from_array(config.camera_position),
                rotation: Quat::from_array(config.camera_rotation).normalize(),
            },
            culling_mask,
            obstacles: config.obstacles.clone(),
        })
    }
}

/// The animators found under a world's obstacle container, and the speed
/// they were last set to.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldObstacleCache {
    pub animators: Vec<AnimatorId>,
    pub speed: f32,
}

impl WorldObstacleCache {
    pub fn new(animators: Vec<AnimatorId>) -> Self {
        Self {
            animators,
            speed: 1.0,
        }
    }

    /// Whether this world's obstacles are currently animating.
    pub fn is_animating(&self) -> bool {
        self.speed > 0.0
    }
}

/// Host scene query: the animators found under a named container.
///
/// Called once per world at startup. A missing container yields no animators.
pub trait ObstacleScanner {
    fn scan(&self, container: &str) -> Vec<AnimatorId>;
}

impl<F> ObstacleScanner for F
where
    F: Fn(&str) -> Vec<AnimatorId>,
{
    fn scan(&self, container: &str) -> Vec<AnimatorId> {
        self(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parallax_config::Config;

    fn registry() -> LayerRegistry {
        LayerRegistry::new(&Config::default().layers).unwrap()
    }

    #[test]
    fn test_from_config_resolves_culling_mask() {
        let registry = registry();
        let config = &Config::default().worlds[1];
        let world = WorldDef::from_config(config, &registry).unwrap();

        assert_eq!(world.name, "Dusk");
        let dusk = registry.name_to_layer("Dusk").unwrap();
        let dawn = registry.name_to_layer("Dawn").unwrap();
        assert!(world.culling_mask.contains(dusk));
        assert!(!world.culling_mask.contains(dawn));
    }

    #[test]
    fn test_empty_culling_list_renders_everything() {
        let config = WorldConfig {
            name: "Void".to_string(),
            ..WorldConfig::default()
        };
        let world = WorldDef::from_config(&config, &registry()).unwrap();
        assert_eq!(world.culling_mask, LayerMask::ALL);
    }

    #[test]
    fn test_unknown_culling_layer() {
        let config = WorldConfig {
            culling_layers: vec!["Limbo".to_string()],
            ..WorldConfig::default()
        };
        assert_eq!(
            WorldDef::from_config(&config, &registry()),
            Err(WorldSwitchError::UnknownLayer("Limbo".to_string()))
        );
    }

    #[test]
    fn test_closure_scanner() {
        let scanner = |container: &str| {
            if container == "Crates" {
                vec![AnimatorId(7)]
            } else {
                Vec::new()
            }
        };
        assert_eq!(scanner.scan("Crates"), vec![AnimatorId(7)]);
        assert!(scanner.scan("Missing").is_empty());
    }
}
