//! Scene registry for the headless host: obstacle animators by container and
//! layered terrain.

use std::collections::BTreeMap;

use parallax_config::SceneConfig;
use parallax_layers::LayerRegistry;
use parallax_physics::{PhysicsWorld, spawn_terrain};
use parallax_worlds::{AnimatorId, ObstacleScanner};
use tracing::{debug, trace, warn};

use crate::error::HostError;

/// Obstacle containers and the animators under them.
///
/// Animator ids are assigned in container order, then listing order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    containers: BTreeMap<String, Vec<AnimatorId>>,
    animator_names: Vec<String>,
}

impl Scene {
    pub fn from_config(config: &SceneConfig) -> Self {
        let mut scene = Self::default();
        for (container, animators) in &config.obstacle_containers {
            let ids = animators
                .iter()
                .map(|name| {
                    let id = AnimatorId(scene.animator_names.len() as u32);
                    scene.animator_names.push(name.clone());
                    id
                })
                .collect();
            scene.containers.insert(container.clone(), ids);
        }
        scene
    }

    /// Adds every terrain box to `physics`, tagged with its layer.
    pub fn spawn_terrain(
        config: &SceneConfig,
        registry: &LayerRegistry,
        physics: &mut PhysicsWorld,
    ) -> Result<usize, HostError> {
        for terrain in &config.terrain {
            let layer = registry.resolve(&terrain.layer)?;
            spawn_terrain(
                physics,
                glam::Vec3::from_array(terrain.center),
                glam::Vec3::from_array(terrain.half_extents),
                layer,
            );
        }
        debug!(boxes = config.terrain.len(), "terrain spawned");
        Ok(config.terrain.len())
    }

    pub fn animator_name(&self, id: AnimatorId) -> Option<&str> {
        self.animator_names.get(id.0 as usize).map(String::as_str)
    }

    pub fn animator_count(&self) -> usize {
        self.animator_names.len()
    }
}

impl ObstacleScanner for Scene {
    fn scan(&self, container: &str) -> Vec<AnimatorId> {
        match self.containers.get(container) {
            Some(ids) => {
                let names: Vec<&str> = ids
                    .iter()
                    .filter_map(|&id| self.animator_name(id))
                    .collect();
                trace!(container, animators = ?names, "obstacle container scanned");
                ids.clone()
            }
            None => {
                warn!(container, "obstacle container not found");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parallax_config::Config;

    #[test]
    fn test_default_scene_containers() {
        let scene = Scene::from_config(&SceneConfig::default());
        assert_eq!(scene.animator_count(), 6);

        let night = scene.scan("NightObstacles");
        assert_eq!(night.len(), 3);
        assert_eq!(scene.animator_name(night[0]), Some("night_crusher"));
        assert!(scene.scan("Attic").is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let scene = Scene::from_config(&SceneConfig::default());
        let mut all: Vec<_> = ["DawnObstacles", "DuskObstacles", "NightObstacles"]
            .iter()
            .flat_map(|c| scene.scan(c))
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn test_spawn_terrain_uses_registry() {
        let config = Config::default();
        let registry = LayerRegistry::new(&config.layers).unwrap();
        let mut physics = PhysicsWorld::default();
        let spawned = Scene::spawn_terrain(&config.scene, &registry, &mut physics).unwrap();
        assert_eq!(spawned, 4);
        assert_eq!(physics.collider_set.len(), 4);

        let mut bad = config.scene.clone();
        bad.terrain[0].layer = "Lava".to_string();
        assert!(Scene::spawn_terrain(&bad, &registry, &mut PhysicsWorld::default()).is_err());
    }
}
