//! Host physics: rapier3d world ownership, layered terrain colliders, and the
//! player's kinematic character body.
//!
//! Every collider carries its layer index in `user_data`, so scene queries
//! and the character controller can filter by [`LayerMask`](parallax_layers::LayerMask)
//! and by the [`LayerCollisionMatrix`](parallax_layers::LayerCollisionMatrix).

use bevy_ecs::prelude::*;
use parallax_config::PhysicsConfig;
use rapier3d::prelude::*;

mod character;
mod terrain;

pub use character::CharacterBody;
pub use terrain::{collider_layer, spawn_terrain};

/// Central physics simulation resource owning all Rapier state.
#[derive(Resource)]
pub struct PhysicsWorld {
    /// World-space gravity vector.
    pub gravity: Vector,
    /// Timestep and solver configuration.
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    /// Broad-phase collision detection (also provides the query pipeline).
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// Creates an empty world with vertical gravity `gravity_y` stepping by `dt`.
    pub fn new(gravity_y: f32, dt: f32) -> Self {
        let integration_parameters = IntegrationParameters {
            dt,
            ..Default::default()
        };

        Self {
            gravity: Vector::new(0.0, gravity_y, 0.0),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(config.gravity_y, config.fixed_dt)
    }

    /// Advances the simulation by one fixed timestep.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// The fixed timestep in seconds.
    pub fn dt(&self) -> f32 {
        self.integration_parameters.dt
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

/// ECS system that steps the physics simulation once per invocation.
pub fn physics_step_system(mut physics: ResMut<PhysicsWorld>) {
    physics.step();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_world_initializes() {
        let world = PhysicsWorld::default();
        assert_eq!(world.rigid_body_set.len(), 0);
        assert_eq!(world.collider_set.len(), 0);
        assert_eq!(world.gravity.y, -9.81);
        assert!((world.dt() - 0.02).abs() < f32::EPSILON);
    }

    #[test]
    fn test_step_advances_simulation() {
        let mut world = PhysicsWorld::default();
        let body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(0.0, 10.0, 0.0))
            .build();
        let handle = world.rigid_body_set.insert(body);
        let collider = ColliderBuilder::ball(0.5).build();
        world
            .collider_set
            .insert_with_parent(collider, handle, &mut world.rigid_body_set);

        for _ in 0..50 {
            world.step();
        }

        let pos = world.rigid_body_set[handle].translation();
        assert!(pos.y < 10.0, "Body should have fallen: y={}", pos.y);
    }

    #[test]
    fn test_step_system_runs_in_schedule() {
        let mut world = World::new();
        world.insert_resource(PhysicsWorld::default());
        let mut schedule = Schedule::default();
        schedule.add_systems(physics_step_system);
        schedule.run(&mut world);
        assert_eq!(world.resource::<PhysicsWorld>().collider_set.len(), 0);
    }
}
