//! Static terrain boxes tagged with their layer.

use parallax_layers::LayerId;
use rapier3d::prelude::*;

use crate::PhysicsWorld;

/// Spawns a fixed axis-aligned box on `layer`.
pub fn spawn_terrain(
    physics: &mut PhysicsWorld,
    center: glam::Vec3,
    half_extents: glam::Vec3,
    layer: LayerId,
) -> ColliderHandle {
    let body = RigidBodyBuilder::fixed()
        .translation(Vector::new(center.x, center.y, center.z))
        .build();
    let body_handle = physics.rigid_body_set.insert(body);
    let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        .user_data(layer.index() as u128)
        .build();
    physics
        .collider_set
        .insert_with_parent(collider, body_handle, &mut physics.rigid_body_set)
}

/// The layer a collider was tagged with. Untagged colliders read as layer 0.
pub fn collider_layer(collider: &Collider) -> Option<LayerId> {
    LayerId::new(collider.user_data as usize)
}
