//! The player's kinematic capsule.
//!
//! Movement goes through Rapier's [`KinematicCharacterController`], skipping
//! colliders whose layer does not collide with the body's layer. After every
//! move the body is pinned back onto its depth plane.

use parallax_layers::{LayerCollisionMatrix, LayerId};
use parallax_player::{GroundProbe, MoveIntent};
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;
use tracing::trace;

use crate::PhysicsWorld;
use crate::terrain::collider_layer;

/// Player capsule: kinematic body, collider, and movement controller.
pub struct CharacterBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
    controller: KinematicCharacterController,
    half_height: f32,
    radius: f32,
    layer: LayerId,
    grounded: bool,
}

impl CharacterBody {
    /// Spawns a capsule `height` tall (caps included) centred on `position`.
    pub fn spawn(
        physics: &mut PhysicsWorld,
        position: glam::Vec3,
        height: f32,
        radius: f32,
        layer: LayerId,
    ) -> Self {
        let half_height = (height * 0.5 - radius).max(0.0);

        let body = RigidBodyBuilder::kinematic_position_based()
            .translation(Vector::new(position.x, position.y, position.z))
            .build();
        let body_handle = physics.rigid_body_set.insert(body);

        let collider = ColliderBuilder::capsule_y(half_height, radius)
            .friction(0.0)
            .user_data(layer.index() as u128)
            .build();
        let collider_handle =
            physics
                .collider_set
                .insert_with_parent(collider, body_handle, &mut physics.rigid_body_set);

        let controller = KinematicCharacterController {
            max_slope_climb_angle: std::f32::consts::FRAC_PI_4,
            min_slope_slide_angle: std::f32::consts::FRAC_PI_4,
            autostep: Some(CharacterAutostep {
                max_height: CharacterLength::Absolute(0.3),
                min_width: CharacterLength::Absolute(0.3),
                include_dynamic_bodies: false,
            }),
            snap_to_ground: Some(CharacterLength::Absolute(0.2)),
            offset: CharacterLength::Absolute(0.01),
            ..Default::default()
        };

        Self {
            body_handle,
            collider_handle,
            controller,
            half_height,
            radius,
            layer,
            grounded: false,
        }
    }

    /// Whether the last move ended in contact with ground.
    pub fn grounded(&self) -> bool {
        self.grounded
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn position(&self, physics: &PhysicsWorld) -> glam::Vec3 {
        let t = physics.rigid_body_set[self.body_handle].translation();
        glam::Vec3::new(t.x, t.y, t.z)
    }

    /// Sweeps the probe sphere straight down from the body's origin.
    ///
    /// Hits anywhere within `max_distance` of travel count. Only colliders on
    /// the probe's mask are considered; the collision matrix is not consulted.
    pub fn probe_ground(&self, physics: &PhysicsWorld, probe: &GroundProbe) -> bool {
        let mask = probe.mask;
        let on_mask =
            |_: ColliderHandle, c: &Collider| collider_layer(c).is_some_and(|l| mask.contains(l));
        let filter = QueryFilter::new()
            .exclude_rigid_body(self.body_handle)
            .predicate(&on_mask);
        let query_pipeline = physics.broad_phase.as_query_pipeline(
            physics.narrow_phase.query_dispatcher(),
            &physics.rigid_body_set,
            &physics.collider_set,
            filter,
        );

        let origin = physics.rigid_body_set[self.body_handle].translation();
        let options = ShapeCastOptions {
            max_time_of_impact: probe.max_distance,
            stop_at_penetration: false,
            ..Default::default()
        };
        query_pipeline
            .cast_shape(
                &Pose::from_translation(origin),
                Vector::new(0.0, -1.0, 0.0),
                &Ball::new(probe.radius),
                options,
            )
            .is_some()
    }

    /// Moves the body by `intent.delta`, resolving collisions against layers
    /// that collide with the body's layer, then pins z to `intent.depth`.
    ///
    /// The new position takes effect on the next [`PhysicsWorld::step`].
    pub fn apply_move(
        &mut self,
        physics: &mut PhysicsWorld,
        intent: &MoveIntent,
        matrix: &LayerCollisionMatrix,
        dt: f32,
    ) {
        let own_layer = self.layer;
        let collides = |_: ColliderHandle, c: &Collider| {
            collider_layer(c).is_some_and(|l| matrix.collides(own_layer, l))
        };
        let filter = QueryFilter::new()
            .exclude_rigid_body(self.body_handle)
            .predicate(&collides);
        let query_pipeline = physics.broad_phase.as_query_pipeline(
            physics.narrow_phase.query_dispatcher(),
            &physics.rigid_body_set,
            &physics.collider_set,
            filter,
        );

        let shape = Capsule::new_y(self.half_height, self.radius);
        let body_pos = physics.rigid_body_set[self.body_handle].position();
        let desired = Vector::new(intent.delta.x, intent.delta.y, intent.delta.z);

        let corrected = self.controller.move_shape(
            dt,
            &query_pipeline,
            &shape,
            body_pos,
            desired,
            |_| {},
        );

        let body = &mut physics.rigid_body_set[self.body_handle];
        let mut next = body.translation() + corrected.translation;
        next.z = intent.depth;
        body.set_next_kinematic_translation(next);

        if corrected.grounded != self.grounded {
            trace!(grounded = corrected.grounded, y = next.y, "ground contact changed");
        }
        self.grounded = corrected.grounded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn_terrain;
    use parallax_layers::LayerMask;

    const DT: f32 = 0.02;

    fn layer(i: usize) -> LayerId {
        LayerId::new(i).unwrap()
    }

    const PLAYER: usize = 1;
    const TERRAIN: usize = 2;
    const WORLD: usize = 3;

    fn floor(physics: &mut PhysicsWorld) {
        spawn_terrain(
            physics,
            glam::Vec3::new(0.0, -0.5, 0.0),
            glam::Vec3::new(50.0, 0.5, 5.0),
            layer(TERRAIN),
        );
    }

    fn falling(dy: f32) -> MoveIntent {
        MoveIntent {
            delta: glam::Vec3::new(0.0, dy, 0.0),
            depth: 0.0,
        }
    }

    fn step_n(
        body: &mut CharacterBody,
        physics: &mut PhysicsWorld,
        matrix: &LayerCollisionMatrix,
        intent: MoveIntent,
        n: usize,
    ) {
        for _ in 0..n {
            physics.step();
            body.apply_move(physics, &intent, matrix, DT);
            physics.step();
        }
    }

    #[test]
    fn test_body_lands_on_terrain() {
        let mut physics = PhysicsWorld::default();
        floor(&mut physics);
        let mut body = CharacterBody::spawn(
            &mut physics,
            glam::Vec3::new(0.0, 2.0, 0.0),
            2.0,
            0.5,
            layer(PLAYER),
        );
        let matrix = LayerCollisionMatrix::new();

        step_n(&mut body, &mut physics, &matrix, falling(-0.1), 60);

        let y = body.position(&physics).y;
        assert!((y - 1.0).abs() < 0.2, "body should rest near y=1, got {y}");
        assert!(body.grounded());
    }

    #[test]
    fn test_disabled_layer_pair_is_passed_through() {
        let mut physics = PhysicsWorld::default();
        spawn_terrain(
            &mut physics,
            glam::Vec3::new(0.0, -0.5, 0.0),
            glam::Vec3::new(50.0, 0.5, 5.0),
            layer(WORLD),
        );
        let mut body = CharacterBody::spawn(
            &mut physics,
            glam::Vec3::new(0.0, 2.0, 0.0),
            2.0,
            0.5,
            layer(PLAYER),
        );
        let mut matrix = LayerCollisionMatrix::new();
        matrix.set(layer(PLAYER), layer(WORLD), false);

        step_n(&mut body, &mut physics, &matrix, falling(-0.1), 60);

        let y = body.position(&physics).y;
        assert!(y < -1.0, "body should fall through, got {y}");
        assert!(!body.grounded());
    }

    #[test]
    fn test_depth_is_pinned_after_move() {
        let mut physics = PhysicsWorld::default();
        floor(&mut physics);
        let mut body = CharacterBody::spawn(
            &mut physics,
            glam::Vec3::new(0.0, 1.2, 0.7),
            2.0,
            0.5,
            layer(PLAYER),
        );
        let matrix = LayerCollisionMatrix::new();
        let intent = MoveIntent {
            delta: glam::Vec3::new(0.05, -0.05, 0.3),
            depth: 0.0,
        };

        step_n(&mut body, &mut physics, &matrix, intent, 5);
        assert_eq!(body.position(&physics).z, 0.0);
    }

    #[test]
    fn test_probe_respects_mask() {
        let mut physics = PhysicsWorld::default();
        floor(&mut physics);
        let mut body = CharacterBody::spawn(
            &mut physics,
            glam::Vec3::new(0.0, 2.0, 0.0),
            2.0,
            0.5,
            layer(PLAYER),
        );
        let matrix = LayerCollisionMatrix::new();
        step_n(&mut body, &mut physics, &matrix, falling(-0.1), 60);

        let terrain_probe = GroundProbe::new(0.2, 2.0, layer(TERRAIN).mask());
        assert!(body.probe_ground(&physics, &terrain_probe));

        let world_probe = GroundProbe::new(0.2, 2.0, layer(WORLD).mask());
        assert!(!body.probe_ground(&physics, &world_probe));
    }

    #[test]
    fn test_probe_reaches_below_feet() {
        let mut physics = PhysicsWorld::default();
        floor(&mut physics);
        // Origin 2.1 above the floor top: out of contact, but the sphere's
        // underside travels down to 2.2.
        let body = CharacterBody::spawn(
            &mut physics,
            glam::Vec3::new(0.0, 2.1, 0.0),
            2.0,
            0.5,
            layer(PLAYER),
        );
        physics.step();
        let probe = GroundProbe::new(0.2, 2.0, LayerMask::ALL);
        assert!(body.probe_ground(&physics, &probe));

        let high = CharacterBody::spawn(
            &mut physics,
            glam::Vec3::new(10.0, 2.3, 0.0),
            2.0,
            0.5,
            layer(PLAYER),
        );
        physics.step();
        assert!(!high.probe_ground(&physics, &probe));
    }

    /// Body at y=3 with a 0.2 sphere swept 2.2 down.
    fn body_over(physics: &mut PhysicsWorld) -> CharacterBody {
        let body = CharacterBody::spawn(
            physics,
            glam::Vec3::new(0.0, 3.0, 0.0),
            2.0,
            0.5,
            layer(PLAYER),
        );
        physics.step();
        body
    }

    #[test]
    fn test_probe_misses_ledge_beyond_sphere_rim() {
        let mut physics = PhysicsWorld::default();
        // Ledge edge at x=0.19, top 2.35 below the origin. The sphere touches
        // the edge only after 2.29 of travel.
        spawn_terrain(
            &mut physics,
            glam::Vec3::new(2.69, 0.15, 0.0),
            glam::Vec3::new(2.5, 0.5, 5.0),
            layer(TERRAIN),
        );
        let body = body_over(&mut physics);
        let probe = GroundProbe::new(0.2, 2.0, LayerMask::ALL);
        assert!(!body.probe_ground(&physics, &probe));
    }

    #[test]
    fn test_probe_sees_thin_post_off_axis() {
        let mut physics = PhysicsWorld::default();
        // Post spanning x in [0.06, 0.14], top 2.25 below the origin. The
        // sphere meets its near edge after about 2.06 of travel.
        spawn_terrain(
            &mut physics,
            glam::Vec3::new(0.10, -0.125, 0.0),
            glam::Vec3::new(0.04, 0.875, 0.04),
            layer(TERRAIN),
        );
        let body = body_over(&mut physics);
        let probe = GroundProbe::new(0.2, 2.0, LayerMask::ALL);
        assert!(body.probe_ground(&physics, &probe));
    }
}
