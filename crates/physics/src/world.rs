use crate::shape::{CollisionGroup, ShapeDesc};
use glam::{Quat, Vec3};
use impulse_common::{FIXED_TIMESTEP, Transform};
use nalgebra::{Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;

/// Opaque handle to a rigid body owned by a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

/// Errors from body lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    /// The handle was not created by this world, or was already removed.
    /// Callers must only remove bodies they created here.
    #[error("rigid body is not tracked by this world")]
    UnknownBody,
}

/// Per-body creation options beyond mass/shape/groups.
#[derive(Debug, Clone, Copy)]
pub struct BodyOptions {
    /// Freeze all rotational motion (used by the player capsule, which
    /// applies yaw/pitch to the view matrix only).
    pub lock_rotations: bool,
    /// Whether the island manager may put the body to sleep.
    pub can_sleep: bool,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            lock_rotations: false,
            can_sleep: true,
        }
    }
}

/// Result of a successful ray cast: the closest matching body and the
/// world-space hit point.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub body: BodyHandle,
    pub point: Vec3,
}

struct TrackedBody {
    handle: RigidBodyHandle,
    group: CollisionGroup,
}

/// Central simulation owning all Rapier state.
///
/// Gravity is fixed at (0, -10, 0). Each [`step`](Self::step) advances the
/// world by exactly [`FIXED_TIMESTEP`] seconds.
pub struct PhysicsWorld {
    gravity: Vector<f32>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    /// Insertion-ordered list of live bodies, scanned by the AABB query.
    tracked: Vec<TrackedBody>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let integration_parameters = IntegrationParameters {
            dt: FIXED_TIMESTEP,
            ..Default::default()
        };

        Self {
            gravity: vector![0.0, -10.0, 0.0],
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            tracked: Vec::new(),
        }
    }

    /// Create a rigid body from a shape description.
    ///
    /// Mass 0 produces a fixed body; a positive mass produces a dynamic body
    /// with angular inertia derived from the shape. The body is registered
    /// under `group`/`mask` and added to the tracking list.
    pub fn create_body(
        &mut self,
        mass: f32,
        transform: Transform,
        shape: &ShapeDesc,
        group: CollisionGroup,
        mask: CollisionGroup,
    ) -> BodyHandle {
        self.create_body_with(mass, transform, shape, group, mask, BodyOptions::default())
    }

    pub fn create_body_with(
        &mut self,
        mass: f32,
        transform: Transform,
        shape: &ShapeDesc,
        group: CollisionGroup,
        mask: CollisionGroup,
        options: BodyOptions,
    ) -> BodyHandle {
        let pose = Isometry::from_parts(
            Translation3::from(to_na(transform.position)),
            quat_to_na(transform.rotation),
        );

        let mut builder = if mass > 0.0 {
            RigidBodyBuilder::dynamic()
        } else {
            RigidBodyBuilder::fixed()
        };
        builder = builder.pose(pose).can_sleep(options.can_sleep);
        if options.lock_rotations {
            builder = builder.locked_axes(LockedAxes::ROTATION_LOCKED);
        }

        let handle = self.bodies.insert(builder.build());

        let mut collider = collider_for(shape).collision_groups(InteractionGroups::new(
            Group::from_bits_truncate(group.0),
            Group::from_bits_truncate(mask.0),
            InteractionTestMode::And,
        ));
        if mass > 0.0 {
            collider = collider.mass(mass);
        }
        self.colliders
            .insert_with_parent(collider.build(), handle, &mut self.bodies);

        self.tracked.push(TrackedBody { handle, group });
        tracing::debug!(?group, mass, tracked = self.tracked.len(), "body created");

        BodyHandle(handle)
    }

    /// Remove a body created through this world.
    ///
    /// The caller still owns the [`ShapeDesc`] and drops it afterwards;
    /// passing a handle this world does not track is a logic error.
    pub fn remove_body(&mut self, body: BodyHandle) -> Result<(), PhysicsError> {
        let index = self
            .tracked
            .iter()
            .position(|t| t.handle == body.0)
            .ok_or(PhysicsError::UnknownBody)?;
        self.tracked.remove(index);

        self.bodies.remove(
            body.0,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        tracing::debug!(tracked = self.tracked.len(), "body removed");
        Ok(())
    }

    /// Advance the simulation by exactly one fixed timestep.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Cast a ray from `origin` to `target` and return the closest hit among
    /// bodies whose collision groups intersect `filter_group`/`filter_mask`.
    ///
    /// Finding nothing is a normal `None`, not an error. Query acceleration
    /// structures reflect the most recent [`step`](Self::step).
    pub fn ray_cast(
        &self,
        origin: Vec3,
        target: Vec3,
        filter_group: CollisionGroup,
        filter_mask: CollisionGroup,
    ) -> Option<RayHit> {
        let delta = target - origin;
        let max_toi = delta.length();
        if max_toi <= f32::EPSILON {
            return None;
        }
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            to_na(delta / max_toi),
        );

        let filter = QueryFilter::default().groups(InteractionGroups::new(
            Group::from_bits_truncate(filter_group.0),
            Group::from_bits_truncate(filter_mask.0),
            InteractionTestMode::And,
        ));
        let query = self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        );

        let (collider, hit) = query.cast_ray_and_get_normal(&ray, max_toi, true)?;
        let body = self.colliders.get(collider)?.parent()?;
        let point = ray.point_at(hit.time_of_impact);
        Some(RayHit {
            body: BodyHandle(body),
            point: Vec3::new(point.x, point.y, point.z),
        })
    }

    /// Return every tracked body whose center of mass lies inside the
    /// axis-aligned box `[min, max]` AND whose collision group equals
    /// `group` exactly.
    ///
    /// This is a linear scan with equality filtering, not a broad-phase
    /// query with mask semantics; see the crate docs.
    pub fn bodies_in_box(&self, min: Vec3, max: Vec3, group: CollisionGroup) -> Vec<BodyHandle> {
        self.tracked
            .iter()
            .filter(|t| t.group == group)
            .filter(|t| {
                self.bodies
                    .get(t.handle)
                    .map(|b| point_in_aabb(min, max, to_glam(b.translation())))
                    .unwrap_or(false)
            })
            .map(|t| BodyHandle(t.handle))
            .collect()
    }

    /// Number of live bodies in the tracking list.
    pub fn body_count(&self) -> usize {
        self.tracked.len()
    }

    pub fn contains(&self, body: BodyHandle) -> bool {
        self.tracked.iter().any(|t| t.handle == body.0)
    }

    /// Current world transform of a body.
    pub fn body_transform(&self, body: BodyHandle) -> Option<Transform> {
        let b = self.bodies.get(body.0)?;
        Some(Transform {
            position: to_glam(b.translation()),
            rotation: quat_to_glam(b.rotation()),
        })
    }

    /// Center-of-mass position of a body.
    pub fn body_position(&self, body: BodyHandle) -> Option<Vec3> {
        self.bodies.get(body.0).map(|b| to_glam(b.translation()))
    }

    pub fn linear_velocity(&self, body: BodyHandle) -> Option<Vec3> {
        self.bodies.get(body.0).map(|b| to_glam(b.linvel()))
    }

    /// Overwrite a body's linear velocity and wake it.
    pub fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3) {
        if let Some(b) = self.bodies.get_mut(body.0) {
            b.set_linvel(to_na(velocity), true);
        }
    }

    /// Overwrite both velocity components and wake the body (scene reset).
    pub fn set_velocities(&mut self, body: BodyHandle, linear: Vec3, angular: Vec3) {
        if let Some(b) = self.bodies.get_mut(body.0) {
            b.set_linvel(to_na(linear), true);
            b.set_angvel(to_na(angular), true);
        }
    }

    /// Teleport a body to a new pose, bypassing the solver, and wake it.
    /// Used by the grab hold and the scene reset.
    pub fn set_body_pose(&mut self, body: BodyHandle, transform: Transform) {
        if let Some(b) = self.bodies.get_mut(body.0) {
            b.set_translation(to_na(transform.position), true);
            b.set_rotation(quat_to_na(transform.rotation), true);
        }
    }

    pub fn wake(&mut self, body: BodyHandle) {
        if let Some(b) = self.bodies.get_mut(body.0) {
            b.wake_up(true);
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

fn collider_for(shape: &ShapeDesc) -> ColliderBuilder {
    match *shape {
        ShapeDesc::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
        ShapeDesc::Ball { radius } => ColliderBuilder::ball(radius),
        ShapeDesc::CapsuleY { radius, height } => ColliderBuilder::capsule_y(height * 0.5, radius),
        ShapeDesc::HalfSpace { normal, offset } => {
            let unit_n = UnitVector::new_normalize(to_na(normal));
            ColliderBuilder::new(SharedShape::new(HalfSpace::new(unit_n)))
                .translation(unit_n.into_inner() * offset)
        }
    }
}

fn point_in_aabb(min: Vec3, max: Vec3, point: Vec3) -> bool {
    min.x <= point.x
        && min.y <= point.y
        && min.z <= point.z
        && max.x >= point.x
        && max.y >= point.y
        && max.z >= point.z
}

fn to_na(v: Vec3) -> Vector<f32> {
    vector![v.x, v.y, v.z]
}

fn to_glam(v: &Vector<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn quat_to_na(q: Quat) -> UnitQuaternion<f32> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

fn quat_to_glam(q: &UnitQuaternion<f32>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground_plane(world: &mut PhysicsWorld) -> (BodyHandle, ShapeDesc) {
        let shape = ShapeDesc::HalfSpace {
            normal: Vec3::Y,
            offset: 0.0,
        };
        let body = world.create_body(
            0.0,
            Transform::default(),
            &shape,
            CollisionGroup::GROUND,
            CollisionGroup::ALL,
        );
        (body, shape)
    }

    fn unit_box(world: &mut PhysicsWorld, position: Vec3, group: CollisionGroup) -> BodyHandle {
        let shape = ShapeDesc::Cuboid {
            half_extents: Vec3::ONE,
        };
        world.create_body(
            1.0,
            Transform::from_position(position),
            &shape,
            group,
            CollisionGroup::ALL,
        )
    }

    #[test]
    fn static_bodies_never_move() {
        let mut world = PhysicsWorld::new();
        let shape = ShapeDesc::Cuboid {
            half_extents: Vec3::ONE,
        };
        let body = world.create_body(
            0.0,
            Transform::from_position(Vec3::new(3.0, 5.0, -2.0)),
            &shape,
            CollisionGroup::GROUND,
            CollisionGroup::ALL,
        );

        let before = world.body_transform(body).unwrap();
        for _ in 0..120 {
            world.step();
        }
        let after = world.body_transform(body).unwrap();
        assert_eq!(before.position, after.position);
        assert_eq!(before.rotation, after.rotation);
    }

    #[test]
    fn falling_body_accelerates_downward() {
        let mut world = PhysicsWorld::new();
        let body = unit_box(&mut world, Vec3::new(0.0, 500.0, 0.0), CollisionGroup::OBJECT);

        let mut previous = 0.0;
        for _ in 0..30 {
            world.step();
            let vy = world.linear_velocity(body).unwrap().y;
            assert!(vy < previous, "downward speed must keep growing");
            previous = vy;
        }
    }

    #[test]
    fn dropped_box_settles_on_plane_at_half_extent() {
        let mut world = PhysicsWorld::new();
        let _floor = ground_plane(&mut world);
        let body = unit_box(&mut world, Vec3::new(0.0, 50.0, 0.0), CollisionGroup::OBJECT);

        for _ in 0..900 {
            world.step();
        }

        let position = world.body_position(body).unwrap();
        assert!(
            (position.y - 1.0).abs() < 0.05,
            "box should rest at its half-extent, got y = {}",
            position.y
        );
        let velocity = world.linear_velocity(body).unwrap();
        assert!(velocity.length() < 0.05, "resting velocity, got {velocity:?}");
    }

    #[test]
    fn ray_cast_returns_closest_filtered_hit() {
        let mut world = PhysicsWorld::new();
        let near = unit_box(&mut world, Vec3::new(5.0, 500.0, 0.0), CollisionGroup::OBJECT);
        let _far = unit_box(&mut world, Vec3::new(10.0, 500.0, 0.0), CollisionGroup::OBJECT);
        world.step();

        let origin = Vec3::new(0.0, world.body_position(near).unwrap().y, 0.0);
        let hit = world
            .ray_cast(
                origin,
                origin + Vec3::X * 50.0,
                CollisionGroup::OBJECT,
                CollisionGroup::OBJECT,
            )
            .expect("ray should hit the near box");
        assert_eq!(hit.body, near);
        assert!((hit.point.x - (world.body_position(near).unwrap().x - 1.0)).abs() < 0.05);
    }

    #[test]
    fn ray_cast_ignores_other_groups() {
        let mut world = PhysicsWorld::new();
        let shape = ShapeDesc::CapsuleY {
            radius: 1.0,
            height: 2.0,
        };
        // A camera-group capsule sits between the origin and the object.
        let _camera = world.create_body(
            1.0,
            Transform::from_position(Vec3::new(3.0, 500.0, 0.0)),
            &shape,
            CollisionGroup::CAMERA,
            CollisionGroup::ALL,
        );
        let target = unit_box(&mut world, Vec3::new(8.0, 500.0, 0.0), CollisionGroup::OBJECT);
        world.step();

        let y = world.body_position(target).unwrap().y;
        let hit = world
            .ray_cast(
                Vec3::new(0.0, y, 0.0),
                Vec3::new(50.0, y, 0.0),
                CollisionGroup::OBJECT,
                CollisionGroup::OBJECT,
            )
            .expect("object-filtered ray should pass through the capsule");
        assert_eq!(hit.body, target);
    }

    #[test]
    fn ray_cast_miss_is_none() {
        let mut world = PhysicsWorld::new();
        let _body = unit_box(&mut world, Vec3::new(0.0, 500.0, 0.0), CollisionGroup::OBJECT);
        world.step();

        let hit = world.ray_cast(
            Vec3::new(100.0, 0.0, 0.0),
            Vec3::new(200.0, 0.0, 0.0),
            CollisionGroup::OBJECT,
            CollisionGroup::OBJECT,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn box_query_filters_by_group_equality() {
        let mut world = PhysicsWorld::new();
        let object = unit_box(&mut world, Vec3::new(1.0, 2.0, 1.0), CollisionGroup::OBJECT);
        // Same mask, overlapping position, different group: must be excluded
        // even though a bitmask test against ALL would admit it.
        let _camera = unit_box(&mut world, Vec3::new(-1.0, 2.0, -1.0), CollisionGroup::CAMERA);
        let _ground = unit_box(&mut world, Vec3::new(0.0, 2.0, 0.0), CollisionGroup::GROUND);

        let found = world.bodies_in_box(
            Vec3::splat(-10.0),
            Vec3::splat(10.0),
            CollisionGroup::OBJECT,
        );
        assert_eq!(found, vec![object]);
    }

    #[test]
    fn box_query_respects_bounds() {
        let mut world = PhysicsWorld::new();
        let inside = unit_box(&mut world, Vec3::new(0.0, 5.0, 0.0), CollisionGroup::OBJECT);
        let _outside = unit_box(&mut world, Vec3::new(50.0, 5.0, 0.0), CollisionGroup::OBJECT);

        let found = world.bodies_in_box(
            Vec3::new(-10.0, -10.0, -10.0),
            Vec3::new(10.0, 10.0, 10.0),
            CollisionGroup::OBJECT,
        );
        assert_eq!(found, vec![inside]);
    }

    #[test]
    fn create_remove_roundtrip_preserves_count() {
        let mut world = PhysicsWorld::new();
        let _keep = unit_box(&mut world, Vec3::ZERO, CollisionGroup::OBJECT);
        let baseline = world.body_count();

        for _ in 0..2 {
            let body = unit_box(&mut world, Vec3::new(0.0, 10.0, 0.0), CollisionGroup::OBJECT);
            assert_eq!(world.body_count(), baseline + 1);
            world.remove_body(body).unwrap();
        }
        assert_eq!(world.body_count(), baseline);
    }

    #[test]
    fn removing_unknown_body_is_an_error() {
        let mut world = PhysicsWorld::new();
        let body = unit_box(&mut world, Vec3::ZERO, CollisionGroup::OBJECT);
        assert!(world.contains(body));
        world.remove_body(body).unwrap();
        assert!(!world.contains(body));
        assert!(matches!(
            world.remove_body(body),
            Err(PhysicsError::UnknownBody)
        ));
    }

    #[test]
    fn locked_rotations_keep_orientation_under_contact() {
        let mut world = PhysicsWorld::new();
        let _floor = ground_plane(&mut world);
        let shape = ShapeDesc::CapsuleY {
            radius: 1.0,
            height: 2.0,
        };
        let body = world.create_body_with(
            1.0,
            Transform::from_position(Vec3::new(0.0, 5.0, 0.0)),
            &shape,
            CollisionGroup::CAMERA,
            CollisionGroup::ALL,
            BodyOptions {
                lock_rotations: true,
                can_sleep: false,
            },
        );

        for _ in 0..300 {
            world.step();
        }
        let rotation = world.body_transform(body).unwrap().rotation;
        assert!(rotation.abs_diff_eq(Quat::IDENTITY, 1.0e-4));
    }

    #[test]
    fn set_linear_velocity_wakes_and_applies() {
        let mut world = PhysicsWorld::new();
        let _floor = ground_plane(&mut world);
        let body = unit_box(&mut world, Vec3::new(0.0, 1.0, 0.0), CollisionGroup::OBJECT);
        for _ in 0..240 {
            world.step();
        }

        world.set_linear_velocity(body, Vec3::new(8.0, 0.0, 0.0));
        let before = world.body_position(body).unwrap();
        for _ in 0..30 {
            world.step();
        }
        let after = world.body_position(body).unwrap();
        assert!(after.x > before.x + 1.0, "body should have slid along +X");
    }
}
