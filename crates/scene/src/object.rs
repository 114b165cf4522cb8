use crate::scatter::Scatter;
use glam::{Vec3, Vec4};
use impulse_common::Transform;
use impulse_physics::{BodyHandle, CollisionGroup, PhysicsError, PhysicsWorld, ShapeDesc};

/// Renderable geometry referenced by a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Plane,
    Cube,
    Sphere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Floor,
    Box,
    Sphere,
}

const DYNAMIC_MASS: f32 = 1.0;
const BOX_COUNT: usize = 32;
const SPHERE_COUNT: usize = 32;

const FLOOR_TINT: Vec4 = Vec4::new(0.0, 0.5, 0.0, 1.0);
const BOX_TINT: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
const SPHERE_TINT: Vec4 = Vec4::new(0.0, 0.0, 1.0, 1.0);

/// One rigid body bound to one owned collision shape and one mesh.
#[derive(Debug)]
pub struct SceneObject {
    pub kind: ObjectKind,
    pub body: BodyHandle,
    shape: ShapeDesc,
    pub mesh: MeshKind,
    pub tint: Vec4,
    /// Visual-only scale; the collision shape is never scaled.
    pub visual_scale: Vec3,
}

impl SceneObject {
    /// Static floor: infinite-plane collision, large plane mesh.
    pub fn floor(world: &mut PhysicsWorld) -> Self {
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
        Self {
            kind: ObjectKind::Floor,
            body,
            shape,
            mesh: MeshKind::Plane,
            tint: FLOOR_TINT,
            visual_scale: Vec3::new(20.0, 1.0, 20.0),
        }
    }

    /// Dynamic unit box.
    pub fn dynamic_box(world: &mut PhysicsWorld, placement: Transform) -> Self {
        let shape = ShapeDesc::Cuboid {
            half_extents: Vec3::ONE,
        };
        let body = world.create_body(
            DYNAMIC_MASS,
            placement,
            &shape,
            CollisionGroup::OBJECT,
            CollisionGroup::ALL,
        );
        Self {
            kind: ObjectKind::Box,
            body,
            shape,
            mesh: MeshKind::Cube,
            tint: BOX_TINT,
            visual_scale: Vec3::ONE,
        }
    }

    /// Dynamic sphere. Collision is approximated by a unit box, so spheres
    /// come to rest in cube-like orientations; see DESIGN.md.
    pub fn dynamic_sphere(world: &mut PhysicsWorld, placement: Transform) -> Self {
        let shape = ShapeDesc::Cuboid {
            half_extents: Vec3::ONE,
        };
        let body = world.create_body(
            DYNAMIC_MASS,
            placement,
            &shape,
            CollisionGroup::OBJECT,
            CollisionGroup::ALL,
        );
        Self {
            kind: ObjectKind::Sphere,
            body,
            shape,
            mesh: MeshKind::Sphere,
            tint: SPHERE_TINT,
            visual_scale: Vec3::ONE,
        }
    }

    /// Live world transform of the backing body. `None` only if the body
    /// was removed behind the object's back, which violates ownership.
    pub fn transform(&self, world: &PhysicsWorld) -> Option<Transform> {
        world.body_transform(self.body)
    }

    /// Remove the body, then release the shape (field drop order does the
    /// latter once the object is consumed).
    pub fn despawn(self, world: &mut PhysicsWorld) -> Result<(), PhysicsError> {
        world.remove_body(self.body)?;
        let _shape = self.shape;
        Ok(())
    }
}

/// The fixed demo population: one floor, 32 boxes, 32 spheres.
pub struct Scene {
    pub objects: Vec<SceneObject>,
    seed: u64,
    resets: u64,
}

impl Scene {
    pub fn populate(world: &mut PhysicsWorld, seed: u64) -> Self {
        let mut scatter = Scatter::new(seed);
        let mut objects = Vec::with_capacity(1 + BOX_COUNT + SPHERE_COUNT);

        objects.push(SceneObject::floor(world));
        for _ in 0..BOX_COUNT {
            objects.push(SceneObject::dynamic_box(world, scatter.box_placement()));
        }
        for _ in 0..SPHERE_COUNT {
            objects.push(SceneObject::dynamic_sphere(world, scatter.sphere_placement()));
        }

        tracing::info!(count = objects.len(), seed, "scene populated");
        Self {
            objects,
            seed,
            resets: 0,
        }
    }

    /// Re-scatter every dynamic body: velocities zeroed, pose teleported.
    /// Each reset draws a fresh layout from the seed lineage.
    pub fn reset(&mut self, world: &mut PhysicsWorld) {
        self.resets += 1;
        let mut scatter = Scatter::new(self.seed.wrapping_add(self.resets));

        for object in &self.objects {
            let placement = match object.kind {
                ObjectKind::Floor => continue,
                ObjectKind::Box => scatter.box_placement(),
                ObjectKind::Sphere => scatter.sphere_placement(),
            };
            world.set_velocities(object.body, Vec3::ZERO, Vec3::ZERO);
            world.set_body_pose(object.body, placement);
        }
        tracing::info!(reset = self.resets, "scene reset");
    }

    /// Tear everything down in reverse spawn order.
    pub fn clear(&mut self, world: &mut PhysicsWorld) -> Result<(), PhysicsError> {
        for object in self.objects.drain(..).rev() {
            object.despawn(world)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populate_spawns_full_demo_set() {
        let mut world = PhysicsWorld::new();
        let scene = Scene::populate(&mut world, 42);
        assert_eq!(scene.len(), 1 + BOX_COUNT + SPHERE_COUNT);
        assert_eq!(world.body_count(), scene.len());
    }

    #[test]
    fn populate_is_deterministic_per_seed() {
        let mut world_a = PhysicsWorld::new();
        let mut world_b = PhysicsWorld::new();
        let scene_a = Scene::populate(&mut world_a, 7);
        let scene_b = Scene::populate(&mut world_b, 7);

        for (a, b) in scene_a.objects.iter().zip(&scene_b.objects) {
            assert_eq!(
                a.transform(&world_a).unwrap(),
                b.transform(&world_b).unwrap()
            );
        }
    }

    #[test]
    fn floor_stays_put_while_bodies_fall() {
        let mut world = PhysicsWorld::new();
        let scene = Scene::populate(&mut world, 1);
        let floor_before = scene.objects[0].transform(&world).unwrap();
        let box_before = scene.objects[1].transform(&world).unwrap();

        for _ in 0..60 {
            world.step();
        }

        assert_eq!(scene.objects[0].transform(&world).unwrap(), floor_before);
        assert_ne!(scene.objects[1].transform(&world).unwrap(), box_before);
    }

    #[test]
    fn reset_rehomes_dynamics_with_zero_velocity() {
        let mut world = PhysicsWorld::new();
        let mut scene = Scene::populate(&mut world, 3);
        for _ in 0..300 {
            world.step();
        }

        scene.reset(&mut world);
        for object in scene.objects.iter().skip(1) {
            let position = object.transform(&world).unwrap().position;
            assert!(position.y >= 32.0, "reset should lift bodies, got {position:?}");
            assert_eq!(world.linear_velocity(object.body).unwrap(), Vec3::ZERO);
        }
    }

    #[test]
    fn clear_releases_every_body() {
        let mut world = PhysicsWorld::new();
        let mut scene = Scene::populate(&mut world, 5);
        scene.clear(&mut world).unwrap();
        assert!(scene.is_empty());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn sphere_objects_carry_box_collision() {
        let mut world = PhysicsWorld::new();
        let sphere = SceneObject::dynamic_sphere(
            &mut world,
            Transform::from_position(Vec3::new(0.0, 10.0, 0.0)),
        );
        assert_eq!(sphere.mesh, MeshKind::Sphere);
        assert!(matches!(sphere.shape, ShapeDesc::Cuboid { .. }));
    }
}
