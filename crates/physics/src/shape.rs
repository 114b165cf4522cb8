use glam::Vec3;

/// Geometric description of a collision volume.
///
/// Owned by the scene object that created it; the shape outlives the body it
/// is attached to and is dropped only after the body has been removed from
/// the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeDesc {
    /// Axis-aligned box given by half-extents.
    Cuboid { half_extents: Vec3 },
    /// Sphere given by its radius.
    Ball { radius: f32 },
    /// Y-aligned capsule. `height` is the cylindrical section; the full
    /// capsule is `height + 2 * radius` tall.
    CapsuleY { radius: f32, height: f32 },
    /// Infinite plane: all points `p` with `dot(normal, p) <= offset`.
    HalfSpace { normal: Vec3, offset: f32 },
}

/// Collision group bitmask.
///
/// A body belongs to one group value and carries a mask of groups it may
/// interact with. Ray casts test group/mask intersection; the AABB body
/// query compares group values for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionGroup(pub u32);

impl CollisionGroup {
    pub const NONE: Self = Self(0);
    /// Pushable/pullable/grabbable scene bodies.
    pub const OBJECT: Self = Self(1 << 1);
    /// The player capsule.
    pub const CAMERA: Self = Self(1 << 2);
    /// The ground plane.
    pub const GROUND: Self = Self(1 << 3);
    pub const ALL: Self = Self(u32::MAX);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_are_distinct_bits() {
        assert_eq!(CollisionGroup::OBJECT.0 & CollisionGroup::CAMERA.0, 0);
        assert_eq!(CollisionGroup::OBJECT.0 & CollisionGroup::GROUND.0, 0);
        assert_eq!(CollisionGroup::CAMERA.0 & CollisionGroup::GROUND.0, 0);
    }

    #[test]
    fn all_mask_covers_every_group() {
        for g in [
            CollisionGroup::OBJECT,
            CollisionGroup::CAMERA,
            CollisionGroup::GROUND,
        ] {
            assert_ne!(CollisionGroup::ALL.0 & g.0, 0);
        }
    }
}
