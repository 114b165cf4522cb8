//! Rigid-body simulation for the impulse sandbox.
//!
//! Wraps the Rapier 3D physics engine behind a single [`PhysicsWorld`] that
//! owns all simulation state and mediates body creation, removal, and
//! querying.
//!
//! # Invariants
//! - Bodies are only ever created and removed through [`PhysicsWorld`];
//!   removing a handle the world does not track is a caller bug and is
//!   reported as [`PhysicsError::UnknownBody`].
//! - [`PhysicsWorld::step`] advances exactly one fixed timestep; wall-clock
//!   pacing is the frame driver's concern.
//! - Ray casts filter by group/mask intersection; the AABB body query
//!   filters by exact group equality. The asymmetry is deliberate.

pub mod shape;
pub mod world;

pub use shape::{CollisionGroup, ShapeDesc};
pub use world::{BodyHandle, BodyOptions, PhysicsError, PhysicsWorld, RayHit};
