//! Scene objects for the impulse sandbox.
//!
//! Each object binds exactly one rigid body to one owned collision shape and
//! one renderable mesh kind. The render transform is always read live from
//! the body; nothing is cached.
//!
//! # Invariants
//! - Teardown order: the body is removed from the world before the shape is
//!   dropped.
//! - The demo population is deterministic for a given seed.

pub mod object;
pub mod scatter;

pub use object::{MeshKind, ObjectKind, Scene, SceneObject};
