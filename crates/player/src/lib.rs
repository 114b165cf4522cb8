//! First-person physics camera for the impulse sandbox.
//!
//! The viewer is a dynamic capsule body; yaw/pitch never enter the physics
//! orientation and only shape the view matrix. Interactions map camera-space
//! aiming onto rigid-body selection: single-ray push/pull, area push/pull
//! around the player, and a grab that teleports the held body each fixed
//! tick.
//!
//! # Invariants
//! - The grabbed body is a non-owning reference; the camera never creates or
//!   destroys it, only repositions it while held.
//! - Interactions fire on release edges, never on presses.

pub mod camera;

pub use camera::{DebugRay, InteractionMode, PlayerCamera};
