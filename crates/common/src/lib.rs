//! Shared types for the impulse sandbox.
//!
//! # Invariants
//! - A body's render transform is always derived from its physics transform;
//!   `Transform` is the hand-off type between the two sides.
//! - The physics step length is a single constant shared by the simulation
//!   and the frame driver.

pub mod types;

pub use types::{FIXED_TIMESTEP, Transform, clamp_pitch_degrees, wrap_yaw_degrees};
