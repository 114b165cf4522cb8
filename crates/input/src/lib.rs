//! Input model for the impulse sandbox.
//!
//! The window layer translates raw winit events into [`InputEvent`]s once at
//! the edge; everything downstream (player controller, frame driver) reads
//! the accumulated [`InputState`] and never sees backend types.
//!
//! # Invariants
//! - Release edges live for exactly one frame; `end_frame` clears them.
//! - Mouse motion accumulates between reads and resets when taken.

pub mod state;

pub use state::{InputEvent, InputState, Key, MouseButton};
