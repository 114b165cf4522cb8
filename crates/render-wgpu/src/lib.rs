//! wgpu render backend for the impulse sandbox.
//!
//! Draws the scene as instanced primitive meshes whose model matrices are
//! read live from the physics world every frame, an optional debug segment
//! for the last interaction ray, and a crosshair HUD quad.
//!
//! # Invariants
//! - The renderer never mutates physics or scene state.
//! - Mesh buffers are uploaded once; only the instance, uniform, and
//!   debug-line buffers are rewritten per frame.

pub mod gpu;
pub mod mesh;
pub mod shaders;
pub mod texture;

pub use gpu::SandboxRenderer;
pub use texture::{Texture, TextureError};
