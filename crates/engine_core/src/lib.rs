//! Core engine types and utilities for SkyScroll.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Terrain vertex layout shared by the mesher and the renderer
//! - Texture handles and sub-rectangles
//! - Time management

pub mod texture;
pub mod time;
pub mod vertex;

pub use texture::*;
pub use time::*;
pub use vertex::*;

// Re-export commonly used types
pub use glam::{Mat4, Vec2, Vec3, Vec4};
