//! Vertex types shared between the terrain mesher and the renderer.

use bytemuck::{Pod, Zeroable};

/// Vertex for the scrolling background mesh.
///
/// The height sample doubles as the z coordinate and as the alpha channel, so
/// the terrain fades where it is low.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    /// RGBA. RGB is always full white.
    pub color: [f32; 4],
    pub tex_coords: [f32; 2],
}

impl TerrainVertex {
    pub fn new(position: [f32; 3], alpha: f32, tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            color: [1.0, 1.0, 1.0, alpha],
            tex_coords,
        }
    }

    pub fn alpha(&self) -> f32 {
        self.color[3]
    }
}

/// One terrain cell, drawn as a standalone 4-vertex triangle strip in the
/// order top-left, bottom-left, top-right, bottom-right.
pub type TerrainQuad = [TerrainVertex; 4];
