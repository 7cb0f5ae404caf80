//! Tessellation of the height field into the background mesh.
//!
//! Every grid cell becomes its own 4-vertex triangle strip. Positions span a
//! unit square centered on the origin, shifted down by the scroll offset so
//! rows glide smoothly between shifts. The height sample is both the z
//! coordinate and the vertex alpha, which gives the wavy, fading look.
//!
//! The whole mesh reuses the four corners of a single texture region, so the
//! texture tiles once per cell instead of stretching across the grid.

use engine_core::{TerrainQuad, TerrainVertex, TextureRegion};

use crate::height_field::HeightField;

/// Builds the per-frame list of terrain quads. The quad buffer is kept
/// between frames to avoid reallocating.
#[derive(Debug, Default)]
pub struct TerrainMesher {
    quads: Vec<TerrainQuad>,
}

impl TerrainMesher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of quads a full build emits for `field`.
    pub fn quad_count(field: &HeightField) -> usize {
        (field.rows() - 1) * (field.cols() - 1)
    }

    /// Tessellate `field` at scroll `offset` (in `[0, 1)`).
    ///
    /// Cells come out row-major (y outer, x inner). Without a texture region
    /// nothing can be drawn, so the result is empty.
    pub fn build(
        &mut self,
        field: &HeightField,
        offset: f32,
        region: Option<&TextureRegion>,
    ) -> &[TerrainQuad] {
        self.quads.clear();
        let Some(region) = region else {
            return &self.quads;
        };

        let rows = field.rows();
        let cols = field.cols();
        let x_span = (cols - 1) as f32;
        let y_span = (rows - 2) as f32;
        self.quads.reserve(Self::quad_count(field));

        let corner = |x: usize, y: usize, u: f32, v: f32| {
            let h = field.at(y, x);
            let px = -0.5 + x as f32 / x_span;
            let py = -0.5 + (y as f32 - offset) / y_span;
            TerrainVertex::new([px, py, h], h, [u, v])
        };

        for y in 0..rows - 1 {
            for x in 0..cols - 1 {
                self.quads.push([
                    corner(x, y, region.left, region.top),
                    corner(x, y + 1, region.left, region.bottom),
                    corner(x + 1, y, region.right, region.top),
                    corner(x + 1, y + 1, region.right, region.bottom),
                ]);
            }
        }
        &self.quads
    }
}
