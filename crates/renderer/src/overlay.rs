//! Screen-space geometry for the 2D layer drawn over the background:
//! solid sprites and bitmap text.

use crate::font::{glyph_uv, GLYPH_PX_H, GLYPH_PX_W};
use crate::vertex::OverlayVertex;

/// Texture coordinate sentinel telling the shader to use the flat color.
const SOLID_UV: [f32; 2] = [-1.0, -1.0];

/// Unpack `0xAARRGGBB` into normalized RGBA.
pub fn argb(color: u32) -> [f32; 4] {
    let channel = |shift: u32| ((color >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), channel(24)]
}

/// Accumulates indexed quads in pixel coordinates and converts them to NDC.
/// `(0, 0)` is the top-left corner of the screen.
pub struct OverlayBuilder {
    pub vertices: Vec<OverlayVertex>,
    pub indices: Vec<u32>,
    screen_w: f32,
    screen_h: f32,
}

impl OverlayBuilder {
    pub fn new(screen_w: f32, screen_h: f32) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            screen_w,
            screen_h,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Convert pixel coords to NDC.
    fn px_to_ndc(&self, px: f32, py: f32) -> [f32; 2] {
        [
            (px / self.screen_w) * 2.0 - 1.0,
            1.0 - (py / self.screen_h) * 2.0,
        ]
    }

    fn push_quad(&mut self, corners: [[f32; 2]; 4], uvs: [[f32; 2]; 4], color: [f32; 4]) {
        let base = self.vertices.len() as u32;
        for (corner, uv) in corners.into_iter().zip(uvs) {
            let position = self.px_to_ndc(corner[0], corner[1]);
            self.vertices.push(OverlayVertex { position, tex_coords: uv, color });
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Axis-aligned solid rectangle. Coordinates in pixels.
    pub fn add_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        self.push_quad(
            [[x, y], [x + w, y], [x + w, y + h], [x, y + h]],
            [SOLID_UV; 4],
            color,
        );
    }

    /// Solid rectangle centered on `(cx, cy)` and rotated clockwise by
    /// `angle_degrees` (screen y points down).
    pub fn add_rotated_rect(
        &mut self,
        cx: f32,
        cy: f32,
        w: f32,
        h: f32,
        angle_degrees: f32,
        color: [f32; 4],
    ) {
        let (sin, cos) = angle_degrees.to_radians().sin_cos();
        let (hw, hh) = (w / 2.0, h / 2.0);
        let rotate = |dx: f32, dy: f32| [cx + dx * cos - dy * sin, cy + dx * sin + dy * cos];
        self.push_quad(
            [rotate(-hw, -hh), rotate(hw, -hh), rotate(hw, hh), rotate(-hw, hh)],
            [SOLID_UV; 4],
            color,
        );
    }

    /// Text with its top-left corner at `(x, y)`. At `scale` 1.0 each glyph is
    /// 6x8 pixels. Characters outside printable ASCII leave a gap.
    pub fn add_text(&mut self, x: f32, y: f32, text: &str, scale: f32, color: [f32; 4]) {
        let gw = GLYPH_PX_W as f32 * scale;
        let gh = GLYPH_PX_H as f32 * scale;
        let mut cx = x;
        for ch in text.chars() {
            if let Some([u0, v0, u1, v1]) = glyph_uv(ch) {
                self.push_quad(
                    [[cx, y], [cx + gw, y], [cx + gw, y + gh], [cx, y + gh]],
                    [[u0, v0], [u1, v0], [u1, v1], [u0, v1]],
                    color,
                );
            }
            cx += gw;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_unpacks_channels() {
        assert_eq!(argb(0xff_ffff00), [1.0, 1.0, 0.0, 1.0]);
        assert_eq!(argb(0x00_000000), [0.0; 4]);
    }

    #[test]
    fn rect_maps_screen_corners_to_ndc() {
        let mut b = OverlayBuilder::new(600.0, 600.0);
        b.add_rect(0.0, 0.0, 600.0, 600.0, [1.0; 4]);
        let positions: Vec<[f32; 2]> = b.vertices.iter().map(|v| v.position).collect();
        assert_eq!(positions, [[-1.0_f32, 1.0], [1.0, 1.0], [1.0, -1.0], [-1.0, -1.0]]);
        assert_eq!(b.indices, [0_u32, 1, 2, 0, 2, 3]);
        assert!(b.vertices.iter().all(|v| v.tex_coords == SOLID_UV));
    }

    #[test]
    fn rotated_rect_quarter_turn_swaps_extent() {
        let mut b = OverlayBuilder::new(100.0, 100.0);
        b.add_rotated_rect(50.0, 50.0, 20.0, 10.0, 90.0, [1.0; 4]);
        let xs: Vec<f32> = b.vertices.iter().map(|v| v.position[0]).collect();
        let width_ndc = xs.iter().cloned().fold(f32::MIN, f32::max)
            - xs.iter().cloned().fold(f32::MAX, f32::min);
        // 10 px wide after rotation = 0.2 in NDC.
        assert!((width_ndc - 0.2).abs() < 1e-4);
    }

    #[test]
    fn text_emits_one_quad_per_printable_char() {
        let mut b = OverlayBuilder::new(600.0, 600.0);
        b.add_text(10.0, 10.0, "Lives: 5", 1.0, argb(0xff_ffff00));
        assert_eq!(b.vertices.len(), 8 * 4);
        assert_eq!(b.indices.len(), 8 * 6);

        let mut b = OverlayBuilder::new(600.0, 600.0);
        b.add_text(0.0, 0.0, "a\tb", 1.0, [1.0; 4]);
        assert_eq!(b.vertices.len(), 2 * 4);
        // The tab still advances the pen.
        let third_char_x = b.vertices[4].position[0];
        assert!((third_char_x - ((12.0 / 600.0) * 2.0 - 1.0)).abs() < 1e-6);
    }
}
