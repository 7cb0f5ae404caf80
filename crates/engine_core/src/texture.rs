//! Backend-independent texture references.

/// Opaque id of a texture owned by the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Normalized rectangle of a texture to sample from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRegion {
    pub texture: TextureHandle,
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl TextureRegion {
    /// Region covering the whole texture.
    pub fn full(texture: TextureHandle) -> Self {
        Self {
            texture,
            left: 0.0,
            top: 0.0,
            right: 1.0,
            bottom: 1.0,
        }
    }
}
