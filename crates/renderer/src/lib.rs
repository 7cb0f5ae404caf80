//! Rendering system using wgpu for SkyScroll.
//!
//! The background is drawn through the [`GraphicsContext`] seam so the same
//! pass runs against the GPU ([`GpuContext`]) or a [`RecordingContext`] in
//! tests.

pub mod background;
pub mod camera;
pub mod context;
pub mod font;
pub mod overlay;
pub mod pipeline;
pub mod renderer;
pub mod texture;
pub mod vertex;

pub use background::*;
pub use camera::*;
pub use context::*;
pub use overlay::*;
pub use renderer::*;
pub use texture::*;
pub use vertex::*;
