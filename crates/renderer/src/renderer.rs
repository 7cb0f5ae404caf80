//! Main renderer managing wgpu state and rendering.

use crate::{
    camera::CameraUniform,
    context::GraphicsContext,
    font::generate_font_atlas,
    overlay::OverlayBuilder,
    pipeline::{
        create_camera_bind_group_layout, create_overlay_pipeline, create_terrain_pipeline,
        create_texture_bind_group, create_texture_bind_group_layout, PipelineKey,
    },
    texture::{fits_single_texture, load_rgba, Texture, TextureError},
};
use anyhow::Result;
use engine_core::{Mat4, TerrainVertex, TextureHandle, TextureRegion};
use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// A loaded texture and the bind group sampling it.
struct TextureSlot {
    _texture: Texture,
    bind_group: wgpu::BindGroup,
}

pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,

    depth_texture: Texture,

    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    camera_bind_group_layout: wgpu::BindGroupLayout,

    texture_bind_group_layout: wgpu::BindGroupLayout,
    /// Indexed by `TextureHandle`.
    textures: Vec<TextureSlot>,
    terrain_pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,

    overlay_pipeline: wgpu::RenderPipeline,
    overlay_bind_group: wgpu::BindGroup,
    _font_texture: Texture,
}

impl Renderer {
    /// Create a new renderer for the given window.
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        // Mailbox when available for lower latency, otherwise plain vsync.
        let present_mode = if vsync {
            surface_caps
                .present_modes
                .iter()
                .find(|m| matches!(m, wgpu::PresentMode::Mailbox))
                .copied()
                .unwrap_or(wgpu::PresentMode::AutoVsync)
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = Texture::create_depth_texture(&device, &config, "Depth Texture");

        let camera_uniform = CameraUniform::new();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout = create_camera_bind_group_layout(&device);
        let texture_bind_group_layout = create_texture_bind_group_layout(&device);

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let (atlas, atlas_w, atlas_h) = generate_font_atlas();
        let font_texture = Texture::from_luma(&device, &queue, &atlas, atlas_w, atlas_h, "Font Atlas");
        let overlay_bind_group = create_texture_bind_group(
            &device,
            &texture_bind_group_layout,
            &font_texture,
            "Overlay Bind Group",
        );
        let overlay_pipeline = create_overlay_pipeline(&device, config.format, &texture_bind_group_layout);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            depth_texture,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            camera_bind_group_layout,
            texture_bind_group_layout,
            textures: Vec::new(),
            terrain_pipelines: HashMap::new(),
            overlay_pipeline,
            overlay_bind_group,
            _font_texture: font_texture,
        })
    }

    /// Load an image for the background and return the region covering it.
    ///
    /// Returns `Ok(None)` when the image is too large for a single hardware
    /// texture. The image would then be split over several textures and no
    /// single UV rectangle describes it.
    pub fn load_texture_region(&mut self, path: &Path) -> Result<Option<TextureRegion>, TextureError> {
        let image = load_rgba(path)?;
        let (width, height) = image.dimensions();
        let max = self.device.limits().max_texture_dimension_2d;
        if !fits_single_texture(width, height, max) {
            log::warn!(
                "{} is {}x{}, larger than one texture ({}); background disabled",
                path.display(),
                width,
                height,
                max
            );
            return Ok(None);
        }

        let label = path.display().to_string();
        let texture = Texture::from_rgba(&self.device, &self.queue, &image, wgpu::AddressMode::Repeat, &label);
        let bind_group =
            create_texture_bind_group(&self.device, &self.texture_bind_group_layout, &texture, &label);
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(TextureSlot {
            _texture: texture,
            bind_group,
        });
        log::info!("Loaded {} ({}x{}) as {:?}", label, width, height, handle);
        Ok(Some(TextureRegion::full(handle)))
    }

    /// Handle window resize.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.reconfigure();
        }
    }

    /// Reconfigure the surface at its current size, e.g. after it was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = Texture::create_depth_texture(&self.device, &self.config, "Depth Texture");
    }

    /// Begin a new frame, returns the output texture and command encoder.
    pub fn begin_frame(&mut self) -> Result<(wgpu::SurfaceTexture, wgpu::CommandEncoder), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        Ok((output, encoder))
    }

    /// Hand out a [`GraphicsContext`] that renders into `view`.
    pub fn custom_draw<'a>(
        &'a mut self,
        encoder: &'a mut wgpu::CommandEncoder,
        view: &'a wgpu::TextureView,
    ) -> GpuContext<'a> {
        GpuContext {
            renderer: self,
            encoder,
            view,
            state: CustomState::default(),
        }
    }

    /// Render screen-space sprites and text over whatever is already in `view`.
    pub fn render_overlay(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        overlay: &OverlayBuilder,
    ) {
        if overlay.is_empty() {
            return;
        }

        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Vertex Buffer"),
            contents: bytemuck::cast_slice(&overlay.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Index Buffer"),
            contents: bytemuck::cast_slice(&overlay.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.overlay_pipeline);
        render_pass.set_bind_group(0, &self.overlay_bind_group, &[]);
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..overlay.indices.len() as u32, 0, 0..1);
    }

    /// End frame and present.
    pub fn end_frame(&self, output: wgpu::SurfaceTexture, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// Get window dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }

    fn terrain_pipeline(&mut self, key: PipelineKey) -> &wgpu::RenderPipeline {
        let Self {
            device,
            config,
            camera_bind_group_layout,
            texture_bind_group_layout,
            terrain_pipelines,
            ..
        } = self;
        terrain_pipelines.entry(key).or_insert_with(|| {
            log::debug!("Creating terrain pipeline for {:?}", key);
            create_terrain_pipeline(
                device,
                config.format,
                camera_bind_group_layout,
                texture_bind_group_layout,
                key,
            )
        })
    }
}

/// Strips sharing one pipeline and texture, drawn back to back.
struct StripBatch {
    key: PipelineKey,
    texture: TextureHandle,
    /// One range per strip into the frame's vertex buffer.
    strips: Vec<Range<u32>>,
}

/// Everything set between `begin_custom` and `end_custom`.
#[derive(Default)]
struct CustomState {
    active: bool,
    clear: Option<([f32; 4], f32)>,
    depth_compare: Option<wgpu::CompareFunction>,
    blend: Option<wgpu::BlendState>,
    projection: Mat4,
    model_view: Mat4,
    texture: Option<TextureHandle>,
    vertices: Vec<TerrainVertex>,
    batches: Vec<StripBatch>,
}

/// [`GraphicsContext`] backed by the wgpu renderer.
///
/// Calls are recorded while the custom bracket is open and replayed as one
/// render pass on `end_custom`. The camera uniform holds the last
/// projection and model-view set in the bracket. Closing the bracket
/// discards all state, so the next bracket starts from defaults: no clear,
/// depth test and blending off, identity matrices, no texture.
pub struct GpuContext<'a> {
    renderer: &'a mut Renderer,
    encoder: &'a mut wgpu::CommandEncoder,
    view: &'a wgpu::TextureView,
    state: CustomState,
}

impl GpuContext<'_> {
    fn require_active(&self, op: &str) {
        assert!(self.state.active, "{} issued outside a custom draw", op);
    }

    fn flush(&mut self, state: CustomState) {
        if state.clear.is_none() && state.batches.is_empty() {
            return;
        }

        self.renderer.camera_uniform.update(state.projection, state.model_view);
        self.renderer.queue.write_buffer(
            &self.renderer.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.renderer.camera_uniform]),
        );

        for batch in &state.batches {
            self.renderer.terrain_pipeline(batch.key);
        }

        let vertex_buffer = (!state.vertices.is_empty()).then(|| {
            self.renderer.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Custom Draw Vertex Buffer"),
                contents: bytemuck::cast_slice(&state.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        let (color_load, depth_load) = match state.clear {
            Some(([r, g, b, a], depth)) => (
                wgpu::LoadOp::Clear(wgpu::Color {
                    r: r as f64,
                    g: g as f64,
                    b: b as f64,
                    a: a as f64,
                }),
                wgpu::LoadOp::Clear(depth),
            ),
            None => (wgpu::LoadOp::Load, wgpu::LoadOp::Load),
        };

        let renderer = &*self.renderer;
        let mut render_pass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Custom Draw Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: color_load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &renderer.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: depth_load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let Some(vertex_buffer) = &vertex_buffer else {
            return;
        };
        render_pass.set_bind_group(0, &renderer.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        for batch in &state.batches {
            let Some(slot) = renderer.textures.get(batch.texture.0 as usize) else {
                log::warn!("Skipping strips bound to unknown {:?}", batch.texture);
                continue;
            };
            let Some(pipeline) = renderer.terrain_pipelines.get(&batch.key) else {
                continue;
            };
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(1, &slot.bind_group, &[]);
            for strip in &batch.strips {
                render_pass.draw(strip.clone(), 0..1);
            }
        }
    }
}

impl GraphicsContext for GpuContext<'_> {
    fn begin_custom(&mut self) {
        assert!(!self.state.active, "custom draw already in progress");
        self.state.active = true;
    }

    fn end_custom(&mut self) {
        assert!(self.state.active, "end_custom without begin_custom");
        let state = std::mem::take(&mut self.state);
        self.flush(state);
    }

    fn clear(&mut self, color: [f32; 4], depth: f32) {
        self.require_active("clear");
        // Draws recorded before the clear would be wiped by it.
        self.state.vertices.clear();
        self.state.batches.clear();
        self.state.clear = Some((color, depth));
    }

    fn set_depth_test(&mut self, compare: Option<wgpu::CompareFunction>) {
        self.require_active("set_depth_test");
        self.state.depth_compare = compare;
    }

    fn set_blend(&mut self, blend: Option<wgpu::BlendState>) {
        self.require_active("set_blend");
        self.state.blend = blend;
    }

    fn set_projection(&mut self, projection: Mat4) {
        self.require_active("set_projection");
        self.state.projection = projection;
    }

    fn set_model_view(&mut self, model_view: Mat4) {
        self.require_active("set_model_view");
        self.state.model_view = model_view;
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.require_active("bind_texture");
        self.state.texture = Some(texture);
    }

    fn draw_strip(&mut self, vertices: &[TerrainVertex]) {
        self.require_active("draw_strip");
        let Some(texture) = self.state.texture else {
            log::warn!("draw_strip without a bound texture; ignored");
            return;
        };
        let key = PipelineKey {
            depth_compare: self.state.depth_compare,
            blend: self.state.blend,
        };
        let start = self.state.vertices.len() as u32;
        self.state.vertices.extend_from_slice(vertices);
        let strip = start..self.state.vertices.len() as u32;

        match self.state.batches.last_mut() {
            Some(batch) if batch.key == key && batch.texture == texture => batch.strips.push(strip),
            _ => self.state.batches.push(StripBatch {
                key,
                texture,
                strips: vec![strip],
            }),
        }
    }
}
