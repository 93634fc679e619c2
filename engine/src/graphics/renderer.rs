//! Main renderer implementation
//!
//! The GlobeRenderer orchestrates the per-frame globe pass: it asks the
//! uniform bridge for the frame's state and either draws the ray-traced
//! globe or clears to a flat fallback color when resources are not ready.
//! Nothing on this path can crash the frame loop.

use crate::core::camera::CameraSnapshot;
use crate::graphics::{
    context::RenderContext,
    pipeline::GlobePipeline,
    quality::QualityParams,
    texture::GlobeTextures,
    uniform::{
        GlobeScalars, QualityUniforms, UniformBridge, UniformBuffer, UniformsStatus,
    },
};
use bytemuck::Zeroable;
use glam::{Vec2, Vec3};
use std::sync::Arc;
use tracing::info;

/// Deep-space background drawn until the globe resources are ready, or
/// permanently if loading failed
const FALLBACK_CLEAR: wgpu::Color = wgpu::Color {
    r: 0.012,
    g: 0.014,
    b: 0.035,
    a: 1.0,
};

/// Renderer for the globe view
pub struct GlobeRenderer {
    /// Render context with device and queue
    context: Arc<RenderContext>,
    /// Globe render pipeline
    pipeline: GlobePipeline,
    /// Buffer holding the fifteen-scalar protocol block
    scalars_buffer: wgpu::Buffer,
    /// Buffer holding the quality block
    quality_buffer: wgpu::Buffer,
    /// Bind group for the two uniform buffers
    uniform_bind_group: wgpu::BindGroup,
    /// Bind group for the four globe maps; rebuilt when uploads land
    texture_bind_group: Option<wgpu::BindGroup>,
    /// Assembles and validates per-frame uniform state
    bridge: UniformBridge,
    /// Current surface format
    surface_format: wgpu::TextureFormat,
}

impl GlobeRenderer {
    /// Create a new globe renderer
    pub fn new(context: Arc<RenderContext>, bridge: UniformBridge) -> Self {
        info!("Initializing globe renderer");

        // Default format - updated on the first frame from the surface
        let surface_format = wgpu::TextureFormat::Bgra8UnormSrgb;
        let pipeline = GlobePipeline::new(&context.device, surface_format);

        let scalars_buffer =
            GlobeScalars::zeroed().create_buffer(&context.device, Some("Globe Scalars Buffer"));
        let quality_buffer =
            QualityUniforms::zeroed().create_buffer(&context.device, Some("Globe Quality Buffer"));
        let uniform_bind_group =
            pipeline.create_uniform_bind_group(&context.device, &scalars_buffer, &quality_buffer);

        Self {
            context,
            pipeline,
            scalars_buffer,
            quality_buffer,
            uniform_bind_group,
            texture_bind_group: None,
            bridge,
            surface_format,
        }
    }

    /// Drop the cached texture bind group so the next frame rebinds the
    /// current views; call after any texture upload
    pub fn invalidate_textures(&mut self) {
        self.texture_bind_group = None;
    }

    /// Update the surface format if it changes
    pub fn update_surface_format(&mut self, format: wgpu::TextureFormat) {
        if self.surface_format != format {
            self.surface_format = format;
            // Recreate the pipeline and everything bound to its layouts
            self.pipeline = GlobePipeline::new(&self.context.device, format);
            self.uniform_bind_group = self.pipeline.create_uniform_bind_group(
                &self.context.device,
                &self.scalars_buffer,
                &self.quality_buffer,
            );
            self.texture_bind_group = None;
        }
    }

    /// Render one frame to the surface
    ///
    /// When the bridge reports anything other than `Ready`, the frame is a
    /// flat clear; the caller does not need to branch on readiness itself.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        surface: &wgpu::Surface,
        viewport_px: Vec2,
        camera: &CameraSnapshot,
        sun_direction: Vec3,
        elapsed_seconds: f32,
        quality: QualityParams,
        textures: &GlobeTextures,
    ) -> Result<(), wgpu::SurfaceError> {
        let output = surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.update_surface_format(self.context.get_preferred_format(surface));

        let status = self.bridge.assemble(
            viewport_px,
            camera,
            sun_direction,
            elapsed_seconds,
            quality,
            textures.readiness(),
        );

        if let UniformsStatus::Ready(frame) = &status {
            frame
                .scalars
                .update_buffer(&self.context.queue, &self.scalars_buffer);
            frame
                .quality
                .update_buffer(&self.context.queue, &self.quality_buffer);
            if self.texture_bind_group.is_none() {
                self.texture_bind_group = Some(
                    self.pipeline
                        .create_texture_bind_group(&self.context.device, textures),
                );
            }
        }

        let mut encoder = self
            .context
            .create_command_encoder(Some("Globe Render Encoder"));

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Globe Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(FALLBACK_CLEAR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let (UniformsStatus::Ready(_), Some(texture_bind_group)) =
                (&status, &self.texture_bind_group)
            {
                render_pass.set_pipeline(&self.pipeline.pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_bind_group(1, texture_bind_group, &[]);
                // Fullscreen triangle generated from the vertex index
                render_pass.draw(0..3, 0..1);
            }
        }

        self.context.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
