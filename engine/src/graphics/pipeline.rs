//! Render pipeline abstraction
//!
//! Provides the globe render pipeline: shader compilation, bind group
//! layouts, and pipeline creation. The globe is ray-traced per pixel in
//! the fragment shader, so the pipeline draws a single fullscreen
//! triangle and needs no vertex buffers or depth attachment.

use crate::graphics::texture::{GlobeTextures, TextureSlot};
use crate::shaders::GLOBE_SHADER;
use tracing::info;

/// Binding index of the sampler within the texture bind group, after the
/// four texture slots
const SAMPLER_BINDING: u32 = 4;

/// Render pipeline wrapper that manages GPU pipeline state
pub struct GlobePipeline {
    /// The WebGPU render pipeline
    pub pipeline: wgpu::RenderPipeline,
    /// Bind group layout for the scalar + quality uniform blocks (group 0)
    pub uniform_bind_group_layout: wgpu::BindGroupLayout,
    /// Bind group layout for the four globe maps + sampler (group 1)
    pub texture_bind_group_layout: wgpu::BindGroupLayout,
}

impl GlobePipeline {
    /// Create the globe render pipeline for a surface format
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        info!(format = ?surface_format, "Creating globe render pipeline");

        // Create shader module
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Globe Shader"),
            source: wgpu::ShaderSource::Wgsl(GLOBE_SHADER.into()),
        });

        // Group 0: the fifteen-scalar protocol block and the quality block
        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Globe Uniform Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        // Group 1: the four globe maps in slot order, then the sampler
        let mut texture_entries: Vec<wgpu::BindGroupLayoutEntry> = TextureSlot::ALL
            .iter()
            .map(|slot| wgpu::BindGroupLayoutEntry {
                binding: slot.binding(),
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            })
            .collect();
        texture_entries.push(wgpu::BindGroupLayoutEntry {
            binding: SAMPLER_BINDING,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Globe Texture Bind Group Layout"),
                entries: &texture_entries,
            });

        // Create pipeline layout
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Globe Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout, &texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        // Create render pipeline: one fullscreen triangle, no depth
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Globe Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_bind_group_layout,
            texture_bind_group_layout,
        }
    }

    /// Create the bind group for the two uniform blocks
    pub fn create_uniform_bind_group(
        &self,
        device: &wgpu::Device,
        scalars_buffer: &wgpu::Buffer,
        quality_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globe Uniform Bind Group"),
            layout: &self.uniform_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: scalars_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: quality_buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// Create the bind group for the four globe maps
    ///
    /// Slots without a loaded texture bind the owner's placeholder, so the
    /// group is always valid; readiness gating happens in the uniform
    /// bridge, not here.
    pub fn create_texture_bind_group(
        &self,
        device: &wgpu::Device,
        textures: &GlobeTextures,
    ) -> wgpu::BindGroup {
        let mut entries: Vec<wgpu::BindGroupEntry> = TextureSlot::ALL
            .iter()
            .map(|&slot| wgpu::BindGroupEntry {
                binding: slot.binding(),
                resource: wgpu::BindingResource::TextureView(textures.view_for(slot)),
            })
            .collect();
        entries.push(wgpu::BindGroupEntry {
            binding: SAMPLER_BINDING,
            resource: wgpu::BindingResource::Sampler(textures.sampler()),
        });

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globe Texture Bind Group"),
            layout: &self.texture_bind_group_layout,
            entries: &entries,
        })
    }
}
