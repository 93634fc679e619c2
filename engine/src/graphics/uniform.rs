//! GPU uniform protocol for the globe program
//!
//! The globe shader consumes a fixed, versioned list of fifteen scalars.
//! The ordering below is a wire contract shared out-of-band with the WGSL
//! program; reordering any index is a breaking protocol change. Quality
//! knobs ride in a second block so the scalar list stays bit-exact across
//! quality levels.

use crate::core::camera::CameraSnapshot;
use crate::core::geo::GLOBE_RADIUS;
use crate::graphics::quality::QualityParams;
use crate::graphics::texture::TextureReadiness;
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use tracing::error;

/// Radius of the cloud shell, in globe radii
pub const CLOUD_SHELL_RADIUS: f32 = 1.03;

/// Number of scalars in the protocol (the buffer pads to 16 for alignment)
pub const GLOBE_SCALAR_COUNT: usize = 15;

pub const IDX_VIEWPORT_WIDTH: usize = 0;
pub const IDX_VIEWPORT_HEIGHT: usize = 1;
pub const IDX_CAMERA_X: usize = 2;
pub const IDX_CAMERA_Y: usize = 3;
pub const IDX_CAMERA_Z: usize = 4;
pub const IDX_UP_X: usize = 5;
pub const IDX_UP_Y: usize = 6;
pub const IDX_UP_Z: usize = 7;
pub const IDX_SUN_X: usize = 8;
pub const IDX_SUN_Y: usize = 9;
pub const IDX_SUN_Z: usize = 10;
pub const IDX_TIME: usize = 11;
pub const IDX_GLOBE_RADIUS: usize = 12;
pub const IDX_CLOUD_RADIUS: usize = 13;
pub const IDX_FOV: usize = 14;

/// The fifteen-scalar protocol block, padded to a 64-byte uniform buffer
///
/// Matches `GlobeScalars` in `globe.wgsl` (an `array<vec4<f32>, 4>`
/// indexed by the constants above).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GlobeScalars {
    /// Scalars in protocol order; index 15 is padding and always zero
    pub values: [f32; 16],
}

impl GlobeScalars {
    /// Pack viewport, camera, sun, and time into protocol order
    pub fn pack(
        viewport_px: Vec2,
        camera: &CameraSnapshot,
        sun_direction: Vec3,
        elapsed_seconds: f32,
    ) -> Self {
        let mut values = [0.0f32; 16];
        values[IDX_VIEWPORT_WIDTH] = viewport_px.x;
        values[IDX_VIEWPORT_HEIGHT] = viewport_px.y;
        values[IDX_CAMERA_X] = camera.position.x;
        values[IDX_CAMERA_Y] = camera.position.y;
        values[IDX_CAMERA_Z] = camera.position.z;
        values[IDX_UP_X] = camera.up.x;
        values[IDX_UP_Y] = camera.up.y;
        values[IDX_UP_Z] = camera.up.z;
        values[IDX_SUN_X] = sun_direction.x;
        values[IDX_SUN_Y] = sun_direction.y;
        values[IDX_SUN_Z] = sun_direction.z;
        values[IDX_TIME] = elapsed_seconds;
        values[IDX_GLOBE_RADIUS] = GLOBE_RADIUS;
        values[IDX_CLOUD_RADIUS] = CLOUD_SHELL_RADIUS;
        values[IDX_FOV] = camera.fov_rad;
        Self { values }
    }
}

/// Quality knobs as a 16-byte uniform block (booleans as 0.0 / 1.0)
///
/// Matches `QualityUniforms` in `globe.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QualityUniforms {
    pub cloud_steps: f32,
    pub foam_enabled: f32,
    pub atmosphere_samples: f32,
    pub city_lights_enabled: f32,
}

impl From<QualityParams> for QualityUniforms {
    fn from(params: QualityParams) -> Self {
        Self {
            cloud_steps: params.cloud_steps as f32,
            foam_enabled: if params.foam_enabled { 1.0 } else { 0.0 },
            atmosphere_samples: params.atmosphere_samples as f32,
            city_lights_enabled: if params.city_lights_enabled { 1.0 } else { 0.0 },
        }
    }
}

/// One frame's fully assembled uniform state
///
/// Either every field is populated or the bridge did not produce a value at
/// all; there is no partially configured variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub scalars: GlobeScalars,
    pub quality: QualityUniforms,
}

/// Outcome of assembling a frame's uniforms
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformsStatus {
    /// Uniforms assembled; safe to draw the globe pass
    Ready(FrameUniforms),
    /// Required resources have not finished loading; draw the fallback
    NotReady,
    /// Assembly failed unexpectedly this session; draw the fallback
    Failed,
}

/// Helper trait for creating GPU buffers from uniform types
pub trait UniformBuffer: Pod {
    /// Create a GPU buffer containing this uniform data
    fn create_buffer(&self, device: &wgpu::Device, label: Option<&str>) -> wgpu::Buffer {
        use wgpu::util::DeviceExt;

        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label,
            contents: bytemuck::cast_slice(&[*self]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    /// Update an existing buffer with new data
    fn update_buffer(&self, queue: &wgpu::Queue, buffer: &wgpu::Buffer) {
        queue.write_buffer(buffer, 0, bytemuck::cast_slice(&[*self]));
    }
}

impl UniformBuffer for GlobeScalars {}
impl UniformBuffer for QualityUniforms {}

/// Assembles per-frame uniforms and shields the frame loop from
/// configuration failures
///
/// Failures are logged once per session, forwarded to the injected
/// telemetry hook, and mapped to [`UniformsStatus::Failed`] so the render
/// loop falls back to a flat clear instead of crashing at 60 calls per
/// second.
pub struct UniformBridge {
    failure_logged: bool,
    telemetry: Option<Box<dyn FnMut(&str)>>,
}

impl Default for UniformBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformBridge {
    /// Create a bridge with no telemetry hook
    pub fn new() -> Self {
        Self {
            failure_logged: false,
            telemetry: None,
        }
    }

    /// Create a bridge that reports configuration failures to `telemetry`
    pub fn with_telemetry(telemetry: Box<dyn FnMut(&str)>) -> Self {
        Self {
            failure_logged: false,
            telemetry: Some(telemetry),
        }
    }

    /// Assemble the frame's uniform state
    pub fn assemble(
        &mut self,
        viewport_px: Vec2,
        camera: &CameraSnapshot,
        sun_direction: Vec3,
        elapsed_seconds: f32,
        quality: QualityParams,
        textures: TextureReadiness,
    ) -> UniformsStatus {
        if !textures.required_ready() {
            return UniformsStatus::NotReady;
        }
        if viewport_px.x <= 0.0 || viewport_px.y <= 0.0 {
            return UniformsStatus::NotReady;
        }

        let sun = if sun_direction.length_squared() > f32::EPSILON {
            sun_direction.normalize()
        } else {
            self.report_failure("sun direction is zero length");
            return UniformsStatus::Failed;
        };

        let scalars = GlobeScalars::pack(viewport_px, camera, sun, elapsed_seconds);
        if !scalars.values.iter().all(|v| v.is_finite()) {
            self.report_failure("non-finite value in uniform scalars");
            return UniformsStatus::Failed;
        }

        UniformsStatus::Ready(FrameUniforms {
            scalars,
            quality: quality.into(),
        })
    }

    fn report_failure(&mut self, reason: &str) {
        if !self.failure_logged {
            self.failure_logged = true;
            error!(reason = reason, "Uniform assembly failed; falling back to flat render");
            if let Some(telemetry) = self.telemetry.as_mut() {
                telemetry(reason);
            }
        }
    }
}
