//! Globe navigation and rendering engine
//!
//! This crate provides the core of the globe-flying game: the orbital
//! follow camera, screen-to-globe hit testing, the adaptive render
//! quality governor, and the WebGPU globe renderer with its shader
//! uniform protocol.

pub mod config;
pub mod core;
pub mod graphics;
pub mod input;
pub mod shaders;

// Re-export commonly used types
pub mod prelude {
    // Camera types
    pub use crate::core::camera::{CameraSnapshot, FollowCamera};

    // Geographic math
    pub use crate::core::geo::{self, GeoPoint, GLOBE_RADIUS};

    // Hit testing
    pub use crate::core::picking;

    // Region presets
    pub use crate::core::regions::{Region, RegionPreset};

    // Math types
    pub use glam::{Vec2, Vec3};

    // Graphics types
    pub use crate::graphics::{
        GlobeRenderer, GlobeTextures, QualityGovernor, QualityLevel, RenderContext,
        TextureLoader, UniformBridge,
    };

    // Config types
    pub use crate::config::TextureAssetConfig;

    // Input types
    pub use crate::input::InputState;

    pub use wgpu;
    pub use winit;
}

/// Initialize logging for the engine
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wgpu_core=warn,wgpu_hal=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
