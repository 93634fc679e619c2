//! Graphics module
//!
//! Provides the globe rendering stack: the render context, the ray-traced
//! globe pipeline and renderer, texture resources, the shader uniform
//! protocol, and the adaptive quality governor.

pub mod context;
pub mod pipeline;
pub mod quality;
pub mod renderer;
pub mod texture;
pub mod uniform;

// Re-export commonly used types
pub use context::RenderContext;
pub use pipeline::GlobePipeline;
pub use quality::{QualityGovernor, QualityLevel, QualityParams};
pub use renderer::GlobeRenderer;
pub use texture::{
    DecodedTexture, GlobeTextures, TextureLoadError, TextureLoader, TextureReadiness, TextureSlot,
};
pub use uniform::{
    FrameUniforms, GlobeScalars, QualityUniforms, UniformBridge, UniformBuffer, UniformsStatus,
};
