//! Shader management and compilation
//!
//! Provides access to compiled shaders for the rendering pipeline.

/// Ray-traced globe vertex and fragment shader
pub const GLOBE_SHADER: &str = include_str!("globe.wgsl");
