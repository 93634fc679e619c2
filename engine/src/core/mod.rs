//! Core navigation types: geographic math, the follow camera, hit testing,
//! and region presets

pub mod camera;
pub mod geo;
pub mod picking;
pub mod regions;
