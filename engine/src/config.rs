//! Configuration types for the engine

use crate::graphics::texture::TextureSlot;
use std::path::PathBuf;
use tracing::debug;

/// Configuration for the globe texture assets
#[derive(Debug, Clone)]
pub struct TextureAssetConfig {
    /// Root directory for all texture assets
    pub asset_root: PathBuf,
    /// Satellite base-color map file name (relative to asset_root)
    pub base_color_file: String,
    /// Height / relief map file name (relative to asset_root)
    pub height_file: String,
    /// Shoreline distance field file name (relative to asset_root)
    pub shore_distance_file: String,
    /// Night-lights map file name (relative to asset_root)
    pub night_lights_file: String,
}

impl TextureAssetConfig {
    /// Get the full path to the texture for a slot
    pub fn texture_path(&self, slot: TextureSlot) -> PathBuf {
        let name = match slot {
            TextureSlot::BaseColor => &self.base_color_file,
            TextureSlot::Height => &self.height_file,
            TextureSlot::ShoreDistance => &self.shore_distance_file,
            TextureSlot::NightLights => &self.night_lights_file,
        };
        // Validate name to prevent path traversal attacks
        if name.contains("..") || name.contains("/") || name.contains("\\") {
            panic!("Invalid texture file name: {name}");
        }
        let path = self.asset_root.join(name);
        debug!(slot = ?slot, path = ?path, "Resolved texture path");
        path
    }

    /// Check that the asset directory and required maps exist
    pub fn validate(&self) -> Result<(), std::io::Error> {
        if !self.asset_root.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Texture asset root not found: {:?}", self.asset_root),
            ));
        }

        for slot in [TextureSlot::BaseColor, TextureSlot::Height] {
            let path = self.texture_path(slot);
            if !path.exists() {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Required texture not found: {path:?}"),
                ));
            }
        }

        Ok(())
    }
}

impl Default for TextureAssetConfig {
    /// Default configuration that matches the shipped asset set
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets/textures"),
            base_color_file: "blue_marble.png".to_string(),
            height_file: "heightmap.png".to_string(),
            shore_distance_file: "shore_distance.png".to_string(),
            night_lights_file: "city_lights.png".to_string(),
        }
    }
}
