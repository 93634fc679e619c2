//! Globe texture resources and background loading
//!
//! The four equirectangular globe maps decode on a background thread and
//! upload from the render thread when [`TextureLoader::poll`] drains them.
//! The render path never waits on a load; it reads [`TextureReadiness`]
//! each frame and the renderer falls back to a flat clear until the
//! required maps arrive. A failed load stays failed for the session unless
//! [`TextureLoader::reload`] is called explicitly.

use crate::config::TextureAssetConfig;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tracing::{debug, info, warn};

/// The four texture slots of the globe program, in binding order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// Satellite base-color imagery
    BaseColor,
    /// Height / relief map
    Height,
    /// Signed distance field to the nearest shoreline
    ShoreDistance,
    /// Night-side city lights
    NightLights,
}

impl TextureSlot {
    /// Every slot, in binding order
    pub const ALL: [TextureSlot; 4] = [
        TextureSlot::BaseColor,
        TextureSlot::Height,
        TextureSlot::ShoreDistance,
        TextureSlot::NightLights,
    ];

    /// Fixed binding index within the texture bind group
    pub fn binding(self) -> u32 {
        match self {
            TextureSlot::BaseColor => 0,
            TextureSlot::Height => 1,
            TextureSlot::ShoreDistance => 2,
            TextureSlot::NightLights => 3,
        }
    }

    fn index(self) -> usize {
        self.binding() as usize
    }

    /// Color maps sample as sRGB; data maps stay linear
    fn format(self) -> wgpu::TextureFormat {
        match self {
            TextureSlot::BaseColor | TextureSlot::NightLights => {
                wgpu::TextureFormat::Rgba8UnormSrgb
            }
            TextureSlot::Height | TextureSlot::ShoreDistance => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// Errors that can occur while decoding a globe texture
#[derive(Debug, thiserror::Error)]
pub enum TextureLoadError {
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("unsupported texture format: {0}")]
    UnsupportedFormat(String),
}

/// A decoded RGBA8 image waiting for GPU upload
#[derive(Debug)]
pub struct DecodedTexture {
    pub slot: TextureSlot,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Which slots currently have a GPU texture bound
///
/// Base color and height are required for the globe pass; the other two
/// only degrade their effects when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureReadiness {
    pub base_color: bool,
    pub height: bool,
    pub shore_distance: bool,
    pub night_lights: bool,
}

impl TextureReadiness {
    /// True when every texture the shader cannot do without is bound
    pub fn required_ready(&self) -> bool {
        self.base_color && self.height
    }
}

/// Owner of the four globe textures and their sampler
///
/// Constructed explicitly by the render-loop owner and passed where
/// needed; slots without a loaded texture bind a 1x1 placeholder so the
/// bind group is always complete.
pub struct GlobeTextures {
    views: [Option<wgpu::TextureView>; 4],
    placeholder_view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl GlobeTextures {
    /// Create the owner with all slots empty
    pub fn new(device: &wgpu::Device) -> Self {
        let placeholder = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Globe Placeholder Texture"),
            size: wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let placeholder_view = placeholder.create_view(&wgpu::TextureViewDescriptor::default());

        // Longitude wraps; latitude clamps at the poles
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Globe Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            views: [None, None, None, None],
            placeholder_view,
            sampler,
        }
    }

    /// Upload a decoded image into its slot
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        decoded: DecodedTexture,
    ) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("Globe Texture {:?}", decoded.slot)),
            size: wgpu::Extent3d {
                width: decoded.width,
                height: decoded.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: decoded.slot.format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &decoded.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * decoded.width),
                rows_per_image: Some(decoded.height),
            },
            wgpu::Extent3d {
                width: decoded.width,
                height: decoded.height,
                depth_or_array_layers: 1,
            },
        );

        info!(
            slot = ?decoded.slot,
            width = decoded.width,
            height = decoded.height,
            "Uploaded globe texture"
        );
        self.views[decoded.slot.index()] =
            Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
    }

    /// View for a slot, or the placeholder when the slot is empty
    pub fn view_for(&self, slot: TextureSlot) -> &wgpu::TextureView {
        self.views[slot.index()]
            .as_ref()
            .unwrap_or(&self.placeholder_view)
    }

    /// Shared sampler for all four maps
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// Per-slot readiness for the uniform bridge
    pub fn readiness(&self) -> TextureReadiness {
        TextureReadiness {
            base_color: self.views[TextureSlot::BaseColor.index()].is_some(),
            height: self.views[TextureSlot::Height.index()].is_some(),
            shore_distance: self.views[TextureSlot::ShoreDistance.index()].is_some(),
            night_lights: self.views[TextureSlot::NightLights.index()].is_some(),
        }
    }
}

/// Decode one texture file to RGBA8
fn decode_texture(slot: TextureSlot, path: &Path) -> Result<DecodedTexture, TextureLoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();
    if extension != "png" {
        return Err(TextureLoadError::UnsupportedFormat(extension));
    }

    let image = image::open(path)?.to_rgba8();
    let (width, height) = image.dimensions();
    debug!(slot = ?slot, path = ?path, width, height, "Decoded globe texture");

    Ok(DecodedTexture {
        slot,
        width,
        height,
        pixels: image.into_raw(),
    })
}

type LoadResult = Result<DecodedTexture, (TextureSlot, TextureLoadError)>;

/// Background texture decoder polled from the render thread
pub struct TextureLoader {
    sender: Sender<LoadResult>,
    receiver: Receiver<LoadResult>,
    failed: Vec<TextureSlot>,
}

impl TextureLoader {
    /// Kick off a background decode of all four slots
    pub fn start(config: &TextureAssetConfig) -> Self {
        let (sender, receiver) = mpsc::channel();
        let mut loader = Self {
            sender,
            receiver,
            failed: Vec::new(),
        };
        for slot in TextureSlot::ALL {
            loader.spawn_decode(slot, config.texture_path(slot));
        }
        loader
    }

    /// Explicitly retry one slot; this is the only retry mechanism
    pub fn reload(&mut self, config: &TextureAssetConfig, slot: TextureSlot) {
        info!(slot = ?slot, "Reloading globe texture");
        self.failed.retain(|&s| s != slot);
        self.spawn_decode(slot, config.texture_path(slot));
    }

    fn spawn_decode(&self, slot: TextureSlot, path: PathBuf) {
        let sender = self.sender.clone();
        thread::spawn(move || {
            let result = decode_texture(slot, &path).map_err(|e| (slot, e));
            // The receiver disappearing just means the session is over
            let _ = sender.send(result);
        });
    }

    /// Drain finished decodes without blocking
    ///
    /// Failures are logged and remembered; the corresponding slot keeps its
    /// placeholder until an explicit [`reload`].
    ///
    /// [`reload`]: TextureLoader::reload
    pub fn poll(&mut self) -> Vec<DecodedTexture> {
        let mut decoded = Vec::new();
        while let Ok(result) = self.receiver.try_recv() {
            match result {
                Ok(texture) => decoded.push(texture),
                Err((slot, error)) => {
                    warn!(slot = ?slot, error = %error, "Globe texture failed to load");
                    if !self.failed.contains(&slot) {
                        self.failed.push(slot);
                    }
                }
            }
        }
        decoded
    }

    /// Slots whose last load attempt failed
    pub fn failed_slots(&self) -> &[TextureSlot] {
        &self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for<F: FnMut() -> bool>(mut done: F) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done() {
            assert!(Instant::now() < deadline, "timed out waiting for loader");
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_slot_binding_order() {
        assert_eq!(TextureSlot::BaseColor.binding(), 0);
        assert_eq!(TextureSlot::Height.binding(), 1);
        assert_eq!(TextureSlot::ShoreDistance.binding(), 2);
        assert_eq!(TextureSlot::NightLights.binding(), 3);
        for (i, slot) in TextureSlot::ALL.iter().enumerate() {
            assert_eq!(slot.binding() as usize, i);
        }
    }

    #[test]
    fn test_readiness_requires_base_color_and_height() {
        let ready = TextureReadiness {
            base_color: true,
            height: true,
            shore_distance: false,
            night_lights: false,
        };
        assert!(ready.required_ready());

        let missing_height = TextureReadiness {
            height: false,
            ..ready
        };
        assert!(!missing_height.required_ready());

        let missing_base = TextureReadiness {
            base_color: false,
            ..ready
        };
        assert!(!missing_base.required_ready());
    }

    #[test]
    fn test_decode_rejects_unsupported_extension() {
        let result = decode_texture(TextureSlot::BaseColor, Path::new("globe.tiff"));
        assert!(matches!(result, Err(TextureLoadError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_loader_records_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = TextureAssetConfig {
            asset_root: dir.path().to_path_buf(),
            ..TextureAssetConfig::default()
        };

        let mut loader = TextureLoader::start(&config);
        wait_for(|| {
            loader.poll();
            loader.failed_slots().len() == 4
        });
        assert!(loader.poll().is_empty());
    }

    #[test]
    fn test_loader_decodes_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let config = TextureAssetConfig {
            asset_root: dir.path().to_path_buf(),
            ..TextureAssetConfig::default()
        };

        // Only the base-color map exists at first
        let image = image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]));
        image
            .save(config.texture_path(TextureSlot::BaseColor))
            .unwrap();

        let mut loader = TextureLoader::start(&config);
        let mut decoded = Vec::new();
        wait_for(|| {
            decoded.extend(loader.poll());
            !decoded.is_empty() && loader.failed_slots().len() == 3
        });
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].slot, TextureSlot::BaseColor);
        assert_eq!((decoded[0].width, decoded[0].height), (4, 2));
        assert_eq!(decoded[0].pixels.len(), 4 * 2 * 4);

        // The height map appears later; an explicit reload picks it up
        image.save(config.texture_path(TextureSlot::Height)).unwrap();
        loader.reload(&config, TextureSlot::Height);
        let mut reloaded = Vec::new();
        wait_for(|| {
            reloaded.extend(loader.poll());
            !reloaded.is_empty()
        });
        assert_eq!(reloaded[0].slot, TextureSlot::Height);
        assert_eq!(loader.failed_slots().len(), 2);
    }
}
