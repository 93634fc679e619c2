//! Per-region camera presets
//!
//! Static configuration consumed by the game when it switches play areas:
//! where the camera should center, how high it should sit, how far the
//! vehicle may wander from the center, and an optional field-of-view
//! override for regions that read better zoomed in.

use crate::core::camera::{FOV_NARROW_RAD, HIGH_ALTITUDE_DISTANCE};
use crate::core::geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// The closed set of playable regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    WholeGlobe,
    UsStates,
    UkCounties,
    Ireland,
    CanadianProvinces,
}

/// Camera parameters for one region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionPreset {
    /// Center of the play area
    pub center: GeoPoint,
    /// Default camera distance from the sphere center, in globe radii
    pub camera_distance: f32,
    /// Maximum pan from the center as (latitude, longitude) degrees
    pub pan_bounds_deg: (f32, f32),
    /// Field-of-view override in radians, when the region default differs
    pub fov_override_rad: Option<f32>,
}

impl Region {
    /// Every region, in menu order
    pub const ALL: [Region; 5] = [
        Region::WholeGlobe,
        Region::UsStates,
        Region::UkCounties,
        Region::Ireland,
        Region::CanadianProvinces,
    ];

    /// Human-readable name for menus and logs
    pub fn label(self) -> &'static str {
        match self {
            Region::WholeGlobe => "Whole Globe",
            Region::UsStates => "US States",
            Region::UkCounties => "UK Counties",
            Region::Ireland => "Ireland",
            Region::CanadianProvinces => "Canadian Provinces",
        }
    }

    /// Camera preset for this region
    pub fn preset(self) -> RegionPreset {
        match self {
            Region::WholeGlobe => RegionPreset {
                center: GeoPoint::new(20.0, 0.0),
                camera_distance: HIGH_ALTITUDE_DISTANCE,
                pan_bounds_deg: (90.0, 180.0),
                fov_override_rad: None,
            },
            Region::UsStates => RegionPreset {
                center: GeoPoint::new(39.5, -98.35),
                camera_distance: 1.9,
                pan_bounds_deg: (13.0, 26.0),
                fov_override_rad: Some(0.78),
            },
            Region::UkCounties => RegionPreset {
                center: GeoPoint::new(54.0, -2.5),
                camera_distance: 1.35,
                pan_bounds_deg: (6.0, 8.0),
                fov_override_rad: Some(0.7),
            },
            Region::Ireland => RegionPreset {
                center: GeoPoint::new(53.4, -8.0),
                camera_distance: 1.3,
                pan_bounds_deg: (4.0, 5.0),
                fov_override_rad: Some(FOV_NARROW_RAD),
            },
            Region::CanadianProvinces => RegionPreset {
                center: GeoPoint::new(56.0, -96.0),
                camera_distance: 2.0,
                pan_bounds_deg: (16.0, 32.0),
                fov_override_rad: None,
            },
        }
    }
}

/// Normalize a longitude delta in degrees into `(-180, 180]`
fn wrap_lng_deg(delta: f32) -> f32 {
    let wrapped = (delta + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

impl RegionPreset {
    /// Clamp a point into this region's pan bounds
    ///
    /// Latitude clamps naively; longitude clamps on the shortest angular
    /// delta from the center, so bounds straddling the date line behave the
    /// same as any others.
    pub fn clamp_to_bounds(&self, point: GeoPoint) -> GeoPoint {
        let (lat_bound, lng_bound) = self.pan_bounds_deg;

        let lat = point
            .lat_deg
            .clamp(self.center.lat_deg - lat_bound, self.center.lat_deg + lat_bound)
            .clamp(-90.0, 90.0);

        let delta = wrap_lng_deg(point.lng_deg - self.center.lng_deg).clamp(-lng_bound, lng_bound);
        let lng = wrap_lng_deg(self.center.lng_deg + delta);

        GeoPoint::new(lat, lng)
    }
}
