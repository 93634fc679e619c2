//! Geographic math shared across the navigation core
//!
//! Every spherical↔Cartesian conversion in the engine goes through this
//! module so the coordinate convention stays consistent: the sphere is
//! centered at the origin, `y` is the world up axis, and a point at
//! latitude/longitude (in radians) maps to
//! `(cos(lat)·cos(lng), sin(lat), cos(lat)·sin(lng)) · radius`.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Globe radius in world units. All camera distances are expressed in
/// multiples of this (1.0 = surface).
pub const GLOBE_RADIUS: f32 = 1.0;

/// A geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north
    pub lat_deg: f32,
    /// Longitude in degrees, positive east
    pub lng_deg: f32,
}

impl GeoPoint {
    /// Create a new geographic point
    pub fn new(lat_deg: f32, lng_deg: f32) -> Self {
        Self { lat_deg, lng_deg }
    }
}

/// Convert spherical angles (radians) and a radius to a Cartesian position
pub fn geographic_to_cartesian(lat_rad: f32, lng_rad: f32, radius: f32) -> Vec3 {
    Vec3::new(
        lat_rad.cos() * lng_rad.cos() * radius,
        lat_rad.sin() * radius,
        lat_rad.cos() * lng_rad.sin() * radius,
    )
}

/// Convert a Cartesian position back to spherical angles (radians)
///
/// The inverse of [`geographic_to_cartesian`]. The input does not need to
/// be on the unit sphere; it is normalized first. A zero-length input
/// degenerates to (0, 0) rather than producing NaN.
pub fn cartesian_to_geographic(position: Vec3) -> (f32, f32) {
    let len = position.length();
    if len <= f32::EPSILON {
        return (0.0, 0.0);
    }
    let lat = (position.y / len).clamp(-1.0, 1.0).asin();
    let lng = position.z.atan2(position.x);
    (lat, lng)
}

/// Angular great-circle distance between two points, in degrees
///
/// Haversine formula. The result is an angle, not a physical length;
/// callers scale by whatever radius they care about.
pub fn haversine_deg(a: GeoPoint, b: GeoPoint) -> f32 {
    let lat_a = a.lat_deg.to_radians();
    let lat_b = b.lat_deg.to_radians();
    let d_lat = (b.lat_deg - a.lat_deg).to_radians();
    let d_lng = (b.lng_deg - a.lng_deg).to_radians();

    let h = (d_lat * 0.5).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lng * 0.5).sin().powi(2);
    let central = 2.0 * h.sqrt().clamp(0.0, 1.0).asin();
    central.to_degrees()
}

/// Normalize an angle in radians into `(-π, π]`
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Interpolate between two angles along the shortest arc
///
/// The difference is wrapped into `[-π, π]` before scaling, so easing a
/// longitude from 179° toward -179° crosses the date line instead of
/// sweeping the long way around.
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    wrap_angle(from + wrap_angle(to - from) * t)
}

/// Move a point along a great circle by a bearing and angular distance
///
/// Bearing is radians clockwise from north; distance is in degrees of
/// arc, matching [`haversine_deg`]. Used by callers to advance a vehicle
/// across the sphere.
pub fn offset_by_bearing(origin: GeoPoint, bearing_rad: f32, angular_deg: f32) -> GeoPoint {
    let lat1 = origin.lat_deg.to_radians();
    let lng1 = origin.lng_deg.to_radians();
    let delta = angular_deg.to_radians();

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing_rad.cos())
        .clamp(-1.0, 1.0)
        .asin();
    let lng2 = lng1
        + (bearing_rad.sin() * delta.sin() * lat1.cos())
            .atan2(delta.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(lat2.to_degrees(), wrap_angle(lng2).to_degrees())
}
