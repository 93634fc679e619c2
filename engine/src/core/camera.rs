//! Vehicle-following orbital camera
//!
//! The camera orbits the globe directly above the vehicle, easing toward
//! per-frame targets derived from telemetry. All scalar state lives in
//! spherical terms (latitude, longitude, distance, heading); the Cartesian
//! position and up vector are recomputed from them every update so they can
//! never drift apart.

use crate::core::geo;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Camera distance from the sphere center in high-altitude mode, in globe radii
pub const HIGH_ALTITUDE_DISTANCE: f32 = 2.8;
/// Camera distance from the sphere center in low-altitude mode, in globe radii
pub const LOW_ALTITUDE_DISTANCE: f32 = 1.45;
/// Field of view at rest
pub const FOV_NARROW_RAD: f32 = 0.66;
/// Field of view at full speed
pub const FOV_WIDE_RAD: f32 = 0.92;

/// Exponential ease rate for the orbital position (per second)
const POSITION_EASE_RATE: f32 = 6.0;
/// Exponential ease rate for altitude transitions (per second)
const ALTITUDE_EASE_RATE: f32 = 2.2;
/// Exponential ease rate for field-of-view transitions (per second)
const FOV_EASE_RATE: f32 = 1.6;

/// Below this squared length the blended up vector is considered degenerate
const UP_EPSILON_SQ: f32 = 1e-8;

/// Frame-rate-independent interpolation weight
fn ease_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt.max(0.0)).exp()
}

/// Immutable camera state handed to picking and the uniform bridge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSnapshot {
    /// Camera position in world space
    pub position: Vec3,
    /// Heading-aligned unit up vector
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_rad: f32,
}

/// Orbital follow camera for the globe view
///
/// One instance per active game view, mutated only by its own [`update`]
/// from the owning frame loop.
///
/// [`update`]: FollowCamera::update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowCamera {
    distance: f32,
    lat_rad: f32,
    lng_rad: f32,
    heading_rad: f32,
    fov_rad: f32,
    #[serde(skip, default = "default_position")]
    position: Vec3,
    #[serde(skip, default = "default_up")]
    up: Vec3,
    first_update: bool,
}

fn default_position() -> Vec3 {
    Vec3::new(HIGH_ALTITUDE_DISTANCE, 0.0, 0.0)
}

fn default_up() -> Vec3 {
    Vec3::Y
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl FollowCamera {
    /// Create a camera at the initial high-altitude default
    pub fn new() -> Self {
        let mut camera = Self {
            distance: HIGH_ALTITUDE_DISTANCE,
            lat_rad: 0.0,
            lng_rad: 0.0,
            heading_rad: 0.0,
            fov_rad: FOV_NARROW_RAD,
            position: default_position(),
            up: default_up(),
            first_update: true,
        };
        camera.recompute_derived();
        camera
    }

    /// Return the camera to its initial defaults and re-arm the first-update snap
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance the camera toward the vehicle's current telemetry
    ///
    /// Called once per rendered frame. The first call snaps directly to the
    /// targets so a new session does not fly in from the defaults; every
    /// later call eases. Never fails; inputs are clamped to sane ranges.
    pub fn update(
        &mut self,
        dt: f32,
        vehicle_lat_deg: f32,
        vehicle_lng_deg: f32,
        low_altitude: bool,
        speed_fraction: f32,
        heading_rad: f32,
    ) {
        let target_lat = vehicle_lat_deg.clamp(-90.0, 90.0).to_radians();
        let target_lng = geo::wrap_angle(vehicle_lng_deg.to_radians());
        let target_heading = geo::wrap_angle(heading_rad);
        let target_distance = if low_altitude {
            LOW_ALTITUDE_DISTANCE
        } else {
            HIGH_ALTITUDE_DISTANCE
        };
        let speed = speed_fraction.clamp(0.0, 1.0);
        let target_fov = FOV_NARROW_RAD + (FOV_WIDE_RAD - FOV_NARROW_RAD) * speed;

        if self.first_update {
            self.lat_rad = target_lat;
            self.lng_rad = target_lng;
            self.heading_rad = target_heading;
            self.distance = target_distance;
            self.fov_rad = target_fov;
            self.first_update = false;
        } else {
            let k_pos = ease_factor(POSITION_EASE_RATE, dt);
            let k_alt = ease_factor(ALTITUDE_EASE_RATE, dt);
            let k_fov = ease_factor(FOV_EASE_RATE, dt);

            self.lat_rad += (target_lat - self.lat_rad) * k_pos;
            self.lng_rad = geo::lerp_angle(self.lng_rad, target_lng, k_pos);
            self.heading_rad = geo::lerp_angle(self.heading_rad, target_heading, k_pos);
            self.distance += (target_distance - self.distance) * k_alt;
            self.fov_rad += (target_fov - self.fov_rad) * k_fov;
        }

        self.distance = self
            .distance
            .clamp(LOW_ALTITUDE_DISTANCE, HIGH_ALTITUDE_DISTANCE);
        self.fov_rad = self.fov_rad.clamp(FOV_NARROW_RAD, FOV_WIDE_RAD);

        self.recompute_derived();
    }

    /// Recompute the Cartesian position and heading-aligned up vector from
    /// the spherical state
    fn recompute_derived(&mut self) {
        self.position = geo::geographic_to_cartesian(self.lat_rad, self.lng_rad, self.distance);

        let (sin_lat, cos_lat) = self.lat_rad.sin_cos();
        let (sin_lng, cos_lng) = self.lng_rad.sin_cos();

        // Local tangent frame at the camera's sub-point
        let east = Vec3::new(-sin_lng, 0.0, cos_lng);
        let north = Vec3::new(-sin_lat * cos_lng, cos_lat, -sin_lat * sin_lng);

        let blended = north * self.heading_rad.cos() + east * self.heading_rad.sin();
        self.up = if blended.length_squared() < UP_EPSILON_SQ {
            // Degenerate at the poles, where the tangent frame collapses
            Vec3::Y
        } else {
            blended.normalize()
        };
    }

    /// Snapshot the derived state for picking and uniform assembly
    pub fn snapshot(&self) -> CameraSnapshot {
        CameraSnapshot {
            position: self.position,
            up: self.up,
            fov_rad: self.fov_rad,
        }
    }

    /// Camera distance from the sphere center, in globe radii
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Current vertical field of view in radians
    pub fn fov_rad(&self) -> f32 {
        self.fov_rad
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Heading-aligned unit up vector
    pub fn up(&self) -> Vec3 {
        self.up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn assert_close(a: f32, b: f32, eps: f32) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn test_first_update_snaps_to_targets() {
        let mut camera = FollowCamera::new();
        camera.update(DT, 45.0, 90.0, true, 1.0, 0.5);

        assert_close(camera.distance(), LOW_ALTITUDE_DISTANCE, 1e-6);
        assert_close(camera.fov_rad(), FOV_WIDE_RAD, 1e-6);
        let (lat, lng) = crate::core::geo::cartesian_to_geographic(camera.position());
        assert_close(lat.to_degrees(), 45.0, 1e-3);
        assert_close(lng.to_degrees(), 90.0, 1e-3);
    }

    #[test]
    fn test_reset_rearms_snap() {
        let mut camera = FollowCamera::new();
        camera.update(DT, 10.0, 10.0, true, 0.0, 0.0);
        camera.reset();
        camera.update(DT, -30.0, 120.0, false, 0.0, 0.0);
        // A second first-update snap, not an eased step from the old state
        assert_close(camera.distance(), HIGH_ALTITUDE_DISTANCE, 1e-6);
    }

    #[test]
    fn test_distance_converges_monotonically_without_overshoot() {
        let mut camera = FollowCamera::new();
        camera.update(DT, 0.0, 0.0, false, 0.0, 0.0);

        let mut previous = camera.distance();
        for _ in 0..600 {
            camera.update(DT, 0.0, 0.0, true, 0.0, 0.0);
            let current = camera.distance();
            assert!(
                current <= previous + 1e-6,
                "distance moved away from target: {previous} -> {current}"
            );
            assert!(current >= LOW_ALTITUDE_DISTANCE - 1e-6, "overshot the target");
            previous = current;
        }
        // 10 simulated seconds is plenty to land within epsilon
        assert_close(camera.distance(), LOW_ALTITUDE_DISTANCE, 1e-3);
    }

    #[test]
    fn test_longitude_eases_through_date_line() {
        let mut camera = FollowCamera::new();
        camera.update(DT, 0.0, 179.0, false, 0.0, 0.0);

        camera.update(DT, 0.0, -179.0, false, 0.0, 0.0);
        let (_, lng) = crate::core::geo::cartesian_to_geographic(camera.position());
        let moved = crate::core::geo::wrap_angle(lng - 179.0f32.to_radians()).to_degrees();
        assert!(
            moved > 0.0 && moved < 2.0,
            "expected a small eastward step through the date line, moved {moved}°"
        );
    }

    #[test]
    fn test_low_altitude_scenario_at_origin() {
        let mut camera = FollowCamera::new();
        for _ in 0..600 {
            camera.update(DT, 0.0, 0.0, true, 0.0, 0.0);
        }
        let p = camera.position();
        assert_close(p.x, LOW_ALTITUDE_DISTANCE, 1e-3);
        assert_close(p.y, 0.0, 1e-3);
        assert_close(p.z, 0.0, 1e-3);
    }

    #[test]
    fn test_position_length_matches_distance() {
        let mut camera = FollowCamera::new();
        camera.update(DT, 33.0, -45.0, false, 0.5, 1.0);
        for _ in 0..30 {
            camera.update(DT, 33.5, -44.0, true, 0.8, 1.2);
        }
        assert_close(camera.position().length(), camera.distance(), 1e-4);
    }

    #[test]
    fn test_up_vector_unit_and_orthogonal() {
        let mut camera = FollowCamera::new();
        camera.update(DT, 40.0, 20.0, false, 0.0, 1.0);

        let up = camera.up();
        assert_close(up.length(), 1.0, 1e-5);
        let forward = (-camera.position()).normalize();
        assert_close(up.dot(forward), 0.0, 1e-5);
    }

    #[test]
    fn test_up_vector_stays_unit_at_pole() {
        let mut camera = FollowCamera::new();
        camera.update(DT, 90.0, 0.0, false, 0.0, 0.0);
        assert_close(camera.up().length(), 1.0, 1e-4);
    }

    #[test]
    fn test_speed_widens_fov() {
        let mut slow = FollowCamera::new();
        slow.update(DT, 0.0, 0.0, false, 0.0, 0.0);
        let mut fast = FollowCamera::new();
        fast.update(DT, 0.0, 0.0, false, 1.0, 0.0);

        assert_close(slow.fov_rad(), FOV_NARROW_RAD, 1e-6);
        assert_close(fast.fov_rad(), FOV_WIDE_RAD, 1e-6);
        assert!(fast.fov_rad() > slow.fov_rad());
    }

    #[test]
    fn test_speed_fraction_is_clamped() {
        let mut camera = FollowCamera::new();
        camera.update(DT, 0.0, 0.0, false, 7.0, 0.0);
        assert_close(camera.fov_rad(), FOV_WIDE_RAD, 1e-6);
    }

    #[test]
    fn test_distance_stays_above_surface() {
        use crate::core::geo::GLOBE_RADIUS;
        let camera = FollowCamera::new();
        assert!(camera.distance() > GLOBE_RADIUS);
        assert!(LOW_ALTITUDE_DISTANCE > GLOBE_RADIUS);
    }
}
