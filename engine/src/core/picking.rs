//! Screen-to-globe hit testing
//!
//! Stateless projection math: unprojecting a tap through a camera snapshot
//! onto the globe surface, and testing the resulting coordinate against
//! region boundary polygons. The unprojection is the exact inverse of the
//! spherical→Cartesian convention in [`crate::core::geo`]; the round-trip
//! is covered by tests.

use crate::core::camera::CameraSnapshot;
use crate::core::geo::{self, GeoPoint, GLOBE_RADIUS};
use glam::{Vec2, Vec3};

/// Below this squared length a basis vector is considered degenerate
const BASIS_EPSILON_SQ: f32 = 1e-10;

/// Map a screen point back onto the globe surface
///
/// `screen_px` is in pixels with the origin at the top-left; `viewport_px`
/// is the drawable size in pixels. Returns `None` when the tap misses the
/// globe, when the sphere lies behind the camera, or when the viewport is
/// degenerate. A miss is an expected outcome, not an error.
pub fn unproject(
    screen_px: Vec2,
    viewport_px: Vec2,
    camera: &CameraSnapshot,
) -> Option<GeoPoint> {
    if viewport_px.x <= 0.0 || viewport_px.y <= 0.0 {
        return None;
    }

    // Screen pixels to NDC: x in [-aspect, aspect], y in [-1, 1], y up
    let aspect = viewport_px.x / viewport_px.y;
    let ndc_x = (screen_px.x / viewport_px.x * 2.0 - 1.0) * aspect;
    let ndc_y = 1.0 - screen_px.y / viewport_px.y * 2.0;

    // Local ray through the pixel, looking down -z
    let tan_half_fov = (camera.fov_rad * 0.5).tan();
    let local = Vec3::new(ndc_x * tan_half_fov, ndc_y * tan_half_fov, -1.0);

    // Orthonormal camera basis; the camera always looks at the sphere center
    if camera.position.length_squared() < BASIS_EPSILON_SQ {
        return None;
    }
    let forward = (-camera.position).normalize();
    let mut right = forward.cross(camera.up);
    if right.length_squared() < BASIS_EPSILON_SQ {
        // Up is parallel to the view axis; fall back to a world-axis basis
        right = forward.cross(Vec3::Y);
        if right.length_squared() < BASIS_EPSILON_SQ {
            right = forward.cross(Vec3::X);
        }
    }
    let right = right.normalize();
    let true_up = right.cross(forward);

    let dir = (right * local.x + true_up * local.y + forward).normalize();

    // Ray-sphere intersection against the globe, sphere centered at origin
    let b = 2.0 * camera.position.dot(dir);
    let c = camera.position.length_squared() - GLOBE_RADIUS * GLOBE_RADIUS;
    let discriminant = b * b - 4.0 * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let t_near = (-b - sqrt_disc) * 0.5;
    let t_far = (-b + sqrt_disc) * 0.5;
    let t = if t_near >= 0.0 {
        t_near
    } else if t_far >= 0.0 {
        t_far
    } else {
        // Sphere entirely behind the camera
        return None;
    };

    let hit = camera.position + dir * t;
    let (lat_rad, lng_rad) = geo::cartesian_to_geographic(hit);
    Some(GeoPoint::new(lat_rad.to_degrees(), lng_rad.to_degrees()))
}

/// Test a geographic point against a closed polygon ring
///
/// Crossing-number over `(longitude, latitude)` vertex pairs; the ring
/// wraps last→first implicitly. Rings with fewer than three vertices are
/// never "inside". Edges whose two vertices share a latitude contribute no
/// crossing; a point on such an edge resolves through the remaining edges.
pub fn point_in_polygon(point: GeoPoint, ring: &[(f32, f32)]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let px = point.lng_deg;
    let py = point.lat_deg;

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];

        if (yi > py) != (yj > py) {
            let x_at = xi + (py - yi) / (yj - yi) * (xj - xi);
            if px < x_at {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::camera::FollowCamera;

    fn assert_close(a: f32, b: f32, eps: f32) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn snapshot_above(lat_deg: f32, lng_deg: f32) -> CameraSnapshot {
        let mut camera = FollowCamera::new();
        camera.update(1.0 / 60.0, lat_deg, lng_deg, false, 0.0, 0.0);
        camera.snapshot()
    }

    #[test]
    fn test_nadir_hit_returns_sub_camera_point() {
        let camera = snapshot_above(0.0, 0.0);
        let viewport = Vec2::new(800.0, 600.0);
        let hit = unproject(viewport * 0.5, viewport, &camera).expect("nadir ray must hit");
        assert_close(hit.lat_deg, 0.0, 1e-3);
        assert_close(hit.lng_deg, 0.0, 1e-3);
    }

    #[test]
    fn test_center_tap_round_trips_camera_sub_point() {
        let viewport = Vec2::new(1280.0, 720.0);
        for (lat, lng) in [(35.0, 139.0), (-41.3, 174.8), (51.5, -0.1), (-33.9, 18.4)] {
            let camera = snapshot_above(lat, lng);
            let hit = unproject(viewport * 0.5, viewport, &camera).expect("must hit");
            assert_close(hit.lat_deg, lat, 1e-2);
            assert_close(hit.lng_deg, lng, 1e-2);
        }
    }

    #[test]
    fn test_off_globe_tap_misses() {
        // From far away the globe subtends a few degrees; a corner tap with
        // a wide field of view points well off the limb
        let camera = CameraSnapshot {
            position: Vec3::new(10.0, 0.0, 0.0),
            up: Vec3::Y,
            fov_rad: 1.0,
        };
        let viewport = Vec2::new(100.0, 100.0);
        assert!(unproject(Vec2::ZERO, viewport, &camera).is_none());
    }

    #[test]
    fn test_zero_viewport_is_a_miss() {
        let camera = snapshot_above(0.0, 0.0);
        assert!(unproject(Vec2::ZERO, Vec2::ZERO, &camera).is_none());
        assert!(unproject(Vec2::ZERO, Vec2::new(800.0, 0.0), &camera).is_none());
    }

    #[test]
    fn test_degenerate_up_falls_back_to_world_axis() {
        // Up parallel to the view axis forces the fallback basis
        let camera = CameraSnapshot {
            position: Vec3::new(2.5, 0.0, 0.0),
            up: Vec3::X,
            fov_rad: 0.8,
        };
        let viewport = Vec2::new(640.0, 480.0);
        let hit = unproject(viewport * 0.5, viewport, &camera).expect("center must still hit");
        assert_close(hit.lat_deg, 0.0, 1e-3);
        assert_close(hit.lng_deg, 0.0, 1e-3);
    }

    #[test]
    fn test_edge_tap_hits_near_limb() {
        let camera = snapshot_above(0.0, 0.0);
        let viewport = Vec2::new(800.0, 800.0);
        // Halfway between the center and the top edge stays on the globe at
        // this altitude and returns a point north of the nadir
        let hit = unproject(Vec2::new(400.0, 200.0), viewport, &camera).expect("must hit");
        assert!(hit.lat_deg > 1.0);
        assert_close(hit.lng_deg, 0.0, 1e-2);
    }

    #[test]
    fn test_polygon_centroid_inside() {
        let quad = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        assert!(point_in_polygon(GeoPoint::new(5.0, 5.0), &quad));
    }

    #[test]
    fn test_polygon_far_outside() {
        let quad = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        assert!(!point_in_polygon(GeoPoint::new(5.0, 40.0), &quad));
        assert!(!point_in_polygon(GeoPoint::new(-40.0, 5.0), &quad));
    }

    #[test]
    fn test_polygon_under_three_vertices_never_inside() {
        assert!(!point_in_polygon(GeoPoint::new(0.0, 0.0), &[]));
        assert!(!point_in_polygon(GeoPoint::new(0.0, 0.0), &[(0.0, 0.0)]));
        assert!(!point_in_polygon(
            GeoPoint::new(0.0, 0.0),
            &[(-1.0, -1.0), (1.0, 1.0)]
        ));
    }

    #[test]
    fn test_polygon_concave() {
        // Arrowhead pointing east; the notch sits outside
        let ring = [(0.0, 0.0), (10.0, 5.0), (0.0, 10.0), (4.0, 5.0)];
        assert!(point_in_polygon(GeoPoint::new(5.0, 7.0), &ring));
        assert!(!point_in_polygon(GeoPoint::new(5.0, 2.0), &ring));
    }

    #[test]
    fn test_point_at_horizontal_edge_latitude() {
        // The bottom edge is horizontal and contributes no crossing; the
        // point on its latitude resolves through the slanted edges
        let ring = [(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)];
        assert!(point_in_polygon(GeoPoint::new(0.0, 5.0), &ring));
        assert!(!point_in_polygon(GeoPoint::new(0.0, 12.0), &ring));
    }
}
