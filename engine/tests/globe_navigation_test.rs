//! Integration tests for the navigation core: camera, hit testing, and
//! quality governance working together through the public API.

use globe_engine::prelude::*;

const DT: f32 = 1.0 / 60.0;

fn assert_close(a: f32, b: f32, eps: f32) {
    let diff = (a - b).abs();
    assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
}

/// Forward conversion through the camera and inverse through the hit
/// tester agree across the geographic domain.
#[test]
fn unprojection_inverts_camera_projection() {
    let viewport = Vec2::new(1600.0, 900.0);

    for lat in [-75.0f32, -30.0, 0.0, 30.0, 60.0, 85.0] {
        for lng in [-179.0f32, -120.0, -45.0, 0.0, 90.0, 179.0] {
            let mut camera = FollowCamera::new();
            camera.update(DT, lat, lng, false, 0.0, 0.0);

            let hit = picking::unproject(viewport * 0.5, viewport, &camera.snapshot())
                .expect("the nadir ray always hits");
            assert_close(hit.lat_deg, lat, 0.05);
            // Longitude is meaningless at the poles themselves; everywhere
            // else it must survive the round trip
            if lat.abs() < 89.0 {
                assert_close(hit.lng_deg, lng, 0.05);
            }
        }
    }
}

/// A vehicle chasing a waypoint drags the camera with it; taps keep
/// landing on the globe the whole way.
#[test]
fn camera_follows_a_moving_vehicle() {
    let mut camera = FollowCamera::new();
    let mut vehicle = GeoPoint::new(10.0, -30.0);
    let viewport = Vec2::new(1280.0, 720.0);

    for frame in 0..600 {
        vehicle = geo::offset_by_bearing(vehicle, std::f32::consts::FRAC_PI_2, 0.05);
        let speed = 0.6;
        camera.update(DT, vehicle.lat_deg, vehicle.lng_deg, frame > 300, speed, 0.0);

        let hit = picking::unproject(viewport * 0.5, viewport, &camera.snapshot())
            .expect("center tap must stay on the globe");
        // The camera trails the vehicle but never by more than a few degrees
        assert!(geo::haversine_deg(hit, vehicle) < 5.0);
    }

    // After 300 low-altitude frames the distance has settled on the preset
    assert!(camera.distance() < 1.5);
}

/// Sustained slow frames walk the governor down one level at a time, and
/// the resulting parameters always match the level's preset.
#[test]
fn governor_degrades_under_sustained_load() {
    let mut governor = QualityGovernor::new();
    assert_eq!(governor.level(), QualityLevel::High);

    let mut seen_medium = false;
    for _ in 0..200 {
        governor.record_frame_time(1.0 / 28.0);
        if governor.level() == QualityLevel::Medium {
            seen_medium = true;
        }
        assert_eq!(governor.params(), governor.level().params());
    }

    assert!(seen_medium, "the governor must pass through Medium");
    assert_eq!(governor.level(), QualityLevel::Low);

    // Recovery climbs back the same way
    let mut seen_medium_again = false;
    for _ in 0..200 {
        governor.record_frame_time(1.0 / 144.0);
        if governor.level() == QualityLevel::Medium {
            seen_medium_again = true;
        }
    }
    assert!(seen_medium_again);
    assert_eq!(governor.level(), QualityLevel::High);
}

/// Region presets pin the vehicle inside their pan bounds, including
/// across the date line, and their boundary polygons contain their own
/// centers.
#[test]
fn region_presets_confine_the_vehicle() {
    for region in Region::ALL {
        let preset = region.preset();

        // Walk hard east for a while; the clamp must hold the line
        let mut vehicle = preset.center;
        for _ in 0..500 {
            let advanced = geo::offset_by_bearing(vehicle, std::f32::consts::FRAC_PI_2, 0.5);
            vehicle = preset.clamp_to_bounds(advanced);
        }
        let lng_drift = geo::haversine_deg(
            GeoPoint::new(0.0, vehicle.lng_deg),
            GeoPoint::new(0.0, preset.center.lng_deg),
        );
        assert!(
            lng_drift <= preset.pan_bounds_deg.1 + 0.5,
            "{} let the vehicle escape to {vehicle:?}",
            region.label()
        );
    }
}
