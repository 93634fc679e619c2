//! Game entry point: fly a vehicle over the rendered globe
//!
//! Owns the frame loop and wires telemetry into the engine: vehicle
//! state drives the follow camera, frame timing drives the quality
//! governor, taps hit-test against region boundaries, and everything
//! meets in the globe renderer once per frame.

use globe_engine::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use winit::{
    event::{ElementState, Event, MouseButton, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowAttributes,
};

/// Simplified region boundary rings, generated offline from Natural Earth
/// admin data as (longitude, latitude) pairs
const REGION_BOUNDARIES: &str = include_str!("regions.json");

/// Degrees of arc the vehicle covers per second at full throttle
const MAX_SPEED_DEG_PER_SEC: f32 = 6.0;
/// Turn rate at full rudder
const TURN_RATE_RAD_PER_SEC: f32 = 1.2;
/// Throttle change per second of key hold
const THROTTLE_RATE_PER_SEC: f32 = 0.6;
/// Angular proximity that counts as arriving over the region center
const LANDING_PROXIMITY_DEG: f32 = 1.5;

/// The vehicle the camera follows; telemetry source for the engine
struct Vehicle {
    position: GeoPoint,
    heading_rad: f32,
    throttle: f32,
    low_altitude: bool,
}

impl Vehicle {
    fn new(start: GeoPoint) -> Self {
        Self {
            position: start,
            heading_rad: 0.0,
            throttle: 0.4,
            low_altitude: false,
        }
    }

    /// Steer and advance along a great circle, then clamp to the region
    fn update(&mut self, dt: f32, input: &InputState, preset: &RegionPreset) {
        if input.is_key_pressed(KeyCode::ArrowLeft) {
            self.heading_rad -= TURN_RATE_RAD_PER_SEC * dt;
        }
        if input.is_key_pressed(KeyCode::ArrowRight) {
            self.heading_rad += TURN_RATE_RAD_PER_SEC * dt;
        }
        if input.is_key_pressed(KeyCode::ArrowUp) {
            self.throttle = (self.throttle + THROTTLE_RATE_PER_SEC * dt).min(1.0);
        }
        if input.is_key_pressed(KeyCode::ArrowDown) {
            self.throttle = (self.throttle - THROTTLE_RATE_PER_SEC * dt).max(0.0);
        }
        self.heading_rad = geo::wrap_angle(self.heading_rad);

        let step_deg = self.throttle * MAX_SPEED_DEG_PER_SEC * dt;
        let advanced = geo::offset_by_bearing(self.position, self.heading_rad, step_deg);
        self.position = preset.clamp_to_bounds(advanced);
    }
}

/// Boundary ring lookup key for a region, if it has one
fn region_key(region: Region) -> Option<&'static str> {
    match region {
        Region::WholeGlobe => None,
        Region::UsStates => Some("us_states"),
        Region::UkCounties => Some("uk_counties"),
        Region::Ireland => Some("ireland"),
        Region::CanadianProvinces => Some("canadian_provinces"),
    }
}

fn load_boundaries() -> HashMap<String, Vec<(f32, f32)>> {
    let raw: HashMap<String, Vec<[f32; 2]>> =
        serde_json::from_str(REGION_BOUNDARIES).expect("embedded region data must parse");
    raw.into_iter()
        .map(|(name, ring)| {
            let ring = ring.into_iter().map(|[lng, lat]| (lng, lat)).collect();
            (name, ring)
        })
        .collect()
}

/// Per-frame view parameters derived from the region preset
fn view_snapshot(camera: &FollowCamera, preset: &RegionPreset) -> CameraSnapshot {
    let mut snapshot = camera.snapshot();
    if let Some(fov) = preset.fov_override_rad {
        snapshot.fov_rad = fov;
    }
    snapshot
}

fn main() {
    // Initialize logging
    globe_engine::init_logging();
    info!("Starting globe game");

    let boundaries = load_boundaries();

    // Create event loop and window
    let event_loop = EventLoop::builder()
        .build()
        .expect("Failed to create event loop");
    let window_attributes = WindowAttributes::default()
        .with_title("Globe Game")
        .with_inner_size(winit::dpi::PhysicalSize::new(1280, 720));

    #[allow(deprecated)] // Using create_window on EventLoop for simplicity
    let window = Arc::new(
        event_loop
            .create_window(window_attributes)
            .expect("Failed to create window"),
    );

    // Initialize the render context against the window surface
    let instance = wgpu::Instance::default();
    let surface = instance
        .create_surface(window.clone())
        .expect("Failed to create surface");
    let render_context = Arc::new(
        pollster::block_on(RenderContext::new(instance, Some(&surface)))
            .expect("Failed to create render context"),
    );

    let size = window.inner_size();
    let mut surface_config = render_context.create_surface_configuration(
        &surface,
        size.width.max(1),
        size.height.max(1),
    );
    surface.configure(&render_context.device, &surface_config);

    let mut renderer = GlobeRenderer::new(render_context.clone(), UniformBridge::new());

    // Kick off the background texture load; rendering falls back to a flat
    // clear until the required maps arrive
    let texture_config = TextureAssetConfig::default();
    if let Err(error) = texture_config.validate() {
        warn!(error = %error, "Texture assets incomplete; the globe will stay on the fallback render");
    }
    let mut textures = GlobeTextures::new(&render_context.device);
    let mut texture_loader = TextureLoader::start(&texture_config);

    // Game state
    let mut camera = FollowCamera::new();
    let mut governor = QualityGovernor::new();
    let mut input = InputState::new();

    let mut region = Region::WholeGlobe;
    let mut preset = region.preset();
    let mut vehicle = Vehicle::new(preset.center);
    let mut landed = false;

    let started = Instant::now();
    let mut last_time = Instant::now();

    info!(region = region.label(), "Entering play area");

    // Run event loop
    #[allow(deprecated)] // Using the simpler closure-based API for now
    let _ = event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("Window close requested");
                    elwt.exit();
                }
                WindowEvent::Resized(physical_size) => {
                    info!("Window resized to {:?}", physical_size);
                    if physical_size.width > 0 && physical_size.height > 0 {
                        surface_config.width = physical_size.width;
                        surface_config.height = physical_size.height;
                        surface.configure(&render_context.device, &surface_config);
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    // Discrete actions fire on the initial press only
                    if event.state == ElementState::Pressed && !event.repeat {
                        match event.physical_key {
                            PhysicalKey::Code(KeyCode::Space) => {
                                vehicle.low_altitude = !vehicle.low_altitude;
                                info!(low_altitude = vehicle.low_altitude, "Altitude mode toggled");
                            }
                            PhysicalKey::Code(KeyCode::KeyR) => {
                                let next = (Region::ALL
                                    .iter()
                                    .position(|&r| r == region)
                                    .unwrap_or(0)
                                    + 1)
                                    % Region::ALL.len();
                                region = Region::ALL[next];
                                preset = region.preset();
                                vehicle = Vehicle::new(preset.center);
                                landed = false;
                                // Snap instead of flying across the globe
                                camera.reset();
                                info!(region = region.label(), "Entering play area");
                            }
                            PhysicalKey::Code(KeyCode::Digit1) => {
                                governor.force_level(QualityLevel::High);
                            }
                            PhysicalKey::Code(KeyCode::Digit2) => {
                                governor.force_level(QualityLevel::Medium);
                            }
                            PhysicalKey::Code(KeyCode::Digit3) => {
                                governor.force_level(QualityLevel::Low);
                            }
                            _ => {}
                        }
                    }
                    input.handle_keyboard_event(&event);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input.set_mouse_position(position.x as f32, position.y as f32);
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    if state == ElementState::Pressed && button == MouseButton::Left {
                        let viewport = Vec2::new(
                            surface_config.width as f32,
                            surface_config.height as f32,
                        );
                        let tap = Vec2::new(input.mouse_position.0, input.mouse_position.1);
                        let snapshot = view_snapshot(&camera, &preset);
                        match picking::unproject(tap, viewport, &snapshot) {
                            Some(hit) => {
                                let inside = region_key(region)
                                    .and_then(|key| boundaries.get(key))
                                    .map(|ring| picking::point_in_polygon(hit, ring))
                                    .unwrap_or(false);
                                info!(
                                    lat = hit.lat_deg,
                                    lng = hit.lng_deg,
                                    inside_region = inside,
                                    "Tap hit the globe"
                                );
                            }
                            None => info!("Tap missed the globe"),
                        }
                    }
                    input.handle_mouse_button(button, state);
                }
                WindowEvent::RedrawRequested => {
                    // Skip rendering if window is minimized
                    if surface_config.width == 0 || surface_config.height == 0 {
                        return;
                    }

                    let now = Instant::now();
                    let dt = (now - last_time).as_secs_f32();
                    last_time = now;

                    governor.record_frame_time(dt);

                    vehicle.update(dt, &input, &preset);
                    camera.update(
                        dt,
                        vehicle.position.lat_deg,
                        vehicle.position.lng_deg,
                        vehicle.low_altitude,
                        vehicle.throttle,
                        vehicle.heading_rad,
                    );

                    // Landing / proximity signal over the region center
                    let center_distance = geo::haversine_deg(vehicle.position, preset.center);
                    let over_center =
                        vehicle.low_altitude && center_distance < LANDING_PROXIMITY_DEG;
                    if over_center && !landed {
                        info!(
                            region = region.label(),
                            distance_deg = center_distance,
                            "Arrived over region center"
                        );
                    }
                    landed = over_center;

                    // Textures decoded in the background get uploaded here
                    let decoded = texture_loader.poll();
                    if !decoded.is_empty() {
                        for texture in decoded {
                            textures.upload(
                                &render_context.device,
                                &render_context.queue,
                                texture,
                            );
                        }
                        renderer.invalidate_textures();
                    }

                    let elapsed = started.elapsed().as_secs_f32();
                    // Slowly precessing sun, tilted a little north
                    let sun = Vec3::new(
                        (elapsed * 0.02).cos(),
                        0.35,
                        (elapsed * 0.02).sin(),
                    );

                    let viewport = Vec2::new(
                        surface_config.width as f32,
                        surface_config.height as f32,
                    );
                    let snapshot = view_snapshot(&camera, &preset);
                    match renderer.render(
                        &surface,
                        viewport,
                        &snapshot,
                        sun,
                        elapsed,
                        governor.params(),
                        &textures,
                    ) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            info!("Surface lost, reconfiguring");
                            surface.configure(&render_context.device, &surface_config);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            elwt.exit();
                        }
                        Err(e) => {
                            tracing::error!(error = ?e, "Render error");
                        }
                    }

                    input.clear_frame_data();
                }
                _ => {}
            },
            Event::AboutToWait => {
                // Request redraw
                window.request_redraw();
            }
            _ => {}
        }
    });
}
