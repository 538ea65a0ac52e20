//! Projectile launched from ground level.
//!
//! Position follows the closed form `x = vx·t`, `y = vy0·t - g·t²/2` in
//! meters. The run ends on the first frame at or below launch height, and the
//! landing point is clamped to the ground.

use glam::Vec2;

use crate::api::controls::{Control, ControlSchema, Params};
use crate::api::module::Simulation;
use crate::api::summary::Summary;
use crate::api::types::{ModuleId, SurfaceKind};
use crate::experiments::{palette, G};
use crate::renderer::draw::{DrawList, Stroke};

const GROUND_BAND: f32 = 50.0;
const LAUNCHER: Vec2 = Vec2::new(50.0, 100.0);
const BARREL: f32 = 30.0;
const MAX_PIXELS_PER_METER: f32 = 10.0;
const TRAIL_SAMPLES: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightState {
    /// Meters from the launcher; `y` up.
    pub position: Vec2,
    pub velocity: Vec2,
    pub time: f32,
    /// Highest `y` reached so far.
    pub peak: f32,
    /// Launch velocity captured at initialization.
    pub launch: Vec2,
}

impl FlightState {
    pub fn landed(&self) -> bool {
        self.time > 0.0 && self.position.y <= 0.0
    }
}

/// Closed-form `(max_height, range, flight_time)` for a ground-level launch.
pub fn ballistics(speed: f32, angle_deg: f32) -> (f32, f32, f32) {
    let angle = angle_deg.to_radians();
    let vy0 = speed * angle.sin();
    (
        vy0 * vy0 / (2.0 * G),
        speed * speed * (2.0 * angle).sin() / G,
        2.0 * vy0 / G,
    )
}

fn launch_velocity(params: &Params) -> Vec2 {
    let angle = params.get("angle").to_radians();
    Vec2::new(angle.cos(), angle.sin()) * params.get("velocity")
}

fn position_at(launch: Vec2, t: f32) -> Vec2 {
    Vec2::new(launch.x * t, launch.y * t - 0.5 * G * t * t)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Projectile;

impl Simulation for Projectile {
    type State = FlightState;

    fn id(&self) -> ModuleId {
        ModuleId::Projectile
    }

    fn surface(&self) -> SurfaceKind {
        SurfaceKind::Canvas
    }

    fn controls(&self) -> ControlSchema {
        ControlSchema::new(vec![
            Control::range("angle", "Launch Angle", 10.0, 80.0, 1.0, 45.0, "°"),
            Control::range("velocity", "Initial Velocity", 20.0, 100.0, 1.0, 50.0, "m/s"),
        ])
    }

    fn initial_state(&self, params: &Params) -> FlightState {
        let launch = launch_velocity(params);
        FlightState {
            position: Vec2::ZERO,
            velocity: launch,
            time: 0.0,
            peak: 0.0,
            launch,
        }
    }

    fn step(&self, state: &FlightState, dt: f32, _params: &Params) -> FlightState {
        if state.landed() {
            return *state;
        }
        let time = state.time + dt;
        let mut position = position_at(state.launch, time);
        let peak = state.peak.max(position.y);
        if position.y < 0.0 {
            position.y = 0.0;
        }
        FlightState {
            position,
            velocity: Vec2::new(state.launch.x, state.launch.y - G * time),
            time,
            peak,
            launch: state.launch,
        }
    }

    fn is_terminal(&self, state: &FlightState, _params: &Params) -> bool {
        state.landed()
    }

    fn summary(&self, state: &FlightState, _params: &Params) -> Option<Summary> {
        let speed = state.launch.length();
        let angle = state.launch.y.atan2(state.launch.x).to_degrees();
        let (max_height, range, flight_time) = ballistics(speed, angle);
        Some(Summary::Launch {
            max_height,
            range,
            flight_time,
            measured_range: state.position.x,
            measured_peak: state.peak,
            measured_time: state.time,
        })
    }

    fn render(&self, state: &FlightState, params: &Params, out: &mut DrawList) {
        let size = out.size();
        let origin = Vec2::new(LAUNCHER.x, size.y - LAUNCHER.y);

        out.fill_rect(
            Vec2::new(0.0, size.y - GROUND_BAND),
            Vec2::new(size.x, GROUND_BAND),
            palette::EMERALD,
        );

        // Barrel follows the live slider; the flight uses the captured launch.
        let aim = params.get("angle").to_radians();
        let muzzle = origin + Vec2::new(aim.cos(), -aim.sin()) * BARREL;
        out.line(origin, muzzle, Stroke::new(palette::SLATE, 5.0));
        out.fill_rect(origin - Vec2::splat(10.0), Vec2::splat(20.0), palette::SLATE_DARK);

        if state.time <= 0.0 {
            return;
        }

        let speed = state.launch.length();
        let angle = state.launch.y.atan2(state.launch.x).to_degrees();
        let (max_height, range, _) = ballistics(speed, angle);
        let scale = MAX_PIXELS_PER_METER
            .min((size.x - origin.x - 20.0) / range.max(1.0))
            .min((origin.y - 20.0) / max_height.max(1.0))
            .max(0.1);
        let to_screen = |p: Vec2| Vec2::new(origin.x + p.x * scale, origin.y - p.y.max(0.0) * scale);

        let trail = (0..=TRAIL_SAMPLES)
            .map(|i| {
                let t = state.time * i as f32 / TRAIL_SAMPLES as f32;
                to_screen(position_at(state.launch, t))
            })
            .collect();
        out.polyline(trail, Stroke::new(palette::INDIGO.with_alpha(0.5), 2.0));

        if !state.landed() {
            out.fill_circle(to_screen(state.position), 8.0, palette::AMBER);
        }
    }
}
