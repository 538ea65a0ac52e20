//! Free fall from a chosen height.
//!
//! The model works in meters: the ball starts `height` meters above the
//! ground and falls with `fallen = g·t²/2`. Rendering maps the tallest drop
//! onto the free space above the ground band with one pixels-per-meter factor.

use glam::Vec2;

use crate::api::controls::{Control, ControlSchema, Params};
use crate::api::module::Simulation;
use crate::api::summary::Summary;
use crate::api::types::{ModuleId, SurfaceKind};
use crate::experiments::{palette, G};
use crate::renderer::draw::{DrawList, Stroke, TextAlign};

const MAX_HEIGHT: f32 = 300.0;
const GROUND_BAND: f32 = 50.0;
/// Headroom kept free above the tallest drop.
const HEADROOM: f32 = 100.0;
const BURST_PARTICLES: usize = 10;
const BURST_RADIUS: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallState {
    /// Meters fallen so far.
    pub fallen: f32,
    pub velocity: f32,
    pub time: f32,
    /// Drop height captured at initialization.
    pub height: f32,
}

impl FallState {
    pub fn landed(&self) -> bool {
        self.fallen >= self.height
    }
}

/// Impact speed for a drop of `height` meters.
pub fn final_velocity(height: f32) -> f32 {
    (2.0 * G * height).sqrt()
}

/// Time to fall `height` meters.
pub fn fall_time(height: f32) -> f32 {
    (2.0 * height / G).sqrt()
}

/// Ball diameter in pixels; display only.
fn ball_diameter(mass: f32) -> f32 {
    30.0 + 3.0 * mass
}

fn pixels_per_meter(surface_height: f32) -> f32 {
    ((surface_height - GROUND_BAND - HEADROOM) / MAX_HEIGHT).max(0.1)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Gravity;

impl Simulation for Gravity {
    type State = FallState;

    fn id(&self) -> ModuleId {
        ModuleId::Gravity
    }

    fn surface(&self) -> SurfaceKind {
        SurfaceKind::Dom
    }

    fn controls(&self) -> ControlSchema {
        ControlSchema::new(vec![
            Control::range("height", "Height", 50.0, MAX_HEIGHT, 1.0, 100.0, "m"),
            Control::range("mass", "Mass", 1.0, 10.0, 1.0, 1.0, "kg"),
        ])
    }

    fn initial_state(&self, params: &Params) -> FallState {
        FallState {
            fallen: 0.0,
            velocity: 0.0,
            time: 0.0,
            height: params.get("height"),
        }
    }

    fn step(&self, state: &FallState, dt: f32, _params: &Params) -> FallState {
        if state.landed() {
            return *state;
        }
        let time = state.time + dt;
        FallState {
            fallen: (0.5 * G * time * time).min(state.height),
            velocity: G * time,
            time,
            height: state.height,
        }
    }

    fn is_terminal(&self, state: &FallState, _params: &Params) -> bool {
        state.landed()
    }

    fn summary(&self, state: &FallState, _params: &Params) -> Option<Summary> {
        Some(Summary::Fall {
            height: state.height,
            final_velocity: final_velocity(state.height),
            fall_time: fall_time(state.height),
            measured_velocity: state.velocity,
            measured_time: state.time,
        })
    }

    fn render(&self, state: &FallState, params: &Params, out: &mut DrawList) {
        let size = out.size();
        let ground_y = size.y - GROUND_BAND;
        let ppm = pixels_per_meter(size.y);
        let center_x = size.x / 2.0;

        out.fill_rect(
            Vec2::new(0.0, ground_y),
            Vec2::new(size.x, GROUND_BAND),
            palette::EMERALD,
        );
        out.fill_rect(Vec2::new(0.0, ground_y), Vec2::new(size.x, 4.0), palette::FOREST);

        let marker_x = center_x - 80.0;
        let top = ground_y - state.height * ppm;
        out.line(
            Vec2::new(marker_x, top),
            Vec2::new(marker_x, ground_y),
            Stroke::new(palette::SLATE, 1.0).dashed(5.0, 5.0),
        );
        out.text(
            Vec2::new(marker_x - 8.0, (top + ground_y) / 2.0),
            format!("{:.0} m", state.height),
            13.0,
            palette::LABEL,
            TextAlign::Right,
        );

        let diameter = ball_diameter(params.get("mass"));
        let bottom = ground_y - (state.height - state.fallen) * ppm;
        let center = Vec2::new(center_x, bottom - diameter / 2.0);
        out.fill_circle(center, diameter / 2.0, palette::AMBER);
        out.stroke_circle(center, diameter / 2.0, Stroke::new(palette::ORANGE, 2.0));

        if state.landed() {
            let origin = Vec2::new(center_x, ground_y - 20.0);
            for i in 0..BURST_PARTICLES {
                let angle = i as f32 / BURST_PARTICLES as f32 * std::f32::consts::TAU;
                // Screen y grows downward; the burst fans upward.
                let offset = Vec2::new(angle.cos(), -angle.sin()) * BURST_RADIUS;
                out.fill_circle(origin + offset, 3.0, palette::AMBER.with_alpha(0.6));
            }
        }

        out.text(
            Vec2::new(16.0, 24.0),
            format!("t = {:.2} s   v = {:.2} m/s", state.time, state.velocity),
            14.0,
            palette::LABEL,
            TextAlign::Left,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::module::FRAME_DT;
    use crate::experiments::testing::{approx, canvas, circles, params};

    fn run_to_ground(params: &Params) -> FallState {
        let model = Gravity;
        let mut state = model.initial_state(params);
        for _ in 0..10_000 {
            if model.is_terminal(&state, params) {
                return state;
            }
            state = model.step(&state, FRAME_DT, params);
        }
        panic!("ball never landed");
    }

    #[test]
    fn closed_form_for_hundred_meters() {
        assert!(approx(final_velocity(100.0), (2.0f32 * 9.8 * 100.0).sqrt(), 1e-2));
        assert!(approx(final_velocity(100.0), 44.27, 1e-2));
        assert!(approx(fall_time(100.0), 4.52, 1e-2));
    }

    #[test]
    fn run_matches_closed_form_within_one_frame() {
        let schema = Gravity.controls();
        for height in [50.0, 100.0, 300.0] {
            let p = params(&schema, &[("height", height)]);
            let end = run_to_ground(&p);
            assert_eq!(end.fallen, height);
            assert!(end.time + 1e-4 >= fall_time(height));
            assert!(end.time - fall_time(height) <= FRAME_DT + 1e-4);
            assert!(approx(end.velocity, final_velocity(height), G * FRAME_DT + 1e-3));
        }
    }

    #[test]
    fn summary_reports_both_readings() {
        let schema = Gravity.controls();
        let p = params(&schema, &[("height", 200.0)]);
        let end = run_to_ground(&p);
        match Gravity.summary(&end, &p) {
            Some(Summary::Fall {
                height,
                final_velocity: v,
                fall_time: t,
                measured_time,
                ..
            }) => {
                assert_eq!(height, 200.0);
                assert!(approx(v, 62.61, 1e-2));
                assert!(approx(t, 6.39, 1e-2));
                assert_eq!(measured_time, end.time);
            }
            other => panic!("unexpected summary {other:?}"),
        }
    }

    #[test]
    fn height_is_captured_at_start() {
        let schema = Gravity.controls();
        let p = params(&schema, &[("height", 50.0)]);
        let state = Gravity.initial_state(&p);
        let later = params(&schema, &[("height", 300.0)]);
        let next = Gravity.step(&state, FRAME_DT, &later);
        assert_eq!(next.height, 50.0);
    }

    #[test]
    fn landed_ball_rests_on_ground_with_burst() {
        let schema = Gravity.controls();
        let p = params(&schema, &[("mass", 10.0)]);
        let end = run_to_ground(&p);
        let mut list = canvas();
        Gravity.render(&end, &p, &mut list);
        let found = circles(&list);
        let (ball, radius) = found[0];
        assert!(approx(ball.y + radius, 350.0, 1e-3));
        assert!(approx(radius, 30.0, 1e-3));
        assert_eq!(found.len(), 1 + BURST_PARTICLES);
    }

    #[test]
    fn initial_frame_has_no_burst() {
        let schema = Gravity.controls();
        let p = schema.defaults();
        let mut list = canvas();
        Gravity.render(&Gravity.initial_state(&p), &p, &mut list);
        assert_eq!(circles(&list).len(), 1);
    }
}
