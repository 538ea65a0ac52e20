//! Damped nonlinear pendulum.

use glam::Vec2;

use crate::api::controls::{Control, ControlSchema, Params};
use crate::api::module::Simulation;
use crate::api::summary::Summary;
use crate::api::types::{ModuleId, SurfaceKind};
use crate::experiments::{palette, G};
use crate::renderer::draw::{Color, DrawList, Stroke};

/// Per-step angular velocity retention.
pub const DAMPING: f32 = 0.998;
const PIVOT_Y: f32 = 50.0;
/// Rod pixels per centimeter of length.
const ROD_SCALE: f32 = 2.0;
const BOB_RADIUS: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingState {
    /// Radians from vertical; positive swings right.
    pub angle: f32,
    pub angular_velocity: f32,
    pub time: f32,
    /// Rod length in meters, captured at initialization.
    pub length: f32,
}

/// Small-angle period of a pendulum of `length` meters.
pub fn period(length: f32) -> f32 {
    std::f32::consts::TAU * (length / G).sqrt()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Pendulum;

impl Simulation for Pendulum {
    type State = SwingState;

    fn id(&self) -> ModuleId {
        ModuleId::Pendulum
    }

    fn surface(&self) -> SurfaceKind {
        SurfaceKind::Dom
    }

    fn controls(&self) -> ControlSchema {
        ControlSchema::new(vec![
            Control::range("length", "Length", 50.0, 200.0, 1.0, 100.0, "cm"),
            Control::range("angle", "Angle", 10.0, 60.0, 1.0, 30.0, "°"),
        ])
    }

    fn initial_state(&self, params: &Params) -> SwingState {
        SwingState {
            angle: params.get("angle").to_radians(),
            angular_velocity: 0.0,
            time: 0.0,
            length: params.get("length") / 100.0,
        }
    }

    fn step(&self, state: &SwingState, dt: f32, _params: &Params) -> SwingState {
        let alpha = -(G / state.length) * state.angle.sin();
        let angular_velocity = state.angular_velocity + alpha * dt;
        SwingState {
            angle: state.angle + angular_velocity * dt,
            angular_velocity: angular_velocity * DAMPING,
            time: state.time + dt,
            length: state.length,
        }
    }

    fn readout(&self, params: &Params) -> Option<Summary> {
        let length = params.get("length") / 100.0;
        Some(Summary::Pendulum {
            length,
            period: period(length),
        })
    }

    fn render(&self, state: &SwingState, _params: &Params, out: &mut DrawList) {
        let pivot = Vec2::new(out.width() / 2.0, PIVOT_Y);
        let rod = state.length * 100.0 * ROD_SCALE;
        let bob = pivot + Vec2::new(state.angle.sin(), state.angle.cos()) * rod;

        out.fill_rect(pivot - Vec2::new(30.0, 6.0), Vec2::new(60.0, 6.0), palette::SLATE_DARK);
        out.line(pivot, bob, Stroke::new(palette::SLATE, 2.0));
        out.fill_circle(bob, BOB_RADIUS, palette::INDIGO);
        out.stroke_circle(bob, BOB_RADIUS, Stroke::new(Color::hex(0x4f46e5), 2.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::module::FRAME_DT;
    use crate::experiments::testing::{approx, canvas, circles, params};

    #[test]
    fn readout_period() {
        let p = Pendulum.controls().defaults();
        match Pendulum.readout(&p) {
            Some(Summary::Pendulum { length, period }) => {
                assert_eq!(length, 1.0);
                assert!(approx(period, 2.007, 1e-3));
            }
            other => panic!("unexpected readout {other:?}"),
        }
    }

    #[test]
    fn first_step_accelerates_towards_vertical() {
        let p = Pendulum.controls().defaults();
        let s0 = Pendulum.initial_state(&p);
        let s1 = Pendulum.step(&s0, FRAME_DT, &p);
        assert!(s1.angle < s0.angle);
        assert!(s1.angular_velocity < 0.0);
        let expected = -(G / 1.0) * 30f32.to_radians().sin() * FRAME_DT;
        assert!(approx(s1.angular_velocity, expected * DAMPING, 1e-6));
    }

    #[test]
    fn amplitude_decays() {
        let p = Pendulum.controls().defaults();
        let mut state = Pendulum.initial_state(&p);
        let start = state.angle.abs();
        let mut late_peak: f32 = 0.0;
        for i in 0..3000 {
            state = Pendulum.step(&state, FRAME_DT, &p);
            if i > 2500 {
                late_peak = late_peak.max(state.angle.abs());
            }
        }
        assert!(late_peak < start * 0.5, "late peak {late_peak}");
        assert!(state.angle.is_finite());
    }

    #[test]
    fn swings_through_vertical_near_quarter_period() {
        let p = Pendulum.controls().defaults();
        let mut state = Pendulum.initial_state(&p);
        while state.angle > 0.0 {
            state = Pendulum.step(&state, FRAME_DT, &p);
        }
        // Large-amplitude period runs slightly long; a quarter is about 0.5 s.
        assert!(approx(state.time, period(1.0) / 4.0, 0.05), "t = {}", state.time);
    }

    #[test]
    fn bob_hangs_rod_length_below_pivot() {
        let schema = Pendulum.controls();
        let p = params(&schema, &[("length", 150.0), ("angle", 10.0)]);
        let mut state = Pendulum.initial_state(&p);
        state.angle = 0.0;
        let mut list = canvas();
        Pendulum.render(&state, &p, &mut list);
        let (bob, r) = circles(&list)[0];
        assert_eq!(r, BOB_RADIUS);
        assert!(approx(bob.x, 400.0, 1e-3));
        assert!(approx(bob.y, PIVOT_Y + 300.0, 1e-3));
    }
}
