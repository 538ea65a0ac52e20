//! A box pushed with a constant 100 N along a 650 m track.
//!
//! The track is the distance the box covers on the default 800 px surface
//! (start 50 px in, stop 100 px short of the right edge) at one meter per
//! pixel, so final velocities match what the page has always reported.

use glam::Vec2;

use crate::api::controls::{Control, ControlSchema, Params};
use crate::api::module::Simulation;
use crate::api::summary::Summary;
use crate::api::types::{ModuleId, SurfaceKind};
use crate::experiments::{palette, G};
use crate::renderer::draw::{Color, DrawList, TextAlign};

pub const PUSH_FORCE: f32 = 100.0;
pub const TRACK_LENGTH: f32 = 650.0;
const STEP: f32 = 0.1;
const SURFACE_BAND: f32 = 60.0;
const TRACK_START: f32 = 50.0;

const SURFACES: [(f32, &str); 4] = [(0.1, "Ice"), (0.3, "Wood"), (0.6, "Concrete"), (0.9, "Rubber")];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideState {
    /// Meters along the track.
    pub position: f32,
    pub velocity: f32,
    pub time: f32,
    /// Friction coefficient captured at initialization.
    pub mu: f32,
    /// Mass captured at initialization.
    pub mass: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forces {
    pub friction: f32,
    pub net: f32,
    pub acceleration: f32,
}

pub fn forces(mu: f32, mass: f32) -> Forces {
    let friction = mu * mass * G;
    let net = PUSH_FORCE - friction;
    Forces {
        friction,
        net,
        acceleration: net / mass,
    }
}

fn surface_color(mu: f32) -> Color {
    let near = |v: f32| (mu - v).abs() < 1e-3;
    if near(0.1) {
        Color::hex(0xe0f2fe)
    } else if near(0.3) {
        Color::hex(0x78716c)
    } else if near(0.6) {
        Color::hex(0x57534e)
    } else {
        Color::hex(0x1c1917)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Friction;

impl Simulation for Friction {
    type State = SlideState;

    fn id(&self) -> ModuleId {
        ModuleId::Friction
    }

    fn surface(&self) -> SurfaceKind {
        SurfaceKind::Dom
    }

    fn controls(&self) -> ControlSchema {
        ControlSchema::new(vec![
            Control::choice("surface", "Surface Type", &SURFACES, 0.1, "μ"),
            Control::range("mass", "Mass", 1.0, 10.0, 1.0, 5.0, "kg"),
        ])
    }

    fn dt(&self) -> f32 {
        STEP
    }

    fn initial_state(&self, params: &Params) -> SlideState {
        SlideState {
            position: 0.0,
            velocity: 0.0,
            time: 0.0,
            mu: params.get("surface"),
            mass: params.get("mass"),
        }
    }

    fn step(&self, state: &SlideState, dt: f32, params: &Params) -> SlideState {
        let f = forces(state.mu, state.mass);
        if f.net <= 0.0 || self.is_terminal(state, params) {
            return SlideState {
                velocity: if f.net <= 0.0 { 0.0 } else { state.velocity },
                ..*state
            };
        }
        let velocity = state.velocity + f.acceleration * dt;
        SlideState {
            position: (state.position + velocity * dt).min(TRACK_LENGTH),
            velocity,
            time: state.time + dt,
            ..*state
        }
    }

    fn is_terminal(&self, state: &SlideState, _params: &Params) -> bool {
        state.position >= TRACK_LENGTH || forces(state.mu, state.mass).net <= 0.0
    }

    fn summary(&self, state: &SlideState, _params: &Params) -> Option<Summary> {
        let f = forces(state.mu, state.mass);
        Some(Summary::Slide {
            friction_force: f.friction,
            net_force: f.net,
            acceleration: f.acceleration,
            final_velocity: state.velocity,
        })
    }

    fn render(&self, state: &SlideState, params: &Params, out: &mut DrawList) {
        let size = out.size();
        let mu = params.get("surface");
        let mass = params.get("mass");
        let floor = size.y - SURFACE_BAND;

        out.fill_rect(
            Vec2::new(0.0, floor),
            Vec2::new(size.x, SURFACE_BAND),
            surface_color(mu),
        );
        out.text(
            Vec2::new(size.x / 2.0, size.y - 20.0),
            format!("μ = {mu} | Friction Force = {:.1}N", forces(mu, mass).friction),
            14.0,
            palette::LABEL,
            TextAlign::Center,
        );

        let side = 40.0 + 5.0 * mass;
        let travel = (size.x - TRACK_START - 50.0 - side).max(0.0);
        let x = TRACK_START + state.position / TRACK_LENGTH * travel;
        out.fill_round_rect(
            Vec2::new(x, floor - side),
            Vec2::splat(side),
            5.0,
            palette::INDIGO,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiments::testing::{approx, canvas, params, texts};

    #[test]
    fn ice_five_kilograms() {
        let f = forces(0.1, 5.0);
        assert!(approx(f.friction, 4.9, 1e-4));
        assert!(approx(f.net, 95.1, 1e-4));
        assert!(approx(f.acceleration, 19.02, 1e-4));
    }

    #[test]
    fn rubber_ten_kilograms() {
        let f = forces(0.9, 10.0);
        assert!(approx(f.friction, 88.2, 1e-3));
        assert!(approx(f.net, 11.8, 1e-3));
        assert!(approx(f.acceleration, 1.18, 1e-4));
    }

    #[test]
    fn every_schema_combination_moves() {
        let schema = Friction.controls();
        for (mu, _) in SURFACES {
            for mass in 1..=10 {
                let p = params(&schema, &[("surface", mu), ("mass", mass as f32)]);
                let state = Friction.initial_state(&p);
                assert!(forces(state.mu, state.mass).net > 0.0);
            }
        }
    }

    #[test]
    fn slides_to_track_end() {
        let p = Friction.controls().defaults();
        let mut state = Friction.initial_state(&p);
        let mut frames = 0;
        while !Friction.is_terminal(&state, &p) {
            state = Friction.step(&state, STEP, &p);
            frames += 1;
            assert!(frames < 10_000);
        }
        assert_eq!(state.position, TRACK_LENGTH);
        // v = a·t under explicit Euler.
        assert!(approx(state.velocity, 19.02 * state.time, 1e-2));
        match Friction.summary(&state, &p) {
            Some(Summary::Slide { final_velocity, .. }) => assert_eq!(final_velocity, state.velocity),
            other => panic!("unexpected summary {other:?}"),
        }
    }

    #[test]
    fn final_velocity_reflects_full_track() {
        let p = Friction.controls().defaults();
        let mut state = Friction.initial_state(&p);
        while !Friction.is_terminal(&state, &p) {
            state = Friction.step(&state, STEP, &p);
        }
        // Within one step of the continuous v = sqrt(2·a·d).
        let a = forces(0.1, 5.0).acceleration;
        let ideal = (2.0 * a * TRACK_LENGTH).sqrt();
        assert!((state.velocity - ideal).abs() <= a * STEP, "{} vs {ideal}", state.velocity);
        assert!(state.velocity > 150.0);
    }

    #[test]
    fn stalled_push_ends_at_rest() {
        let p = Friction.controls().defaults();
        let stalled = SlideState {
            mu: 2.0,
            mass: 10.0,
            ..Friction.initial_state(&p)
        };
        assert!(Friction.is_terminal(&stalled, &p));
        let next = Friction.step(&stalled, STEP, &p);
        assert_eq!(next.velocity, 0.0);
        assert_eq!(next.position, 0.0);
    }

    #[test]
    fn label_and_surface_color() {
        let p = Friction.controls().defaults();
        let mut list = canvas();
        Friction.render(&Friction.initial_state(&p), &p, &mut list);
        assert_eq!(texts(&list), vec!["μ = 0.1 | Friction Force = 4.9N".to_string()]);
        assert_eq!(surface_color(0.9), Color::hex(0x1c1917));
    }
}
