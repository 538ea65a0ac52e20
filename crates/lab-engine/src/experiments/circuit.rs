//! Ohm's law on a single resistor.
//!
//! The electrical values are static. Electron markers are presentational:
//! one spawns every half second and crosses the wire in two seconds,
//! whatever the current.

use glam::Vec2;

use crate::api::controls::{Control, ControlSchema, Params};
use crate::api::module::Simulation;
use crate::api::summary::Summary;
use crate::api::types::{ModuleId, SurfaceKind};
use crate::experiments::palette;
use crate::renderer::draw::{Color, DrawList, Stroke, TextAlign};

pub const SPAWN_INTERVAL: f32 = 0.5;
pub const TRAVEL_TIME: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CircuitState {
    pub time: f32,
}

/// `(current, power)` for a supply of `voltage` across `resistance`.
pub fn ohm(voltage: f32, resistance: f32) -> (f32, f32) {
    let current = voltage / resistance;
    (current, voltage * current)
}

/// Most electrons on the wire at once.
const ON_WIRE: i64 = (TRAVEL_TIME / SPAWN_INTERVAL) as i64 + 1;

/// Travel fractions in `[0, 1)` of the electrons on the wire at `time`.
pub fn electron_progress(time: f32) -> Vec<f32> {
    let spawned = (time / SPAWN_INTERVAL).floor() as i64;
    let oldest = (spawned - ON_WIRE).max(1);
    (oldest..=spawned)
        .map(|k| (time - k as f32 * SPAWN_INTERVAL) / TRAVEL_TIME)
        .filter(|p| (0.0..1.0).contains(p))
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Circuit;

impl Simulation for Circuit {
    type State = CircuitState;

    fn id(&self) -> ModuleId {
        ModuleId::Circuit
    }

    fn surface(&self) -> SurfaceKind {
        SurfaceKind::Dom
    }

    fn controls(&self) -> ControlSchema {
        ControlSchema::new(vec![
            Control::range("voltage", "Voltage", 1.0, 12.0, 1.0, 9.0, "V"),
            Control::range("resistance", "Resistance", 5.0, 50.0, 1.0, 10.0, "Ω"),
        ])
    }

    fn initial_state(&self, _params: &Params) -> CircuitState {
        CircuitState::default()
    }

    fn step(&self, state: &CircuitState, dt: f32, _params: &Params) -> CircuitState {
        CircuitState {
            time: state.time + dt,
        }
    }

    fn readout(&self, params: &Params) -> Option<Summary> {
        let voltage = params.get("voltage");
        let resistance = params.get("resistance");
        let (current, power) = ohm(voltage, resistance);
        Some(Summary::Circuit {
            voltage,
            resistance,
            current,
            power,
        })
    }

    fn render(&self, state: &CircuitState, params: &Params, out: &mut DrawList) {
        let c = out.center();

        out.fill_round_rect(
            c + Vec2::new(-100.0, -25.0),
            Vec2::new(50.0, 50.0),
            5.0,
            palette::AMBER,
        );
        out.stroke_rect(
            c + Vec2::new(-100.0, -25.0),
            Vec2::new(50.0, 50.0),
            Stroke::new(Color::hex(0x78350f), 3.0),
        );
        out.fill_round_rect(
            c + Vec2::new(50.0, -15.0),
            Vec2::new(80.0, 30.0),
            5.0,
            palette::VIOLET,
        );
        for x in [-50.0, 130.0] {
            out.fill_rect(c + Vec2::new(x, 0.0), Vec2::new(100.0, 4.0), palette::AMBER);
        }

        out.text(
            c + Vec2::new(-75.0, 45.0),
            format!("{:.0} V", params.get("voltage")),
            14.0,
            palette::LABEL,
            TextAlign::Center,
        );
        out.text(
            c + Vec2::new(90.0, 35.0),
            format!("{:.0} Ω", params.get("resistance")),
            14.0,
            palette::LABEL,
            TextAlign::Center,
        );

        let from = c.x - 50.0;
        let to = c.x + 230.0;
        for progress in electron_progress(state.time) {
            let x = from + (to - from) * progress;
            out.fill_circle(Vec2::new(x + 4.0, c.y + 2.0), 4.0, palette::EMERALD);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiments::testing::{approx, canvas, circles, params};

    #[test]
    fn ohms_law() {
        let (i, p) = ohm(9.0, 10.0);
        assert!(approx(i, 0.9, 1e-6));
        assert!(approx(p, 8.1, 1e-5));
    }

    #[test]
    fn readout_uses_committed_values() {
        let schema = Circuit.controls();
        let p = params(&schema, &[("voltage", 12.0), ("resistance", 4.0)]);
        match Circuit.readout(&p) {
            Some(Summary::Circuit {
                resistance, current, ..
            }) => {
                assert_eq!(resistance, 5.0);
                assert!(approx(current, 2.4, 1e-6));
            }
            other => panic!("unexpected readout {other:?}"),
        }
    }

    #[test]
    fn electrons_spawn_every_half_second_and_live_two() {
        assert!(electron_progress(0.0).is_empty());
        assert!(electron_progress(0.49).is_empty());
        assert_eq!(electron_progress(0.75).len(), 1);
        // Spawned at 0.5, 1.0, ..., 3.0; the first two have arrived.
        let live = electron_progress(3.1);
        assert_eq!(live.len(), 4);
        assert!(live.iter().all(|p| (0.0..1.0).contains(p)));
    }

    #[test]
    fn long_runs_only_walk_the_wire() {
        // Hours in, the same four electrons are on the wire as after a few seconds.
        let live = electron_progress(10_000.25);
        assert_eq!(live.len(), 4);
        for (p, expected) in live.iter().zip([0.875, 0.625, 0.375, 0.125]) {
            assert!(approx(*p, expected, 1e-2), "{p} vs {expected}");
        }
    }

    #[test]
    fn idle_frame_has_no_electrons() {
        let p = Circuit.controls().defaults();
        let mut list = canvas();
        Circuit.render(&Circuit.initial_state(&p), &p, &mut list);
        assert!(circles(&list).is_empty());
    }
}
