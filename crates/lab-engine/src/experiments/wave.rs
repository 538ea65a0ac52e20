//! Two traces in antiphase, `y = A·sin(x/50 + 2·f·t)` and the same shifted by π.

use std::f32::consts::PI;

use glam::Vec2;

use crate::api::controls::{Control, ControlSchema, Params};
use crate::api::module::Simulation;
use crate::api::types::{ModuleId, SurfaceKind};
use crate::experiments::palette;
use crate::renderer::draw::{DrawList, Stroke};

/// Horizontal pixels per radian of phase.
const WAVELENGTH_SCALE: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaveState {
    pub time: f32,
}

/// Displacement of the primary trace at pixel column `x`.
pub fn displacement(x: f32, time: f32, frequency: f32, amplitude: f32, phase: f32) -> f32 {
    amplitude * (x / WAVELENGTH_SCALE + time * frequency * 2.0 + phase).sin()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Wave;

impl Simulation for Wave {
    type State = WaveState;

    fn id(&self) -> ModuleId {
        ModuleId::Wave
    }

    fn surface(&self) -> SurfaceKind {
        SurfaceKind::Canvas
    }

    fn controls(&self) -> ControlSchema {
        ControlSchema::new(vec![
            Control::range("frequency", "Frequency", 0.5, 3.0, 0.1, 1.0, "Hz"),
            Control::range("amplitude", "Amplitude", 20.0, 100.0, 1.0, 50.0, "px"),
        ])
    }

    fn initial_state(&self, _params: &Params) -> WaveState {
        WaveState::default()
    }

    fn step(&self, state: &WaveState, dt: f32, _params: &Params) -> WaveState {
        WaveState {
            time: state.time + dt,
        }
    }

    fn render(&self, state: &WaveState, params: &Params, out: &mut DrawList) {
        let frequency = params.get("frequency");
        let amplitude = params.get("amplitude");
        let center_y = out.height() / 2.0;
        let columns = out.width().max(0.0) as usize;

        for (phase, color) in [(0.0, palette::INDIGO), (PI, palette::PINK)] {
            let points = (0..columns)
                .map(|x| {
                    let x = x as f32;
                    Vec2::new(
                        x,
                        center_y + displacement(x, state.time, frequency, amplitude, phase),
                    )
                })
                .collect();
            out.polyline(points, Stroke::new(color, 3.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiments::testing::{approx, canvas};
    use crate::renderer::draw::DrawCmd;

    #[test]
    fn traces_cancel_everywhere() {
        for x in [0.0, 17.0, 250.0, 799.0] {
            let a = displacement(x, 1.3, 2.0, 60.0, 0.0);
            let b = displacement(x, 1.3, 2.0, 60.0, PI);
            assert!(approx(a + b, 0.0, 1e-3));
        }
    }

    #[test]
    fn time_only_advances() {
        let p = Wave.controls().defaults();
        let s = Wave.step(&Wave.initial_state(&p), 0.016, &p);
        assert!(approx(s.time, 0.016, 1e-7));
    }

    #[test]
    fn renders_two_full_width_traces() {
        let p = Wave.controls().defaults();
        let mut list = canvas();
        Wave.render(&Wave.initial_state(&p), &p, &mut list);
        let traces: Vec<_> = list
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Polyline { points, stroke } => Some((points.len(), stroke.color)),
                _ => None,
            })
            .collect();
        assert_eq!(traces, vec![(800, palette::INDIGO), (800, palette::PINK)]);
    }
}
