//! A speaker emitting a longitudinal wave, shown as a transverse trace plus
//! compression and rarefaction bands.

use std::f32::consts::PI;

use glam::Vec2;

use crate::api::controls::{Control, ControlSchema, Params};
use crate::api::module::Simulation;
use crate::api::summary::Summary;
use crate::api::types::{ModuleId, SurfaceKind};
use crate::experiments::palette;
use crate::renderer::draw::{Color, DrawList, Stroke};

/// Speed of sound in air, m/s.
pub const SPEED_OF_SOUND: f32 = 343.0;
const WAVE_START: f32 = 100.0;
const ZONES: usize = 10;
const ZONE_PITCH: f32 = 80.0;
const ZONE_WIDTH: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SoundState {
    pub time: f32,
}

/// `(wavelength, period)` of a tone of `frequency` Hz.
pub fn tone(frequency: f32) -> (f32, f32) {
    (SPEED_OF_SOUND / frequency, 1.0 / frequency)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sound;

impl Simulation for Sound {
    type State = SoundState;

    fn id(&self) -> ModuleId {
        ModuleId::Sound
    }

    fn surface(&self) -> SurfaceKind {
        SurfaceKind::Canvas
    }

    fn controls(&self) -> ControlSchema {
        ControlSchema::new(vec![
            Control::range("frequency", "Frequency", 100.0, 1000.0, 1.0, 440.0, "Hz"),
            Control::range("amplitude", "Amplitude", 10.0, 100.0, 1.0, 50.0, "%"),
        ])
    }

    fn initial_state(&self, _params: &Params) -> SoundState {
        SoundState::default()
    }

    fn step(&self, state: &SoundState, dt: f32, _params: &Params) -> SoundState {
        SoundState {
            time: state.time + dt,
        }
    }

    fn readout(&self, params: &Params) -> Option<Summary> {
        let frequency = params.get("frequency");
        let (wavelength, period) = tone(frequency);
        Some(Summary::Sound {
            frequency,
            wavelength,
            period,
        })
    }

    fn render(&self, state: &SoundState, params: &Params, out: &mut DrawList) {
        let frequency = params.get("frequency");
        let amplitude = params.get("amplitude");
        let center_y = out.height() / 2.0;
        let width = out.width();
        let phase = state.time * frequency / 10.0;
        let drift = phase.sin() * 20.0;

        for i in 0..ZONES {
            let x = WAVE_START + i as f32 * ZONE_PITCH + drift;
            out.fill_rect(
                Vec2::new(x, center_y - amplitude),
                Vec2::new(ZONE_WIDTH, amplitude * 2.0),
                Color::rgba(99, 102, 241, 0.3),
            );
        }
        for i in 0..ZONES {
            let x = WAVE_START + 20.0 + i as f32 * ZONE_PITCH + drift;
            out.fill_rect(
                Vec2::new(x, center_y - amplitude / 2.0),
                Vec2::new(ZONE_WIDTH, amplitude),
                Color::rgba(236, 72, 153, 0.2),
            );
        }

        let start = WAVE_START as usize;
        let end = width.max(0.0) as usize;
        let points = (start..end)
            .map(|x| {
                let x = x as f32;
                Vec2::new(x, center_y + ((x / 50.0 + phase) * PI).sin() * amplitude)
            })
            .collect();
        out.polyline(points, Stroke::new(palette::SKY, 3.0));

        out.fill_rect(
            Vec2::new(50.0, center_y - 30.0),
            Vec2::new(40.0, 60.0),
            palette::SLATE_DARK,
        );
        out.fill_circle(Vec2::new(50.0, center_y), 20.0, palette::INDIGO);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiments::testing::{approx, canvas};
    use crate::renderer::draw::DrawCmd;

    #[test]
    fn concert_a() {
        let (wavelength, period) = tone(440.0);
        assert!(approx(wavelength, 0.7795, 1e-4));
        assert!(approx(period, 0.002_272_7, 1e-6));
    }

    #[test]
    fn readout_follows_slider() {
        let p = Sound.controls().defaults();
        match Sound.readout(&p) {
            Some(Summary::Sound { frequency, .. }) => assert_eq!(frequency, 440.0),
            other => panic!("unexpected readout {other:?}"),
        }
    }

    #[test]
    fn ten_bands_of_each_kind() {
        let p = Sound.controls().defaults();
        let mut list = canvas();
        Sound.render(&SoundState { time: 0.3 }, &p, &mut list);
        let bands = list
            .iter()
            .filter(|c| matches!(c, DrawCmd::FillRect { color, .. } if color.a < 1.0))
            .count();
        assert_eq!(bands, 2 * ZONES);
    }

    #[test]
    fn trace_starts_right_of_speaker() {
        let p = Sound.controls().defaults();
        let mut list = canvas();
        Sound.render(&SoundState::default(), &p, &mut list);
        let first = list.iter().find_map(|c| match c {
            DrawCmd::Polyline { points, .. } => Some(points[0]),
            _ => None,
        });
        assert_eq!(first.map(|p| p.x), Some(WAVE_START));
    }
}
