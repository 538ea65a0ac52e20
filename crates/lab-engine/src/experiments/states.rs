//! Solid, liquid and gas as particle clouds at a chosen temperature.

use glam::Vec2;

use crate::api::controls::{Control, ControlSchema, Params};
use crate::api::module::{Exhibit, ExhibitView, REFRESH_HZ};
use crate::api::summary::{Phase, Summary};
use crate::api::types::{ModuleId, SurfaceKind};
use crate::experiments::palette;
use crate::renderer::draw::{Color, DrawList, TextAlign};
use crate::systems::rng::Rng;

const SPAWN_BOX: f32 = 200.0;

/// How a phase is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseStyle {
    pub count: usize,
    /// Pixels per frame.
    pub speed: f32,
    pub size: f32,
    pub color: Color,
}

/// Melting at 0 °C and boiling at 100 °C, both exclusive of the lower phase.
pub fn phase(temperature: f32) -> Phase {
    if temperature < 0.0 {
        Phase::Solid
    } else if temperature < 100.0 {
        Phase::Liquid
    } else {
        Phase::Gas
    }
}

pub fn style(phase: Phase) -> PhaseStyle {
    match phase {
        Phase::Solid => PhaseStyle {
            count: 20,
            speed: 0.5,
            size: 8.0,
            color: palette::BLUE,
        },
        Phase::Liquid => PhaseStyle {
            count: 40,
            speed: 2.0,
            size: 6.0,
            color: palette::SKY,
        },
        Phase::Gas => PhaseStyle {
            count: 60,
            speed: 5.0,
            size: 4.0,
            color: palette::AMBER,
        },
    }
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Solid => "Solid",
        Phase::Liquid => "Liquid",
        Phase::Gas => "Gas",
    }
}

/// Fold `x` into `[lo, hi]` as if it bounced off both ends.
fn reflect(x: f32, lo: f32, hi: f32) -> f32 {
    let span = hi - lo;
    if span <= 0.0 {
        return lo;
    }
    let t = (x - lo).rem_euclid(2.0 * span);
    lo + if t > span { 2.0 * span - t } else { t }
}

/// Particle centers at `elapsed` seconds. Every particle replays its own
/// random stream, so the cloud is a pure function of the view.
pub fn particles(style: &PhaseStyle, view: &ExhibitView, size: Vec2) -> Vec<Vec2> {
    let center = size / 2.0;
    let r = style.size / 2.0;
    let frames = view.elapsed * REFRESH_HZ;
    (0..style.count)
        .map(|i| {
            let mut rng = Rng::stream(view.seed, i as u64);
            let start = center
                + Vec2::new(
                    rng.range(-SPAWN_BOX / 2.0, SPAWN_BOX / 2.0),
                    rng.range(-SPAWN_BOX / 2.0, SPAWN_BOX / 2.0),
                );
            let heading = Vec2::from_angle(rng.range(0.0, std::f32::consts::TAU));
            let p = start + heading * style.speed * frames;
            Vec2::new(reflect(p.x, r, size.x - r), reflect(p.y, r, size.y - r))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct States;

impl Exhibit for States {
    fn id(&self) -> ModuleId {
        ModuleId::States
    }

    fn surface(&self) -> SurfaceKind {
        SurfaceKind::Dom
    }

    fn controls(&self) -> ControlSchema {
        ControlSchema::new(vec![Control::range(
            "temperature",
            "Temperature",
            -50.0,
            150.0,
            1.0,
            0.0,
            "°C",
        )])
    }

    fn animated(&self) -> bool {
        true
    }

    fn readout(&self, params: &Params) -> Option<Summary> {
        let temperature = params.get("temperature");
        Some(Summary::Matter {
            phase: phase(temperature),
            temperature,
        })
    }

    fn render(&self, params: &Params, view: &ExhibitView, out: &mut DrawList) {
        let temperature = params.get("temperature");
        let phase = phase(temperature);
        let style = style(phase);
        for p in particles(&style, view, out.size()) {
            out.fill_circle(p, style.size / 2.0, style.color);
        }
        out.text(
            Vec2::new(out.width() / 2.0, out.height() - 20.0),
            format!("State: {} | Temperature: {temperature}°C", phase_name(phase)),
            14.0,
            palette::LABEL,
            TextAlign::Center,
        );
    }
}
