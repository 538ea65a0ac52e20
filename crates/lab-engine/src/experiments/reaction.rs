//! A beaker reaction: colored liquid plus a burst of rising product particles.
//!
//! The animation is presentational. Particle `k` of wave `w` replays its own
//! random stream, so any frame can be drawn from `elapsed` alone.

use glam::Vec2;

use crate::api::controls::{Control, ControlSchema, Params};
use crate::api::module::{Exhibit, ExhibitView};
use crate::api::summary::Summary;
use crate::api::types::{ModuleId, SurfaceKind};
use crate::experiments::palette;
use crate::extensions::easing::{fade_envelope, quad_out};
use crate::renderer::draw::{Color, DrawList, Stroke};
use crate::systems::rng::Rng;

pub const WAVES: usize = 50;
pub const PER_WAVE: usize = 3;
pub const WAVE_INTERVAL: f32 = 0.1;
pub const PARTICLE_LIFE: f32 = 1.3;
const FADE: f32 = 0.15;

pub struct ReactionKind {
    pub name: &'static str,
    pub equation: &'static str,
    pub liquid: Color,
    pub particle: Color,
}

pub const REACTIONS: [ReactionKind; 3] = [
    ReactionKind {
        name: "Acid-Base Neutralization",
        equation: "HCl + NaOH → NaCl + H₂O",
        liquid: palette::ORANGE,
        particle: palette::RED,
    },
    ReactionKind {
        name: "Precipitation",
        equation: "AgNO₃ + NaCl → AgCl↓ + NaNO₃",
        liquid: palette::INDIGO,
        particle: palette::AMBER,
    },
    ReactionKind {
        name: "Oxidation",
        equation: "2Mg + O₂ → 2MgO",
        liquid: palette::VIOLET,
        particle: palette::PINK,
    },
];

const CHOICES: [(f32, &str); 3] = [(0.0, "Acid-Base"), (1.0, "Precipitation"), (2.0, "Oxidation")];

pub fn reaction(value: f32) -> &'static ReactionKind {
    let index = (value.round().max(0.0) as usize).min(REACTIONS.len() - 1);
    &REACTIONS[index]
}

/// Seconds from start until the last particle has faded.
pub fn total_duration() -> f32 {
    (WAVES - 1) as f32 * WAVE_INTERVAL + PARTICLE_LIFE
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub size: f32,
    pub opacity: f32,
}

/// Particles alive at `elapsed` seconds, for a beaker centered on `center`.
pub fn particles(elapsed: f32, seed: u64, center: Vec2) -> Vec<Particle> {
    let mut out = Vec::new();
    for wave in 0..WAVES {
        let age = elapsed - wave as f32 * WAVE_INTERVAL;
        if !(0.0..PARTICLE_LIFE).contains(&age) {
            continue;
        }
        let t = age / PARTICLE_LIFE;
        for k in 0..PER_WAVE {
            let mut rng = Rng::stream(seed, (wave * PER_WAVE + k) as u64);
            let from = Vec2::new(center.x - 50.0 + rng.range(0.0, 100.0), center.y + 100.0);
            let to = Vec2::new(
                center.x - 100.0 + rng.range(0.0, 200.0),
                center.y - 50.0 + rng.range(0.0, 100.0),
            );
            out.push(Particle {
                pos: from.lerp(to, quad_out(t)),
                size: rng.range(6.0, 10.0),
                opacity: fade_envelope(t, FADE, FADE),
            });
        }
    }
    out
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Reaction;

impl Exhibit for Reaction {
    fn id(&self) -> ModuleId {
        ModuleId::Reaction
    }

    fn surface(&self) -> SurfaceKind {
        SurfaceKind::Dom
    }

    fn controls(&self) -> ControlSchema {
        ControlSchema::new(vec![Control::choice("reaction", "Reaction Type", &CHOICES, 0.0, "")])
    }

    fn animated(&self) -> bool {
        true
    }

    fn duration(&self, _params: &Params) -> Option<f32> {
        Some(total_duration())
    }

    fn readout(&self, params: &Params) -> Option<Summary> {
        let r = reaction(params.get("reaction"));
        Some(Summary::Reaction {
            name: r.name,
            equation: r.equation,
        })
    }

    fn render(&self, params: &Params, view: &ExhibitView, out: &mut DrawList) {
        let r = reaction(params.get("reaction"));
        let center = out.center();

        out.stroke_rect(
            center + Vec2::new(-75.0, -50.0),
            Vec2::new(150.0, 200.0),
            Stroke::new(palette::SLATE, 4.0),
        );
        out.fill_rect(
            center + Vec2::new(-71.0, 100.0),
            Vec2::new(142.0, 100.0),
            r.liquid.with_alpha(0.8),
        );

        if !view.active {
            return;
        }
        for p in particles(view.elapsed, view.seed, center) {
            if p.opacity > 0.0 {
                out.fill_circle(p.pos, p.size / 2.0, r.particle.with_alpha(p.opacity));
            }
        }
    }
}
