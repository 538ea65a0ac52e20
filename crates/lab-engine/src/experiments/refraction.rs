//! Refraction at an air/material interface (Snell's law).

use glam::Vec2;

use crate::api::controls::{Control, ControlSchema, Params};
use crate::api::module::Simulation;
use crate::api::summary::Summary;
use crate::api::types::{ModuleId, SurfaceKind};
use crate::experiments::palette;
use crate::renderer::draw::{DrawList, Stroke, TextAlign};

/// Index of the upper medium (air).
pub const N1: f32 = 1.0;
const RAY_LENGTH: f32 = 200.0;
const PHOTONS: usize = 5;
/// One photon round trip, source to ray end.
const PHOTON_PERIOD: f32 = 6.4;
const PHOTON_SPACING: f32 = 0.16;

const MATERIALS: [(f32, &str); 4] = [(1.33, "Water"), (1.5, "Glass"), (2.42, "Diamond"), (1.0, "Air")];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RayState {
    pub time: f32,
}

/// Refraction angle in degrees for light entering a medium of index `n2`.
/// The arcsine argument is clamped, so grazing angles never produce NaN.
pub fn refracted_angle(incident_deg: f32, n2: f32) -> f32 {
    let s = (N1 / n2 * incident_deg.to_radians().sin()).clamp(-1.0, 1.0);
    s.asin().to_degrees()
}

struct Rays {
    source: Vec2,
    hit: Vec2,
    end: Vec2,
}

fn rays(center: Vec2, incident_deg: f32, refracted_deg: f32) -> Rays {
    let t1 = incident_deg.to_radians();
    let t2 = refracted_deg.to_radians();
    Rays {
        source: center + Vec2::new(-t1.sin(), -t1.cos()) * RAY_LENGTH,
        hit: center,
        end: center + Vec2::new(t2.sin(), t2.cos()) * RAY_LENGTH,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Refraction;

impl Simulation for Refraction {
    type State = RayState;

    fn id(&self) -> ModuleId {
        ModuleId::Refraction
    }

    fn surface(&self) -> SurfaceKind {
        SurfaceKind::Canvas
    }

    fn controls(&self) -> ControlSchema {
        ControlSchema::new(vec![
            Control::range("angle", "Incident Angle", 0.0, 80.0, 1.0, 45.0, "°"),
            Control::choice("material", "Material", &MATERIALS, 1.33, "n"),
        ])
    }

    fn initial_state(&self, _params: &Params) -> RayState {
        RayState::default()
    }

    fn step(&self, state: &RayState, dt: f32, _params: &Params) -> RayState {
        RayState {
            time: state.time + dt,
        }
    }

    fn readout(&self, params: &Params) -> Option<Summary> {
        let incident = params.get("angle");
        let index = params.get("material");
        Some(Summary::Refraction {
            incident,
            refracted: refracted_angle(incident, index),
            index,
        })
    }

    fn render(&self, state: &RayState, params: &Params, out: &mut DrawList) {
        let size = out.size();
        let center = out.center();
        let incident = params.get("angle");
        let n2 = params.get("material");
        let refracted = refracted_angle(incident, n2);
        let r = rays(center, incident, refracted);

        out.fill_rect(
            Vec2::new(0.0, center.y),
            Vec2::new(size.x, size.y - center.y),
            palette::SKY.with_alpha(0.12),
        );
        out.line(
            Vec2::new(0.0, center.y),
            Vec2::new(size.x, center.y),
            Stroke::new(palette::SKY, 3.0),
        );
        out.line(
            r.hit - Vec2::new(0.0, 100.0),
            r.hit + Vec2::new(0.0, 100.0),
            Stroke::new(palette::SLATE, 1.0).dashed(5.0, 5.0),
        );

        out.fill_circle(r.source, 15.0, palette::AMBER);
        out.line(r.source, r.hit, Stroke::new(palette::AMBER, 3.0));
        let dir_in = (r.hit - r.source).normalize_or_zero();
        out.arrow_head(r.hit - dir_in * 15.0, dir_in.y.atan2(dir_in.x), 8.0, palette::AMBER);

        out.line(r.hit, r.end, Stroke::new(palette::PINK, 3.0));
        let dir_out = (r.end - r.hit).normalize_or_zero();
        out.arrow_head(r.end - dir_out * 15.0, dir_out.y.atan2(dir_out.x), 8.0, palette::PINK);

        let label = |out: &mut DrawList, pos: Vec2, text: String, align| {
            out.text(pos, text, 14.0, palette::LABEL, align);
        };
        label(out, r.source + Vec2::new(0.0, -24.0), "Light Source".into(), TextAlign::Center);
        label(out, center + Vec2::new(-200.0, -50.0), format!("Air (n={N1:.1})"), TextAlign::Left);
        label(out, center + Vec2::new(-200.0, 50.0), format!("Material (n={n2})"), TextAlign::Left);
        label(out, center + Vec2::new(12.0, -60.0), format!("θ₁ = {incident:.0}°"), TextAlign::Left);
        label(out, center + Vec2::new(12.0, 60.0), format!("θ₂ = {refracted:.1}°"), TextAlign::Left);

        if state.time <= 0.0 {
            return;
        }
        for i in 0..PHOTONS {
            let progress = ((state.time + i as f32 * PHOTON_SPACING) % PHOTON_PERIOD) / PHOTON_PERIOD;
            let (pos, color) = if progress < 0.5 {
                (r.source.lerp(r.hit, progress * 2.0), palette::AMBER)
            } else {
                (r.hit.lerp(r.end, (progress - 0.5) * 2.0), palette::PINK)
            };
            out.fill_circle(pos, 4.0, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiments::testing::{approx, canvas, circles, params};

    #[test]
    fn snell_water_forty_five() {
        // sin 45° / 1.33 = 0.5317 -> 32.12°
        assert!(approx(refracted_angle(45.0, 1.33), 32.12, 1e-2));
        assert!(approx(refracted_angle(30.0, 1.0), 30.0, 1e-3));
        assert_eq!(refracted_angle(0.0, 2.42), 0.0);
    }

    #[test]
    fn clamp_never_yields_nan() {
        for n2 in [0.5, 0.9, 1.0, 2.42] {
            for angle in [0.0, 45.0, 80.0, 90.0] {
                assert!(refracted_angle(angle, n2).is_finite(), "n2={n2} angle={angle}");
            }
        }
        assert!(approx(refracted_angle(90.0, 0.5), 90.0, 1e-3));
    }

    #[test]
    fn denser_medium_bends_towards_normal() {
        let schema = Refraction.controls();
        let p = params(&schema, &[("material", 2.42), ("angle", 60.0)]);
        match Refraction.readout(&p) {
            Some(Summary::Refraction {
                incident,
                refracted,
                index,
            }) => {
                assert_eq!(index, 2.42);
                assert!(refracted < incident);
            }
            other => panic!("unexpected readout {other:?}"),
        }
    }

    #[test]
    fn photons_only_while_running() {
        let p = Refraction.controls().defaults();
        let mut list = canvas();
        Refraction.render(&Refraction.initial_state(&p), &p, &mut list);
        let idle = circles(&list).len();
        list.clear();
        Refraction.render(&RayState { time: 1.0 }, &p, &mut list);
        assert_eq!(circles(&list).len(), idle + PHOTONS);
    }
}
