//! Thin lens imaging with principal-ray tracing.
//!
//! Distances are in centimeters and drawn one pixel per centimeter. The
//! focal length is fixed; a concave lens uses `-f`.

use glam::Vec2;

use crate::api::controls::{Control, ControlSchema, Params};
use crate::api::module::Simulation;
use crate::api::summary::{ImageKind, Summary};
use crate::api::types::{ModuleId, SurfaceKind};
use crate::experiments::palette;
use crate::renderer::draw::{DrawList, Stroke};

pub const FOCAL_LENGTH: f32 = 80.0;
const OBJECT_HEIGHT: f32 = 60.0;
const LENS_HALF_HEIGHT: f32 = 80.0;
const SURFACE_RADIUS: f32 = 150.0;
const PULSE_PERIOD: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lens {
    Convex,
    Concave,
}

impl Lens {
    pub fn from_value(value: f32) -> Self {
        if value >= 0.5 {
            Lens::Concave
        } else {
            Lens::Convex
        }
    }

    fn focal(self) -> f32 {
        match self {
            Lens::Convex => FOCAL_LENGTH,
            Lens::Concave => -FOCAL_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensImage {
    /// Signed image distance; positive on the far side of the lens.
    pub distance: Option<f32>,
    pub magnification: Option<f32>,
    pub kind: ImageKind,
}

/// Solve `1/f = 1/do + 1/di`. An object on the focal point forms no image.
pub fn image(lens: Lens, object_distance: f32) -> LensImage {
    let inverse = 1.0 / lens.focal() - 1.0 / object_distance;
    if inverse.abs() < 1e-7 {
        return LensImage {
            distance: None,
            magnification: None,
            kind: ImageKind::None,
        };
    }
    let di = 1.0 / inverse;
    LensImage {
        distance: Some(di),
        magnification: Some(-di / object_distance),
        kind: if di > 0.0 {
            ImageKind::Real
        } else {
            ImageKind::Virtual
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OpticsState {
    pub time: f32,
}

/// Point at `fraction` of the way along a polyline.
fn point_along(points: &[Vec2], fraction: f32) -> Option<Vec2> {
    let total: f32 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    if total <= 0.0 {
        return points.first().copied();
    }
    let mut remaining = fraction.clamp(0.0, 1.0) * total;
    for w in points.windows(2) {
        let len = w[0].distance(w[1]);
        if remaining <= len {
            return Some(w[0].lerp(w[1], if len > 0.0 { remaining / len } else { 0.0 }));
        }
        remaining -= len;
    }
    points.last().copied()
}

/// Extend the ray from `from` through `through` to the vertical line `x`.
fn extend_to_x(from: Vec2, through: Vec2, x: f32) -> Vec2 {
    let d = through - from;
    if d.x.abs() < 1e-6 {
        return through;
    }
    from + d * ((x - from.x) / d.x)
}

/// The three principal rays as polylines, plus the lens exit points.
fn principal_rays(lens: Lens, center: Vec2, object_distance: f32, right: f32) -> Vec<Vec<Vec2>> {
    let top = Vec2::new(center.x - object_distance, center.y - OBJECT_HEIGHT);
    let near_focus = Vec2::new(center.x - FOCAL_LENGTH, center.y);
    let far_focus = Vec2::new(center.x + FOCAL_LENGTH, center.y);
    let mut rays = Vec::with_capacity(3);

    // Parallel in, then through (or away from) a focal point.
    let hit = Vec2::new(center.x, top.y);
    let exit = match lens {
        Lens::Convex => extend_to_x(hit, far_focus, right),
        Lens::Concave => extend_to_x(near_focus, hit, right),
    };
    rays.push(vec![top, hit, exit]);

    // Through the optical center, undeviated.
    rays.push(vec![top, center, extend_to_x(top, center, right)]);

    // Towards a focal point, then parallel out.
    let aim = match lens {
        Lens::Convex => near_focus,
        Lens::Concave => far_focus,
    };
    if (aim.x - top.x).abs() > 1e-3 {
        let slope = (aim.y - top.y) / (aim.x - top.x);
        let hit = Vec2::new(center.x, top.y + slope * (center.x - top.x));
        if (hit.y - center.y).abs() <= LENS_HALF_HEIGHT * 2.0 {
            rays.push(vec![top, hit, Vec2::new(right, hit.y)]);
        }
    }
    rays
}

fn draw_arrow(out: &mut DrawList, base: Vec2, height: f32, stroke: Stroke) {
    let tip = base - Vec2::new(0.0, height);
    out.line(base, tip, stroke);
    let dir = if height >= 0.0 { -std::f32::consts::FRAC_PI_2 } else { std::f32::consts::FRAC_PI_2 };
    out.arrow_head(tip, dir, 10.0, stroke.color);
}

fn draw_lens(out: &mut DrawList, lens: Lens, center: Vec2) {
    let stroke = Stroke::new(palette::INDIGO, 5.0);
    let offset = (SURFACE_RADIUS * SURFACE_RADIUS - LENS_HALF_HEIGHT * LENS_HALF_HEIGHT).sqrt();
    let span = LENS_HALF_HEIGHT.atan2(offset);
    let pi = std::f32::consts::PI;
    match lens {
        Lens::Convex => {
            out.arc(center + Vec2::new(offset, 0.0), SURFACE_RADIUS, pi - span, pi + span, stroke);
            out.arc(center - Vec2::new(offset, 0.0), SURFACE_RADIUS, -span, span, stroke);
        }
        Lens::Concave => {
            let rim = 30.0;
            out.arc(center - Vec2::new(rim + offset, 0.0), SURFACE_RADIUS, -span, span, stroke);
            out.arc(center + Vec2::new(rim + offset, 0.0), SURFACE_RADIUS, pi - span, pi + span, stroke);
            for y in [-LENS_HALF_HEIGHT, LENS_HALF_HEIGHT] {
                out.line(
                    center + Vec2::new(-rim, y),
                    center + Vec2::new(rim, y),
                    stroke,
                );
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Optics;

impl Simulation for Optics {
    type State = OpticsState;

    fn id(&self) -> ModuleId {
        ModuleId::Optics
    }

    fn surface(&self) -> SurfaceKind {
        SurfaceKind::Canvas
    }

    fn controls(&self) -> ControlSchema {
        ControlSchema::new(vec![
            Control::choice("lens", "Lens Type", &[(0.0, "Convex"), (1.0, "Concave")], 0.0, ""),
            Control::range("distance", "Object Distance", 50.0, 200.0, 1.0, 100.0, "cm"),
        ])
    }

    fn initial_state(&self, _params: &Params) -> OpticsState {
        OpticsState::default()
    }

    fn step(&self, state: &OpticsState, dt: f32, _params: &Params) -> OpticsState {
        OpticsState {
            time: state.time + dt,
        }
    }

    fn readout(&self, params: &Params) -> Option<Summary> {
        let result = image(Lens::from_value(params.get("lens")), params.get("distance"));
        Some(Summary::Lens {
            image_distance: result.distance,
            magnification: result.magnification,
            image: result.kind,
        })
    }

    fn render(&self, state: &OpticsState, params: &Params, out: &mut DrawList) {
        let size = out.size();
        let center = out.center();
        let lens = Lens::from_value(params.get("lens"));
        let object_distance = params.get("distance");
        let result = image(lens, object_distance);

        out.line(
            Vec2::new(0.0, center.y),
            Vec2::new(size.x, center.y),
            Stroke::new(palette::SLATE, 1.0).dashed(5.0, 5.0),
        );
        draw_lens(out, lens, center);
        for x in [center.x - FOCAL_LENGTH, center.x + FOCAL_LENGTH] {
            out.fill_circle(Vec2::new(x, center.y), 5.0, palette::ORANGE);
        }

        let rays = principal_rays(lens, center, object_distance, size.x);
        for ray in &rays {
            out.polyline(ray.clone(), Stroke::new(palette::AMBER, 2.0));
        }

        draw_arrow(
            out,
            Vec2::new(center.x - object_distance, center.y),
            OBJECT_HEIGHT,
            Stroke::new(palette::EMERALD, 3.0),
        );

        if let (Some(di), Some(m)) = (result.distance, result.magnification) {
            let base = Vec2::new(center.x + di, center.y);
            let tip = base - Vec2::new(0.0, OBJECT_HEIGHT * m);
            if result.kind == ImageKind::Virtual {
                // Refracted rays appear to diverge from the virtual image.
                for ray in &rays {
                    if let Some(exit) = ray.get(1) {
                        out.line(*exit, tip, Stroke::new(palette::AMBER.with_alpha(0.5), 1.0).dashed(4.0, 4.0));
                    }
                }
            }
            if (0.0..=size.x).contains(&base.x) {
                let stroke = match result.kind {
                    ImageKind::Virtual => Stroke::new(palette::PINK, 3.0).dashed(6.0, 4.0),
                    _ => Stroke::new(palette::PINK, 3.0),
                };
                draw_arrow(out, base, OBJECT_HEIGHT * m, stroke);
            }
        }

        if state.time > 0.0 {
            let fraction = (state.time % PULSE_PERIOD) / PULSE_PERIOD;
            for ray in &rays {
                if let Some(p) = point_along(ray, fraction) {
                    out.fill_circle(p, 4.0, palette::AMBER);
                }
            }
        }
    }
}
