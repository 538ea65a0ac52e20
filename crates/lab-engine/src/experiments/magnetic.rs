//! Bar magnets and their field lines.
//!
//! Each magnet face is a point pole. Field lines are traced through the
//! superposed inverse-square field, leaving north poles and ending on south
//! poles or at the surface edge.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::api::controls::{Control, ControlSchema, Params};
use crate::api::module::Simulation;
use crate::api::types::{ModuleId, SurfaceKind};
use crate::experiments::palette;
use crate::renderer::draw::{Color, DrawList, Stroke, TextAlign};

const MAGNET_SIZE: Vec2 = Vec2::new(80.0, 40.0);
const PAIR_OFFSET: f32 = 150.0;
const LINES_PER_POLE: usize = 16;
const TRACE_STEP: f32 = 4.0;
const TRACE_LIMIT: usize = 400;
const CAPTURE_RADIUS: f32 = 8.0;
const ORBITERS: usize = 30;

const NORTH: Color = palette::RED;
const SOUTH: Color = palette::BLUE;

const ARRANGEMENTS: [(f32, &str); 4] = [
    (0.0, "Single Magnet"),
    (1.0, "North-North (Repel)"),
    (2.0, "South-South (Repel)"),
    (3.0, "North-South (Attract)"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    Single,
    NorthNorth,
    SouthSouth,
    NorthSouth,
}

impl Arrangement {
    pub fn from_value(value: f32) -> Self {
        match value.round() as i32 {
            1 => Arrangement::NorthNorth,
            2 => Arrangement::SouthSouth,
            3 => Arrangement::NorthSouth,
            _ => Arrangement::Single,
        }
    }

    /// Magnet centers (relative to the surface center) and whether the north
    /// face points right.
    fn magnets(self) -> Vec<(Vec2, bool)> {
        let left = Vec2::new(-PAIR_OFFSET, 0.0);
        let right = Vec2::new(PAIR_OFFSET, 0.0);
        match self {
            // North on the left face, as labeled.
            Arrangement::Single => vec![(Vec2::ZERO, false)],
            Arrangement::NorthNorth => vec![(left, true), (right, false)],
            Arrangement::SouthSouth => vec![(left, false), (right, true)],
            Arrangement::NorthSouth => vec![(left, true), (right, true)],
        }
    }
}

/// A point pole: position and strength (+1 north, -1 south).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pole {
    pub pos: Vec2,
    pub strength: f32,
}

pub fn poles(arrangement: Arrangement, center: Vec2) -> Vec<Pole> {
    let half = MAGNET_SIZE.x / 2.0;
    arrangement
        .magnets()
        .into_iter()
        .flat_map(|(offset, north_right)| {
            let c = center + offset;
            let sign = if north_right { 1.0 } else { -1.0 };
            [
                Pole {
                    pos: c + Vec2::new(half, 0.0),
                    strength: sign,
                },
                Pole {
                    pos: c - Vec2::new(half, 0.0),
                    strength: -sign,
                },
            ]
        })
        .collect()
}

/// Field at `p`, pointing away from north poles.
pub fn field(poles: &[Pole], p: Vec2) -> Vec2 {
    poles.iter().fold(Vec2::ZERO, |acc, pole| {
        let d = p - pole.pos;
        let r2 = d.length_squared().max(1.0);
        acc + d * (pole.strength / (r2 * r2.sqrt()))
    })
}

/// Follow the field from `start` until it reaches a south pole or leaves `bounds`.
pub fn trace(poles: &[Pole], start: Vec2, bounds: Vec2) -> Vec<Vec2> {
    let mut points = vec![start];
    let mut p = start;
    for _ in 0..TRACE_LIMIT {
        let dir = field(poles, p).normalize_or_zero();
        if dir == Vec2::ZERO {
            break;
        }
        p += dir * TRACE_STEP;
        points.push(p);
        let captured = poles
            .iter()
            .any(|pole| pole.strength < 0.0 && pole.pos.distance(p) < CAPTURE_RADIUS);
        if captured || p.x < 0.0 || p.y < 0.0 || p.x > bounds.x || p.y > bounds.y {
            break;
        }
    }
    points
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldState {
    pub time: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Magnetic;

impl Simulation for Magnetic {
    type State = FieldState;

    fn id(&self) -> ModuleId {
        ModuleId::Magnetic
    }

    fn surface(&self) -> SurfaceKind {
        SurfaceKind::Canvas
    }

    fn controls(&self) -> ControlSchema {
        ControlSchema::new(vec![Control::choice(
            "arrangement",
            "Magnet Type",
            &ARRANGEMENTS,
            0.0,
            "",
        )])
    }

    fn dt(&self) -> f32 {
        0.02
    }

    fn initial_state(&self, _params: &Params) -> FieldState {
        FieldState::default()
    }

    fn step(&self, state: &FieldState, dt: f32, _params: &Params) -> FieldState {
        FieldState {
            time: state.time + dt,
        }
    }

    fn render(&self, state: &FieldState, params: &Params, out: &mut DrawList) {
        let center = out.center();
        let bounds = out.size();
        let arrangement = Arrangement::from_value(params.get("arrangement"));
        let poles = poles(arrangement, center);

        let line = Stroke::new(palette::SKY.with_alpha(0.7), 2.0);
        for pole in poles.iter().filter(|p| p.strength > 0.0) {
            for i in 0..LINES_PER_POLE {
                let angle = i as f32 / LINES_PER_POLE as f32 * TAU;
                let start = pole.pos + Vec2::from_angle(angle) * CAPTURE_RADIUS;
                out.polyline(trace(&poles, start, bounds), line);
            }
        }

        for (offset, north_right) in arrangement.magnets() {
            let c = center + offset;
            let half = Vec2::new(MAGNET_SIZE.x / 2.0, MAGNET_SIZE.y / 2.0);
            let (left, right) = if north_right { (SOUTH, NORTH) } else { (NORTH, SOUTH) };
            out.fill_rect(c - half, Vec2::new(half.x, MAGNET_SIZE.y), left);
            out.fill_rect(c - Vec2::new(0.0, half.y), Vec2::new(half.x, MAGNET_SIZE.y), right);
            out.stroke_rect(c - half, MAGNET_SIZE, Stroke::new(Color::WHITE, 2.0));
            let (l, r) = if north_right { ("S", "N") } else { ("N", "S") };
            out.text(c + Vec2::new(-20.0, 0.0), l, 20.0, Color::WHITE, TextAlign::Center);
            out.text(c + Vec2::new(20.0, 0.0), r, 20.0, Color::WHITE, TextAlign::Center);
        }

        if state.time <= 0.0 {
            return;
        }
        let t = state.time;
        for i in 0..ORBITERS {
            let angle = i as f32 / ORBITERS as f32 * TAU + t;
            let radius = 50.0 + (t * 2.0 + i as f32).sin() * 20.0;
            out.fill_circle(center + Vec2::from_angle(angle) * radius, 3.0, palette::SKY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiments::testing::{canvas, circles, params};
    use crate::renderer::draw::DrawCmd;

    const CENTER: Vec2 = Vec2::new(400.0, 200.0);

    #[test]
    fn every_magnet_is_a_dipole() {
        for (value, _) in ARRANGEMENTS {
            let poles = poles(Arrangement::from_value(value), CENTER);
            let total: f32 = poles.iter().map(|p| p.strength).sum();
            assert_eq!(total, 0.0);
        }
    }

    #[test]
    fn like_poles_face_each_other_when_repelling() {
        let poles = poles(Arrangement::NorthNorth, CENTER);
        let inner: Vec<_> = poles
            .iter()
            .filter(|p| (p.pos.x - CENTER.x).abs() < PAIR_OFFSET)
            .collect();
        assert_eq!(inner.len(), 2);
        assert!(inner.iter().all(|p| p.strength > 0.0));
        // Midway between two north faces the horizontal field cancels.
        assert!(field(&poles, CENTER).x.abs() < 1e-6);
    }

    #[test]
    fn single_magnet_line_returns_to_south() {
        let poles = poles(Arrangement::Single, CENTER);
        let north = poles.iter().find(|p| p.strength > 0.0).unwrap();
        let south = poles.iter().find(|p| p.strength < 0.0).unwrap();
        let start = north.pos + Vec2::new(0.0, -CAPTURE_RADIUS);
        let line = trace(&poles, start, Vec2::new(800.0, 400.0));
        let end = *line.last().unwrap();
        assert!(end.distance(south.pos) < CAPTURE_RADIUS, "ended at {end}");
    }

    #[test]
    fn attraction_field_runs_north_to_south_between_magnets() {
        let poles = poles(Arrangement::NorthSouth, CENTER);
        // Left magnet's north face is on its right; the gap field points right.
        assert!(field(&poles, CENTER).x > 0.0);
    }

    #[test]
    fn orbiters_appear_when_animating() {
        let schema = Magnetic.controls();
        let p = params(&schema, &[("arrangement", 3.0)]);
        let mut list = canvas();
        Magnetic.render(&FieldState { time: 0.0 }, &p, &mut list);
        assert!(circles(&list).is_empty());
        assert!(list.iter().any(|c| matches!(c, DrawCmd::Polyline { .. })));
        list.clear();
        Magnetic.render(&FieldState { time: 0.5 }, &p, &mut list);
        assert_eq!(circles(&list).len(), ORBITERS);
    }
}
