//! Ball-and-stick molecules rotating about the vertical axis.
//!
//! Atom coordinates are in ångströms. The rotation is presentational and
//! derived from elapsed time, so a paused molecule keeps its orientation.

use glam::{Vec2, Vec3};

use crate::api::controls::{Control, ControlSchema, Params};
use crate::api::module::{Exhibit, ExhibitView, REFRESH_HZ};
use crate::api::summary::Summary;
use crate::api::types::{ModuleId, SurfaceKind};
use crate::experiments::palette;
use crate::renderer::draw::{Color, DrawList, Stroke, TextAlign};

/// Atoms closer than this are bonded.
pub const BOND_CUTOFF: f32 = 1.5;
/// Radians of rotation per frame of elapsed time.
const SPIN_PER_FRAME: f32 = 0.02;
const PIXELS_PER_ANGSTROM: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    H,
    C,
    N,
    O,
}

impl Element {
    pub fn symbol(self) -> &'static str {
        match self {
            Element::H => "H",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
        }
    }

    fn color(self) -> Color {
        match self {
            Element::H => palette::SLATE,
            Element::C => palette::SLATE_DARK,
            Element::N => palette::INDIGO,
            Element::O => palette::RED,
        }
    }

    fn radius(self) -> f32 {
        match self {
            Element::H => 15.0,
            _ => 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub pos: Vec3,
}

const fn atom(element: Element, x: f32, y: f32, z: f32) -> Atom {
    Atom {
        element,
        pos: Vec3::new(x, y, z),
    }
}

pub struct Molecule {
    pub name: &'static str,
    pub formula: &'static str,
    pub geometry: &'static str,
    pub bond_angle: f32,
    pub atoms: &'static [Atom],
}

use Element::{C, H, N, O};

pub const MOLECULES: [Molecule; 4] = [
    Molecule {
        name: "Water",
        formula: "H₂O",
        geometry: "Bent",
        bond_angle: 104.5,
        atoms: &[atom(O, 0.0, 0.0, 0.0), atom(H, 0.76, 0.5, 0.0), atom(H, -0.76, 0.5, 0.0)],
    },
    Molecule {
        name: "Carbon Dioxide",
        formula: "CO₂",
        geometry: "Linear",
        bond_angle: 180.0,
        atoms: &[atom(C, 0.0, 0.0, 0.0), atom(O, 1.16, 0.0, 0.0), atom(O, -1.16, 0.0, 0.0)],
    },
    Molecule {
        name: "Methane",
        formula: "CH₄",
        geometry: "Tetrahedral",
        bond_angle: 109.5,
        atoms: &[
            atom(C, 0.0, 0.0, 0.0),
            atom(H, 1.09, 0.0, 0.0),
            atom(H, -1.09, 0.0, 0.0),
            atom(H, 0.0, 1.09, 0.0),
            atom(H, 0.0, -1.09, 0.0),
        ],
    },
    Molecule {
        name: "Ammonia",
        formula: "NH₃",
        geometry: "Trigonal Pyramidal",
        bond_angle: 107.0,
        atoms: &[
            atom(N, 0.0, 0.0, 0.0),
            atom(H, 1.01, 0.58, 0.0),
            atom(H, -1.01, 0.58, 0.0),
            atom(H, 0.0, -1.01, 0.0),
        ],
    },
];

const CHOICES: [(f32, &str); 4] = [
    (0.0, "Water (H₂O)"),
    (1.0, "Carbon Dioxide (CO₂)"),
    (2.0, "Methane (CH₄)"),
    (3.0, "Ammonia (NH₃)"),
];

pub fn molecule(value: f32) -> &'static Molecule {
    let index = (value.round().max(0.0) as usize).min(MOLECULES.len() - 1);
    &MOLECULES[index]
}

/// Index pairs of bonded atoms.
pub fn bonds(atoms: &[Atom]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for i in 0..atoms.len() {
        for j in i + 1..atoms.len() {
            if atoms[i].pos.distance(atoms[j].pos) < BOND_CUTOFF {
                out.push((i, j));
            }
        }
    }
    out
}

/// Rotate about the vertical axis.
pub fn spin(p: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(p.x * cos - p.z * sin, p.y, p.x * sin + p.z * cos)
}

pub fn rotation(elapsed: f32) -> f32 {
    elapsed * REFRESH_HZ * SPIN_PER_FRAME
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Molecules;

impl Exhibit for Molecules {
    fn id(&self) -> ModuleId {
        ModuleId::Molecules
    }

    fn surface(&self) -> SurfaceKind {
        SurfaceKind::Canvas
    }

    fn controls(&self) -> ControlSchema {
        ControlSchema::new(vec![Control::choice("molecule", "Molecule", &CHOICES, 0.0, "")])
    }

    fn animated(&self) -> bool {
        true
    }

    fn readout(&self, params: &Params) -> Option<Summary> {
        let m = molecule(params.get("molecule"));
        Some(Summary::Molecule {
            formula: m.formula,
            geometry: m.geometry,
            bond_angle: m.bond_angle,
        })
    }

    fn render(&self, params: &Params, view: &ExhibitView, out: &mut DrawList) {
        let m = molecule(params.get("molecule"));
        let center = out.center();
        let angle = rotation(view.elapsed);
        let projected: Vec<(Vec2, f32)> = m
            .atoms
            .iter()
            .map(|a| {
                let p = spin(a.pos, angle);
                (center + Vec2::new(p.x, p.y) * PIXELS_PER_ANGSTROM, p.z)
            })
            .collect();

        for (i, j) in bonds(m.atoms) {
            out.line(projected[i].0, projected[j].0, Stroke::new(palette::SLATE, 3.0));
        }

        // Far atoms first.
        let mut order: Vec<usize> = (0..m.atoms.len()).collect();
        order.sort_by(|&a, &b| projected[b].1.total_cmp(&projected[a].1));
        for i in order {
            let element = m.atoms[i].element;
            let pos = projected[i].0;
            out.fill_circle(pos, element.radius(), element.color());
            out.stroke_circle(pos, element.radius(), Stroke::new(palette::INK, 2.0));
            out.text(pos, element.symbol(), 14.0, Color::WHITE, TextAlign::Center);
        }

        out.text(
            Vec2::new(center.x, out.height() - 30.0),
            format!("{} ({}) | {} | {}°", m.name, m.formula, m.geometry, m.bond_angle),
            14.0,
            palette::LABEL,
            TextAlign::Center,
        );
    }
}
