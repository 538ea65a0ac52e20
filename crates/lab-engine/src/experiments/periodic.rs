//! A small periodic table sampler showing one element card at a time.

use glam::Vec2;

use crate::api::controls::{Control, ControlSchema, Params};
use crate::api::module::{Exhibit, ExhibitView};
use crate::api::summary::Summary;
use crate::api::types::{ModuleId, SurfaceKind};
use crate::experiments::palette;
use crate::renderer::draw::{Color, DrawList, Stroke, TextAlign};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementInfo {
    pub symbol: &'static str,
    pub name: &'static str,
    pub number: u32,
    /// Standard atomic weight as printed on the card.
    pub mass: &'static str,
    pub category: &'static str,
    pub color: Color,
}

const fn element(
    symbol: &'static str,
    name: &'static str,
    number: u32,
    mass: &'static str,
    category: &'static str,
    color: Color,
) -> ElementInfo {
    ElementInfo {
        symbol,
        name,
        number,
        mass,
        category,
        color,
    }
}

const NONMETAL: &str = "Nonmetal";
const ALKALI: &str = "Alkali Metal";
const TRANSITION: &str = "Transition Metal";

pub const ELEMENTS: [ElementInfo; 10] = [
    element("H", "Hydrogen", 1, "1.008", NONMETAL, palette::AMBER),
    element("He", "Helium", 2, "4.003", "Noble Gas", palette::SKY),
    element("Li", "Lithium", 3, "6.941", ALKALI, palette::RED),
    element("C", "Carbon", 6, "12.011", NONMETAL, palette::AMBER),
    element("N", "Nitrogen", 7, "14.007", NONMETAL, palette::AMBER),
    element("O", "Oxygen", 8, "15.999", NONMETAL, palette::AMBER),
    element("Na", "Sodium", 11, "22.990", ALKALI, palette::RED),
    element("Fe", "Iron", 26, "55.845", TRANSITION, palette::VIOLET),
    element("Cu", "Copper", 29, "63.546", TRANSITION, palette::VIOLET),
    element("Au", "Gold", 79, "196.967", TRANSITION, palette::VIOLET),
];

const CARD: Vec2 = Vec2::new(200.0, 250.0);

/// Element selected by atomic number, falling back to hydrogen.
pub fn lookup(number: f32) -> &'static ElementInfo {
    let n = number.round() as u32;
    ELEMENTS.iter().find(|e| e.number == n).unwrap_or(&ELEMENTS[0])
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Periodic;

impl Exhibit for Periodic {
    fn id(&self) -> ModuleId {
        ModuleId::Periodic
    }

    fn surface(&self) -> SurfaceKind {
        SurfaceKind::Dom
    }

    fn controls(&self) -> ControlSchema {
        let options: Vec<(f32, &'static str)> =
            ELEMENTS.iter().map(|e| (e.number as f32, e.symbol)).collect();
        ControlSchema::new(vec![Control::choice("element", "Element", &options, 1.0, "")])
    }

    fn readout(&self, params: &Params) -> Option<Summary> {
        let e = lookup(params.get("element"));
        Some(Summary::Element {
            symbol: e.symbol,
            name: e.name,
            number: e.number,
            mass: e.mass,
            category: e.category,
        })
    }

    fn render(&self, params: &Params, _view: &ExhibitView, out: &mut DrawList) {
        let e = lookup(params.get("element"));
        let center = out.center();
        let origin = center - CARD / 2.0;
        out.fill_round_rect(origin, CARD, 10.0, e.color);
        out.stroke_rect(origin, CARD, Stroke::new(Color::WHITE, 3.0));

        out.text(origin + Vec2::new(15.0, 25.0), e.number.to_string(), 18.0, Color::WHITE, TextAlign::Left);
        out.text(center - Vec2::new(0.0, 20.0), e.symbol, 64.0, Color::WHITE, TextAlign::Center);
        out.text(center + Vec2::new(0.0, 45.0), e.name, 18.0, Color::WHITE, TextAlign::Center);
        out.text(center + Vec2::new(0.0, 75.0), e.mass, 14.0, Color::WHITE, TextAlign::Center);
        out.text(
            Vec2::new(center.x, origin.y + CARD.y + 30.0),
            e.category,
            14.0,
            palette::LABEL,
            TextAlign::Center,
        );
    }
}
