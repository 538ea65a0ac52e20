//! Universal indicator scale with a test strip for common substances.

use glam::Vec2;

use crate::api::controls::{Control, ControlSchema, Params};
use crate::api::module::{Exhibit, ExhibitView};
use crate::api::summary::{Acidity, Summary};
use crate::api::types::{ModuleId, SurfaceKind};
use crate::experiments::palette;
use crate::renderer::draw::{Color, DrawList, Stroke, TextAlign};

/// Indicator color for each whole pH value, 0 through 14.
pub const INDICATOR: [u32; 15] = [
    0x8b0000, 0xa00000, 0xc00000, 0xe00000, 0xff0000, 0xff4000, 0xff8000, 0xffff00, 0x80ff00,
    0x40ff00, 0x00ff00, 0x00ff40, 0x00ff80, 0x00ffc0, 0x00ffff,
];

const SUBSTANCES: [(f32, &str); 9] = [
    (0.0, "Battery Acid"),
    (2.0, "Lemon Juice"),
    (4.0, "Tomato Juice"),
    (6.0, "Coffee"),
    (7.0, "Pure Water"),
    (8.0, "Sea Water"),
    (10.0, "Soap"),
    (12.0, "Bleach"),
    (14.0, "Sodium Hydroxide"),
];

const SCALE_MARGIN: f32 = 50.0;
const SCALE_HEIGHT: f32 = 60.0;

pub fn classify(ph: u8) -> Acidity {
    match ph {
        0..=6 => Acidity::Acidic,
        7 => Acidity::Neutral,
        _ => Acidity::Basic,
    }
}

pub fn indicator_color(ph: u8) -> Color {
    Color::hex(INDICATOR[usize::from(ph.min(14))])
}

fn css_hex(ph: u8) -> String {
    format!("#{:06x}", INDICATOR[usize::from(ph.min(14))])
}

fn ph_of(params: &Params) -> u8 {
    params.get("substance").round().clamp(0.0, 14.0) as u8
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ph;

impl Exhibit for Ph {
    fn id(&self) -> ModuleId {
        ModuleId::Ph
    }

    fn surface(&self) -> SurfaceKind {
        SurfaceKind::Dom
    }

    fn controls(&self) -> ControlSchema {
        ControlSchema::new(vec![Control::choice("substance", "Substance", &SUBSTANCES, 0.0, "pH")])
    }

    fn readout(&self, params: &Params) -> Option<Summary> {
        let ph = ph_of(params);
        Some(Summary::Ph {
            ph,
            class: classify(ph),
            color: css_hex(ph),
        })
    }

    fn render(&self, params: &Params, view: &ExhibitView, out: &mut DrawList) {
        let width = out.width() - 2.0 * SCALE_MARGIN;
        let top = out.height() / 2.0 - SCALE_HEIGHT / 2.0;
        let cell = width / INDICATOR.len() as f32;

        for (i, _) in INDICATOR.iter().enumerate() {
            out.fill_rect(
                Vec2::new(SCALE_MARGIN + i as f32 * cell, top),
                Vec2::new(cell, SCALE_HEIGHT),
                indicator_color(i as u8),
            );
            if i % 2 == 0 {
                out.text(
                    Vec2::new(SCALE_MARGIN + (i as f32 + 0.5) * cell, top + 70.0),
                    i.to_string(),
                    12.0,
                    palette::LABEL,
                    TextAlign::Center,
                );
            }
        }

        if !view.active {
            return;
        }
        let ph = ph_of(params);
        let marker = Vec2::new(SCALE_MARGIN + (f32::from(ph) + 0.5) * cell, top - 20.0);
        out.fill_circle(marker, 10.0, indicator_color(ph));
        out.stroke_circle(marker, 10.0, Stroke::new(Color::WHITE, 3.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiments::testing::{canvas, circles, params, texts};

    #[test]
    fn classification() {
        assert_eq!(classify(2), Acidity::Acidic);
        assert_eq!(classify(7), Acidity::Neutral);
        assert_eq!(classify(8), Acidity::Basic);
        assert_eq!(classify(14), Acidity::Basic);
    }

    #[test]
    fn lemon_juice_readout() {
        let schema = Ph.controls();
        let p = params(&schema, &[("substance", 2.0)]);
        assert_eq!(
            Ph.readout(&p),
            Some(Summary::Ph {
                ph: 2,
                class: Acidity::Acidic,
                color: "#c00000".into()
            })
        );
    }

    #[test]
    fn scale_labels_every_two_units() {
        let p = Ph.controls().defaults();
        let mut list = canvas();
        Ph.render(&p, &ExhibitView::idle(1), &mut list);
        let labels = texts(&list);
        assert_eq!(labels.len(), 8);
        assert_eq!(labels.first().map(String::as_str), Some("0"));
        assert_eq!(labels.last().map(String::as_str), Some("14"));
    }

    #[test]
    fn indicator_only_after_test() {
        let schema = Ph.controls();
        let p = params(&schema, &[("substance", 7.0)]);
        let mut list = canvas();
        Ph.render(&p, &ExhibitView::idle(1), &mut list);
        assert!(circles(&list).is_empty());

        list.clear();
        let view = ExhibitView {
            active: true,
            ..ExhibitView::idle(1)
        };
        Ph.render(&p, &view, &mut list);
        let marks = circles(&list);
        assert_eq!(marks.len(), 1);
        // Centered over the pH 7 cell of a 700 px scale.
        assert!((marks[0].0.x - (50.0 + 7.5 * 700.0 / 15.0)).abs() < 1e-3);
    }
}
