//! The fifteen experiments.
//!
//! Time-stepped models implement [`Simulation`](crate::api::module::Simulation);
//! the discrete-selection ones implement [`Exhibit`](crate::api::module::Exhibit).
//! Models work in SI units; pixel scaling happens only in `render`.

pub mod circuit;
pub mod friction;
pub mod gravity;
pub mod magnetic;
pub mod molecules;
pub mod optics;
pub mod pendulum;
pub mod periodic;
pub mod ph;
pub mod projectile;
pub mod reaction;
pub mod refraction;
pub mod sound;
pub mod states;
pub mod wave;

/// Gravitational acceleration, m/s².
pub const G: f32 = 9.8;

/// Colors shared across experiments.
pub mod palette {
    use crate::renderer::draw::Color;

    pub const INDIGO: Color = Color::hex(0x6366f1);
    pub const PINK: Color = Color::hex(0xec4899);
    pub const AMBER: Color = Color::hex(0xfbbf24);
    pub const ORANGE: Color = Color::hex(0xf59e0b);
    pub const RED: Color = Color::hex(0xef4444);
    pub const VIOLET: Color = Color::hex(0x8b5cf6);
    pub const SKY: Color = Color::hex(0x60a5fa);
    pub const BLUE: Color = Color::hex(0x3b82f6);
    pub const EMERALD: Color = Color::hex(0x10b981);
    pub const FOREST: Color = Color::hex(0x065f46);
    pub const SLATE: Color = Color::hex(0x94a3b8);
    pub const SLATE_DARK: Color = Color::hex(0x334155);
    pub const INK: Color = Color::hex(0x1e293b);
    pub const LABEL: Color = Color::hex(0xcbd5e1);
}

#[cfg(test)]
pub(crate) mod testing {
    use glam::Vec2;

    use crate::api::controls::{ControlSchema, Params};
    use crate::renderer::draw::{DrawCmd, DrawList};

    pub fn approx(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() <= tol
    }

    pub fn canvas() -> DrawList {
        DrawList::new(Vec2::new(800.0, 400.0))
    }

    /// Defaults with `overrides` committed through the schema.
    pub fn params(schema: &ControlSchema, overrides: &[(&str, f32)]) -> Params {
        let mut params = schema.defaults();
        for (id, value) in overrides {
            schema
                .commit(&mut params, id, *value)
                .unwrap_or_else(|e| panic!("{e}"));
        }
        params
    }

    pub fn texts(list: &DrawList) -> Vec<String> {
        list.iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn circles(list: &DrawList) -> Vec<(Vec2, f32)> {
        list.iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::FillCircle { center, radius, .. } => Some((*center, *radius)),
                _ => None,
            })
            .collect()
    }
}
