//! Structured result payloads.
//!
//! Terminal simulations emit one when they finish; everything else offers a
//! readout derived from the committed parameters alone. Serialized with a
//! `kind` tag for the UI layer.

use serde::Serialize;

/// Acid/base classification on the pH scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Acidity {
    Acidic,
    Neutral,
    #[serde(rename = "Basic/Alkaline")]
    Basic,
}

impl Acidity {
    pub fn label(self) -> &'static str {
        match self {
            Acidity::Acidic => "Acidic",
            Acidity::Neutral => "Neutral",
            Acidity::Basic => "Basic/Alkaline",
        }
    }
}

/// Phase of matter for a temperature band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Solid,
    Liquid,
    Gas,
}

/// Whether a lens forms its image on the far side (real) or the object side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageKind {
    Real,
    Virtual,
    /// Object on the focal point: rays leave parallel, no image forms.
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Summary {
    /// Gravity drop. Closed-form values plus what the integration measured.
    Fall {
        height: f32,
        final_velocity: f32,
        fall_time: f32,
        measured_velocity: f32,
        measured_time: f32,
    },
    /// Projectile launch.
    Launch {
        max_height: f32,
        range: f32,
        flight_time: f32,
        measured_range: f32,
        measured_peak: f32,
        measured_time: f32,
    },
    /// Friction push.
    Slide {
        friction_force: f32,
        net_force: f32,
        acceleration: f32,
        final_velocity: f32,
    },
    Circuit {
        voltage: f32,
        resistance: f32,
        current: f32,
        power: f32,
    },
    Pendulum {
        length: f32,
        period: f32,
    },
    Sound {
        frequency: f32,
        wavelength: f32,
        period: f32,
    },
    Refraction {
        incident: f32,
        refracted: f32,
        index: f32,
    },
    Lens {
        image_distance: Option<f32>,
        magnification: Option<f32>,
        image: ImageKind,
    },
    Ph {
        ph: u8,
        class: Acidity,
        color: String,
    },
    Element {
        symbol: &'static str,
        name: &'static str,
        number: u32,
        mass: &'static str,
        category: &'static str,
    },
    Matter {
        phase: Phase,
        temperature: f32,
    },
    Molecule {
        formula: &'static str,
        geometry: &'static str,
        bond_angle: f32,
    },
    Reaction {
        name: &'static str,
        equation: &'static str,
    },
}

impl Summary {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
