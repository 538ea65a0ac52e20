use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::LabError;

/// Stable registry key of one of the fifteen experiments.
/// The string forms must match the external launcher exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleId {
    Gravity,
    Pendulum,
    Wave,
    Circuit,
    Reaction,
    Molecules,
    States,
    Ph,
    Refraction,
    Magnetic,
    Sound,
    Projectile,
    Friction,
    Periodic,
    Optics,
}

impl ModuleId {
    /// All modules in launcher order.
    pub const ALL: [ModuleId; 15] = [
        ModuleId::Gravity,
        ModuleId::Pendulum,
        ModuleId::Wave,
        ModuleId::Circuit,
        ModuleId::Reaction,
        ModuleId::Molecules,
        ModuleId::States,
        ModuleId::Ph,
        ModuleId::Refraction,
        ModuleId::Magnetic,
        ModuleId::Sound,
        ModuleId::Projectile,
        ModuleId::Friction,
        ModuleId::Periodic,
        ModuleId::Optics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModuleId::Gravity => "gravity",
            ModuleId::Pendulum => "pendulum",
            ModuleId::Wave => "wave",
            ModuleId::Circuit => "circuit",
            ModuleId::Reaction => "reaction",
            ModuleId::Molecules => "molecules",
            ModuleId::States => "states",
            ModuleId::Ph => "ph",
            ModuleId::Refraction => "refraction",
            ModuleId::Magnetic => "magnetic",
            ModuleId::Sound => "sound",
            ModuleId::Projectile => "projectile",
            ModuleId::Friction => "friction",
            ModuleId::Periodic => "periodic",
            ModuleId::Optics => "optics",
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleId {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| LabError::UnknownModule(s.to_string()))
    }
}

/// Opaque identifier of one pending frame callback.
/// Issued by the frame source; meaningless outside the scheduler that recorded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u32);

impl FrameHandle {
    /// Returned when the host has no frame facility. Never fires.
    pub const INERT: FrameHandle = FrameHandle(0);

    pub fn is_inert(self) -> bool {
        self == Self::INERT
    }
}

/// Unique identifier of one experiment session (open -> close).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// Which render adapter a module draws through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    /// Retained DOM: children rebuilt with inline styles every frame.
    Dom,
    /// Immediate 2D canvas: bitmap cleared and redrawn every frame.
    Canvas,
}
