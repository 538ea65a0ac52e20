use crate::api::controls::{ControlSchema, Params};
use crate::api::summary::Summary;
use crate::api::types::{ModuleId, SurfaceKind};
use crate::renderer::draw::DrawList;

/// Fixed integration step of the time-stepped models, in seconds.
pub const FRAME_DT: f32 = 0.016;

/// Nominal display refresh rate. Presentational speeds quoted "per frame"
/// assume it.
pub const REFRESH_HZ: f32 = 60.0;

/// The contract every time-stepped experiment fulfills.
///
/// `step` must be pure: the same `(state, dt, params)` always yields the same
/// state. Inputs that shape the integration (drop height, launch speed, ...)
/// are captured into the state by `initial_state`, so edits made while running
/// only reach what `render` reads from `params`.
pub trait Simulation {
    type State: Clone + std::fmt::Debug;

    fn id(&self) -> ModuleId;

    /// Which render adapter the module draws through.
    fn surface(&self) -> SurfaceKind;

    /// Built once at registration.
    fn controls(&self) -> ControlSchema;

    /// Step size used by the host for each frame.
    fn dt(&self) -> f32 {
        FRAME_DT
    }

    fn initial_state(&self, params: &Params) -> Self::State;

    fn step(&self, state: &Self::State, dt: f32, params: &Params) -> Self::State;

    fn is_terminal(&self, _state: &Self::State, _params: &Params) -> bool {
        false
    }

    /// Result payload, queried once when the state turns terminal.
    fn summary(&self, _state: &Self::State, _params: &Params) -> Option<Summary> {
        None
    }

    /// Values derived from the committed parameters alone.
    fn readout(&self, _params: &Params) -> Option<Summary> {
        None
    }

    fn render(&self, state: &Self::State, params: &Params, out: &mut DrawList);
}

/// Presentational inputs of an exhibit frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExhibitView {
    /// Seconds since the start action.
    pub elapsed: f32,
    /// Set by the start action, cleared by reset or a control change.
    pub active: bool,
    /// Seed for presentational jitter.
    pub seed: u64,
}

impl ExhibitView {
    pub fn idle(seed: u64) -> Self {
        Self {
            elapsed: 0.0,
            active: false,
            seed,
        }
    }
}

/// A discrete-selection experiment: a lookup table plus a renderer.
pub trait Exhibit {
    fn id(&self) -> ModuleId;

    fn surface(&self) -> SurfaceKind;

    fn controls(&self) -> ControlSchema;

    fn render(&self, params: &Params, view: &ExhibitView, out: &mut DrawList);

    fn readout(&self, params: &Params) -> Option<Summary>;

    /// Whether the start action runs a frame loop.
    fn animated(&self) -> bool {
        false
    }

    /// Length of the presentational animation; `None` runs until stopped.
    fn duration(&self, _params: &Params) -> Option<f32> {
        None
    }
}
