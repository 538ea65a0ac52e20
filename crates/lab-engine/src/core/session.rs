//! One open experiment: its parameters, lifecycle phase and bound surface.
//!
//! [`Live`] erases the difference between time-stepped simulations and
//! exhibits so the host drives both through one interface.

use crate::api::controls::{ControlSchema, Params};
use crate::api::module::{Exhibit, ExhibitView, Simulation};
use crate::api::summary::Summary;
use crate::api::types::{ModuleId, SessionId, SurfaceKind};
use crate::core::error::LabError;
use crate::renderer::draw::DrawList;
use crate::renderer::surface::Surface;

/// Outcome of one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    Continue,
    /// The run ended by itself, optionally with a result payload.
    Finished(Option<Summary>),
}

/// What a start action produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Started {
    /// Whether the host should drive frames.
    pub animate: bool,
    /// Summary published at start.
    pub summary: Option<Summary>,
}

/// A module instance with its mutable state.
pub trait Live {
    fn start(&mut self, params: &Params) -> Started;

    /// Advance one frame.
    fn tick(&mut self, params: &Params) -> Tick;

    /// Back to the initial state for `params`.
    fn reset(&mut self, params: &Params);

    /// React to a committed control value. Returns `true` when the change
    /// invalidates the current run and its summary.
    fn control_changed(&mut self, params: &Params, running: bool) -> bool;

    fn render(&self, params: &Params, out: &mut DrawList);

    fn readout(&self, params: &Params) -> Option<Summary>;
}

/// A [`Simulation`] and the state it owns.
pub struct SimRun<M: Simulation> {
    model: M,
    state: M::State,
}

impl<M: Simulation> SimRun<M> {
    pub fn new(model: M, params: &Params) -> Self {
        let state = model.initial_state(params);
        Self { model, state }
    }

    pub fn state(&self) -> &M::State {
        &self.state
    }
}

impl<M: Simulation> Live for SimRun<M> {
    fn start(&mut self, params: &Params) -> Started {
        if self.model.is_terminal(&self.state, params) {
            self.state = self.model.initial_state(params);
        }
        Started {
            animate: true,
            summary: self.model.readout(params),
        }
    }

    fn tick(&mut self, params: &Params) -> Tick {
        self.state = self.model.step(&self.state, self.model.dt(), params);
        if self.model.is_terminal(&self.state, params) {
            Tick::Finished(self.model.summary(&self.state, params))
        } else {
            Tick::Continue
        }
    }

    fn reset(&mut self, params: &Params) {
        self.state = self.model.initial_state(params);
    }

    fn control_changed(&mut self, params: &Params, running: bool) -> bool {
        if running {
            return false;
        }
        self.state = self.model.initial_state(params);
        true
    }

    fn render(&self, params: &Params, out: &mut DrawList) {
        self.model.render(&self.state, params, out);
    }

    fn readout(&self, params: &Params) -> Option<Summary> {
        self.model.readout(params)
    }
}

/// An [`Exhibit`] and its presentational clock.
pub struct ExhibitRun<E: Exhibit> {
    exhibit: E,
    view: ExhibitView,
    clock_step: f32,
}

impl<E: Exhibit> ExhibitRun<E> {
    /// `clock_step` is how far the presentational clock moves per frame.
    pub fn new(exhibit: E, seed: u64, clock_step: f32) -> Self {
        Self {
            exhibit,
            view: ExhibitView::idle(seed),
            clock_step,
        }
    }

    pub fn view(&self) -> &ExhibitView {
        &self.view
    }
}

impl<E: Exhibit> Live for ExhibitRun<E> {
    fn start(&mut self, params: &Params) -> Started {
        // Bounded animations replay from the top; endless ones resume.
        if self.exhibit.duration(params).is_some() {
            self.view.elapsed = 0.0;
        }
        self.view.active = true;
        Started {
            animate: self.exhibit.animated(),
            summary: self.exhibit.readout(params),
        }
    }

    fn tick(&mut self, params: &Params) -> Tick {
        self.view.elapsed += self.clock_step;
        match self.exhibit.duration(params) {
            Some(limit) if self.view.elapsed >= limit => Tick::Finished(self.exhibit.readout(params)),
            _ => Tick::Continue,
        }
    }

    fn reset(&mut self, _params: &Params) {
        self.view = ExhibitView::idle(self.view.seed);
    }

    fn control_changed(&mut self, _params: &Params, _running: bool) -> bool {
        self.view.active = false;
        true
    }

    fn render(&self, params: &Params, out: &mut DrawList) {
        self.exhibit.render(params, &self.view, out);
    }

    fn readout(&self, params: &Params) -> Option<Summary> {
        self.exhibit.readout(params)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
}

pub struct Session {
    id: SessionId,
    module: ModuleId,
    schema: ControlSchema,
    params: Params,
    phase: Phase,
    summary: Option<Summary>,
    frames: u64,
    live: Box<dyn Live>,
    surface: Box<dyn Surface>,
}

impl Session {
    pub fn new(
        id: SessionId,
        module: ModuleId,
        schema: ControlSchema,
        params: Params,
        live: Box<dyn Live>,
        surface: Box<dyn Surface>,
    ) -> Self {
        Self {
            id,
            module,
            schema,
            params,
            phase: Phase::Idle,
            summary: None,
            frames: 0,
            live,
            surface,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn module(&self) -> ModuleId {
        self.module
    }

    pub fn schema(&self) -> &ControlSchema {
        &self.schema
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn surface_kind(&self) -> SurfaceKind {
        self.surface.kind()
    }

    /// Frames advanced since open.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn readout(&self) -> Option<Summary> {
        self.live.readout(&self.params)
    }

    /// Draw the current state onto the bound surface.
    pub fn present(&mut self) {
        let mut frame = DrawList::new(self.surface.size());
        self.live.render(&self.params, &mut frame);
        self.surface.present(&frame);
    }

    /// Returns whether frames should be scheduled.
    pub(crate) fn start(&mut self) -> bool {
        let started = self.live.start(&self.params);
        self.summary = started.summary;
        self.phase = if started.animate {
            Phase::Running
        } else {
            Phase::Idle
        };
        self.present();
        started.animate
    }

    pub(crate) fn stop(&mut self) {
        self.phase = Phase::Idle;
    }

    pub(crate) fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.summary = None;
        self.live.reset(&self.params);
        self.present();
    }

    /// Returns whether the run must be interrupted.
    pub(crate) fn set_control(&mut self, id: &str, value: f32) -> Result<(f32, bool), LabError> {
        let committed = self.schema.commit(&mut self.params, id, value)?;
        let running = self.is_running();
        let invalidated = self.live.control_changed(&self.params, running);
        if invalidated {
            self.phase = Phase::Idle;
            self.summary = None;
        } else if let Some(readout) = self.live.readout(&self.params) {
            self.summary = Some(readout);
        }
        if !self.is_running() {
            self.present();
        }
        Ok((committed, invalidated && running))
    }

    /// Advance and draw one frame. Returns whether another is wanted.
    pub(crate) fn advance(&mut self) -> bool {
        self.frames += 1;
        let tick = self.live.tick(&self.params);
        self.present();
        match tick {
            Tick::Continue => true,
            Tick::Finished(summary) => {
                self.phase = Phase::Idle;
                if summary.is_some() {
                    self.summary = summary;
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::experiments::gravity::Gravity;
    use crate::experiments::ph::Ph;
    use crate::experiments::reaction::Reaction;
    use crate::renderer::surface::{FrameLog, RecordingSurface};

    fn session<L: Live + 'static>(live: L, schema: ControlSchema) -> (Session, FrameLog) {
        let surface = RecordingSurface::new(SurfaceKind::Dom, Vec2::new(800.0, 400.0));
        let log = surface.log();
        let params = schema.defaults();
        let s = Session::new(
            SessionId(1),
            ModuleId::Gravity,
            schema,
            params,
            Box::new(live),
            Box::new(surface),
        );
        (s, log)
    }

    #[test]
    fn simulation_runs_to_terminal_and_restarts() {
        let schema = Gravity.controls();
        let run = SimRun::new(Gravity, &schema.defaults());
        let (mut s, log) = session(run, schema);
        assert!(s.start());
        assert!(s.is_running());
        let mut guard = 0;
        while s.advance() {
            guard += 1;
            assert!(guard < 10_000);
        }
        assert_eq!(s.phase(), Phase::Idle);
        assert!(matches!(s.summary(), Some(Summary::Fall { .. })));
        assert_eq!(log.len() as u64, s.frames() + 1);

        // Starting a finished run begins again from the top.
        assert!(s.start());
        assert!(s.advance());
    }

    #[test]
    fn idle_control_change_reinitializes() {
        let schema = Gravity.controls();
        let run = SimRun::new(Gravity, &schema.defaults());
        let (mut s, log) = session(run, schema);
        let (value, interrupted) = s.set_control("height", 500.0).unwrap();
        assert_eq!(value, 300.0);
        assert!(!interrupted);
        assert_eq!(log.len(), 1);
        assert!(s.set_control("nope", 1.0).is_err());
    }

    #[test]
    fn static_exhibit_start_shows_result_without_frames() {
        let schema = Ph.controls();
        let run = ExhibitRun::new(Ph, 1, 1.0 / 60.0);
        let (mut s, _) = session(run, schema);
        assert!(!s.start());
        assert!(!s.is_running());
        assert!(matches!(s.summary(), Some(Summary::Ph { ph: 0, .. })));
        let (_, interrupted) = s.set_control("substance", 7.0).unwrap();
        assert!(!interrupted);
        assert!(s.summary().is_none());
    }

    #[test]
    fn bounded_exhibit_finishes_and_keeps_readout() {
        let schema = Reaction.controls();
        let run = ExhibitRun::new(Reaction, 1, 0.1);
        let (mut s, _) = session(run, schema);
        assert!(s.start());
        let mut frames = 0;
        while s.advance() {
            frames += 1;
            assert!(frames < 1_000);
        }
        assert!(matches!(s.summary(), Some(Summary::Reaction { .. })));
        assert!(!s.is_running());
    }
}
