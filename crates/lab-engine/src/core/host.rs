//! The experiment host: at most one open session, driven by the scheduler.

use crate::api::controls::ControlSchema;
use crate::api::summary::Summary;
use crate::api::types::{FrameHandle, ModuleId, SessionId};
use crate::core::config::LabConfig;
use crate::core::error::LabError;
use crate::core::registry::{ModuleRegistry, Spawn};
use crate::core::scheduler::{FrameSource, Scheduler, VirtualFrames};
use crate::core::session::Session;
use crate::renderer::surface::SurfaceProvider;

pub struct Laboratory<F> {
    config: LabConfig,
    registry: ModuleRegistry,
    provider: Box<dyn SurfaceProvider>,
    scheduler: Scheduler<F, Laboratory<F>>,
    session: Option<Session>,
    next_session: u64,
}

impl<F: FrameSource + 'static> Laboratory<F> {
    pub fn new(config: LabConfig, frames: F, provider: impl SurfaceProvider + 'static) -> Self {
        Self::with_registry(config, ModuleRegistry::standard(), frames, provider)
    }

    pub fn with_registry(
        config: LabConfig,
        registry: ModuleRegistry,
        frames: F,
        provider: impl SurfaceProvider + 'static,
    ) -> Self {
        Self {
            config,
            registry,
            provider: Box::new(provider),
            scheduler: Scheduler::new(frames),
            session: None,
            next_session: 1,
        }
    }

    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    pub fn modules(&self) -> Vec<ModuleId> {
        self.registry.ids()
    }

    pub fn schema(&self, module: ModuleId) -> Option<&ControlSchema> {
        self.registry.get(module).map(|e| &e.schema)
    }

    /// Open the module registered under `key`, replacing any current session.
    ///
    /// The current session is closed only once the new one is ready; on error
    /// it keeps running untouched.
    pub fn open(&mut self, key: &str) -> Result<ModuleId, LabError> {
        let id: ModuleId = key.parse()?;
        let entry = self
            .registry
            .get(id)
            .ok_or_else(|| LabError::UnknownModule(key.to_string()))?;
        let surface = self
            .provider
            .acquire(id, entry.surface)
            .ok_or_else(|| LabError::MissingSurface(key.to_string()))?;

        let params = entry.schema.defaults();
        let spawn = Spawn {
            seed: self.config.seed,
            clock_step: self.config.frame_budget,
        };
        let live = entry.instantiate(&params, spawn);
        let schema = entry.schema.clone();

        self.close();
        let session_id = SessionId(self.next_session);
        self.next_session += 1;

        let mut session = Session::new(session_id, id, schema, params, live, surface);
        session.present();
        self.session = Some(session);
        log::info!("opened {id} (session {})", session_id.0);
        Ok(id)
    }

    /// Tear down the current session. Every pending frame is revoked first.
    pub fn close(&mut self) {
        self.scheduler.cancel_all();
        if let Some(session) = self.session.take() {
            log::info!("closed {} (session {})", session.module(), session.id().0);
        }
    }

    /// No-op when already running.
    pub fn start(&mut self) -> Result<(), LabError> {
        let session = self.session.as_mut().ok_or(LabError::NoSession)?;
        if session.is_running() {
            return Ok(());
        }
        let id = session.id();
        log::debug!("start {}", session.module());
        if session.start() {
            self.request_frame(id);
        }
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), LabError> {
        let session = self.session.as_mut().ok_or(LabError::NoSession)?;
        let id = session.id();
        session.stop();
        log::debug!("stop {}", session.module());
        self.scheduler.cancel_owner(id);
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), LabError> {
        let session = self.session.as_mut().ok_or(LabError::NoSession)?;
        let id = session.id();
        self.scheduler.cancel_owner(id);
        session.reset();
        log::debug!("reset {}", session.module());
        Ok(())
    }

    /// Commit a control value and return what was stored.
    pub fn set_control(&mut self, control: &str, value: f32) -> Result<f32, LabError> {
        let session = self.session.as_mut().ok_or(LabError::NoSession)?;
        let id = session.id();
        let (committed, interrupted) = session.set_control(control, value).map_err(|e| {
            log::warn!("{e}");
            e
        })?;
        log::debug!("{}.{control} = {committed}", session.module());
        if interrupted {
            self.scheduler.cancel_owner(id);
        }
        Ok(committed)
    }

    /// Host entry point for a fired frame callback. Returns whether one ran.
    pub fn fire(&mut self, handle: FrameHandle) -> bool {
        match self.scheduler.take(handle) {
            Some((_, callback)) => {
                callback(self);
                true
            }
            None => false,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_running)
    }

    /// Result payload of the current session, if one was published.
    pub fn summary(&self) -> Option<&Summary> {
        self.session.as_ref().and_then(Session::summary)
    }

    /// Values derived from the current controls.
    pub fn readout(&self) -> Option<Summary> {
        self.session.as_ref().and_then(Session::readout)
    }

    pub fn scheduler(&self) -> &Scheduler<F, Laboratory<F>> {
        &self.scheduler
    }

    pub fn frames_mut(&mut self) -> &mut F {
        self.scheduler.source_mut()
    }

    fn request_frame(&mut self, owner: SessionId) {
        self.scheduler.schedule(owner, move |lab: &mut Laboratory<F>| lab.tick(owner));
    }

    fn tick(&mut self, owner: SessionId) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        // Frames of a torn-down or stopped session never touch the current one.
        if session.id() != owner || !session.is_running() {
            log::trace!("dropping stale frame for session {}", owner.0);
            return;
        }
        log::trace!("tick {} frame {}", session.module(), session.frames() + 1);
        if session.advance() {
            self.request_frame(owner);
        } else {
            log::info!("{} finished after {} frames", session.module(), session.frames());
        }
    }
}

impl Laboratory<VirtualFrames> {
    /// Run one virtual refresh: fire every due frame in request order.
    pub fn advance(&mut self) -> usize {
        let due = self.scheduler.source_mut().take_due();
        due.into_iter().filter(|h| self.fire(*h)).count()
    }

    /// Advance until nothing is pending or `max_frames` refreshes have run.
    /// Returns the number of refreshes.
    pub fn run_until_idle(&mut self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.scheduler.pending_len() > 0 {
            self.advance();
            frames += 1;
        }
        frames
    }
}
