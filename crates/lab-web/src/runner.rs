use std::cell::Cell;
use std::rc::Rc;

use lab_engine::{FrameHandle, LabConfig, LabError, Laboratory, ModuleId, Summary};

use crate::frames::BrowserFrames;
use crate::provider::WebProvider;

/// Owns the laboratory for the page.
///
/// wasm-bindgen cannot export the generic `Laboratory`, so `lib.rs` keeps one
/// runner in a `thread_local!` and exports free functions over it.
pub struct LabRunner {
    lab: Laboratory<BrowserFrames>,
    vector_mode: Rc<Cell<bool>>,
    #[cfg(feature = "vectors")]
    vectors: Rc<std::cell::RefCell<lab_engine::VectorState>>,
}

impl LabRunner {
    /// `on_frame` is invoked with the handle of every fired animation frame.
    pub fn new(config: LabConfig, on_frame: fn(FrameHandle)) -> Self {
        let vector_mode = Rc::new(Cell::new(false));
        let provider = WebProvider::new(&config, Rc::clone(&vector_mode));
        #[cfg(feature = "vectors")]
        let vectors = provider.vectors().state();
        Self {
            lab: Laboratory::new(config, BrowserFrames::new(on_frame), provider),
            vector_mode,
            #[cfg(feature = "vectors")]
            vectors,
        }
    }

    pub fn modules(&self) -> Vec<ModuleId> {
        self.lab.modules()
    }

    /// Control schema of `key` as JSON.
    pub fn controls_json(&self, key: &str) -> Result<String, LabError> {
        let id: ModuleId = key.parse()?;
        let schema = self
            .lab
            .schema(id)
            .ok_or_else(|| LabError::UnknownModule(key.to_string()))?;
        Ok(schema.to_json()?)
    }

    pub fn open(&mut self, key: &str) -> Result<ModuleId, LabError> {
        self.vector_mode.set(false);
        self.lab.open(key)
    }

    /// Open `key` drawing into the tessellation buffer instead of the page.
    #[cfg(feature = "vectors")]
    pub fn open_vectors(&mut self, key: &str) -> Result<ModuleId, LabError> {
        self.vector_mode.set(true);
        let opened = self.lab.open(key);
        self.vector_mode.set(false);
        opened
    }

    pub fn close(&mut self) {
        self.lab.close();
    }

    pub fn start(&mut self) -> Result<(), LabError> {
        self.lab.start()
    }

    pub fn stop(&mut self) -> Result<(), LabError> {
        self.lab.stop()
    }

    pub fn reset(&mut self) -> Result<(), LabError> {
        self.lab.reset()
    }

    pub fn set_control(&mut self, control: &str, value: f32) -> Result<f32, LabError> {
        self.lab.set_control(control, value)
    }

    /// Dispatch a fired animation frame.
    pub fn fire(&mut self, handle: FrameHandle) {
        self.lab.frames_mut().complete(handle);
        if !self.lab.fire(handle) {
            log::trace!("frame {} was revoked", handle.0);
        }
    }

    pub fn is_running(&self) -> bool {
        self.lab.is_running()
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.lab.summary()
    }

    pub fn readout(&self) -> Option<Summary> {
        self.lab.readout()
    }

    // -- Vector buffer accessors (for JS to read wasm memory) --

    #[cfg(feature = "vectors")]
    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.vectors.borrow().buffer_ptr()
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertex_count(&self) -> usize {
        self.vectors.borrow().vertex_count()
    }
}
