use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::api::types::{ModuleId, SurfaceKind};
use crate::renderer::draw::DrawList;

/// A rendering target bound to one session.
///
/// `present` replaces whatever was shown before: surfaces keep no memory of
/// earlier frames.
pub trait Surface {
    fn kind(&self) -> SurfaceKind;

    /// Drawable size in pixels.
    fn size(&self) -> Vec2;

    fn present(&mut self, frame: &DrawList);
}

/// Hands out surfaces when a module opens.
pub trait SurfaceProvider {
    /// `None` when the host has nowhere to draw; the open is then aborted.
    fn acquire(&mut self, module: ModuleId, kind: SurfaceKind) -> Option<Box<dyn Surface>>;
}

/// Shared record of presented frames.
#[derive(Debug, Clone, Default)]
pub struct FrameLog {
    frames: Rc<RefCell<Vec<(SurfaceKind, DrawList)>>>,
}

impl FrameLog {
    pub fn len(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.borrow().is_empty()
    }

    pub fn last(&self) -> Option<DrawList> {
        self.frames.borrow().last().map(|(_, list)| list.clone())
    }

    pub fn last_kind(&self) -> Option<SurfaceKind> {
        self.frames.borrow().last().map(|(kind, _)| *kind)
    }

    pub fn clear(&self) {
        self.frames.borrow_mut().clear();
    }

    fn push(&self, kind: SurfaceKind, frame: &DrawList) {
        self.frames.borrow_mut().push((kind, frame.clone()));
    }
}

/// Headless surface that keeps every presented frame.
#[derive(Debug)]
pub struct RecordingSurface {
    kind: SurfaceKind,
    size: Vec2,
    log: FrameLog,
}

impl RecordingSurface {
    pub fn new(kind: SurfaceKind, size: Vec2) -> Self {
        Self {
            kind,
            size,
            log: FrameLog::default(),
        }
    }

    pub fn log(&self) -> FrameLog {
        self.log.clone()
    }
}

impl Surface for RecordingSurface {
    fn kind(&self) -> SurfaceKind {
        self.kind
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn present(&mut self, frame: &DrawList) {
        self.log.push(self.kind, frame);
    }
}

/// Provider of recording surfaces sharing one [`FrameLog`].
#[derive(Debug)]
pub struct RecordingProvider {
    size: Vec2,
    log: FrameLog,
    missing: Vec<ModuleId>,
}

impl RecordingProvider {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            log: FrameLog::default(),
            missing: Vec::new(),
        }
    }

    /// Refuse to provide a surface for `module`.
    pub fn without(mut self, module: ModuleId) -> Self {
        self.missing.push(module);
        self
    }

    pub fn log(&self) -> FrameLog {
        self.log.clone()
    }
}

impl SurfaceProvider for RecordingProvider {
    fn acquire(&mut self, module: ModuleId, kind: SurfaceKind) -> Option<Box<dyn Surface>> {
        if self.missing.contains(&module) {
            return None;
        }
        Some(Box::new(RecordingSurface {
            kind,
            size: self.size,
            log: self.log.clone(),
        }))
    }
}
