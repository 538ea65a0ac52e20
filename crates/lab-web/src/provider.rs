use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use lab_engine::{LabConfig, ModuleId, Surface, SurfaceKind, SurfaceProvider};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use crate::canvas::CanvasSurface;
use crate::dom::DomSurface;

/// Binds sessions to the page's experiment container.
///
/// With the `vectors` feature, a session opened in vector mode draws into the
/// shared tessellation buffer instead of the DOM.
pub struct WebProvider {
    container_id: String,
    fallback: Vec2,
    vector_mode: Rc<Cell<bool>>,
    #[cfg(feature = "vectors")]
    vectors: lab_engine::VectorProvider,
}

impl WebProvider {
    pub fn new(config: &LabConfig, vector_mode: Rc<Cell<bool>>) -> Self {
        let fallback = Vec2::new(config.surface_width, config.surface_height);
        Self {
            container_id: config.container_id.clone(),
            fallback,
            vector_mode,
            #[cfg(feature = "vectors")]
            vectors: lab_engine::VectorProvider::new(fallback),
        }
    }

    #[cfg(feature = "vectors")]
    pub fn vectors(&self) -> &lab_engine::VectorProvider {
        &self.vectors
    }

    #[cfg(feature = "vectors")]
    fn vector_surface(&mut self, module: ModuleId, kind: SurfaceKind) -> Option<Box<dyn Surface>> {
        self.vectors.acquire(module, kind)
    }

    #[cfg(not(feature = "vectors"))]
    fn vector_surface(&mut self, module: ModuleId, _kind: SurfaceKind) -> Option<Box<dyn Surface>> {
        log::warn!("vector mode requested for {module} without the vectors feature");
        None
    }

    fn container(&self) -> Option<(Document, HtmlElement)> {
        let document = web_sys::window()?.document()?;
        let container = document
            .get_element_by_id(&self.container_id)?
            .dyn_into::<HtmlElement>()
            .ok()?;
        Some((document, container))
    }

    /// The container's client size, or the configured size when it has no layout yet.
    fn size_of(&self, container: &HtmlElement) -> Vec2 {
        let (w, h) = (container.client_width(), container.client_height());
        if w > 0 && h > 0 {
            Vec2::new(w as f32, h as f32)
        } else {
            self.fallback
        }
    }

    fn canvas(
        document: &Document,
        container: &HtmlElement,
        size: Vec2,
    ) -> Option<CanvasRenderingContext2d> {
        let canvas = document
            .create_element("canvas")
            .ok()?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        canvas.set_width(size.x as u32);
        canvas.set_height(size.y as u32);
        container.append_child(&canvas).ok()?;
        canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()
    }
}

impl SurfaceProvider for WebProvider {
    fn acquire(&mut self, module: ModuleId, kind: SurfaceKind) -> Option<Box<dyn Surface>> {
        if self.vector_mode.get() {
            return self.vector_surface(module, kind);
        }
        let Some((document, container)) = self.container() else {
            log::warn!("container '{}' not found", self.container_id);
            return None;
        };
        container.set_inner_html("");
        let size = self.size_of(&container);
        match kind {
            SurfaceKind::Dom => Some(Box::new(DomSurface::new(document, container, size))),
            SurfaceKind::Canvas => {
                let Some(ctx) = Self::canvas(&document, &container, size) else {
                    log::warn!("no 2d context for {module}");
                    return None;
                };
                Some(Box::new(CanvasSurface::new(ctx, size)))
            }
        }
    }
}
