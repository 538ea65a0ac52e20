use glam::Vec2;
use lab_engine::{layout, DrawList, Surface, SurfaceKind};
use web_sys::{Document, HtmlElement};

/// Retained-DOM surface: every frame replaces the container's children with
/// freshly built, absolutely positioned elements.
pub struct DomSurface {
    document: Document,
    container: HtmlElement,
    size: Vec2,
}

impl DomSurface {
    pub fn new(document: Document, container: HtmlElement, size: Vec2) -> Self {
        // Children are positioned against the container.
        if let Err(e) = container.style().set_property("position", "relative") {
            log::warn!("could not position container: {e:?}");
        }
        Self {
            document,
            container,
            size,
        }
    }
}

impl Surface for DomSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Dom
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn present(&mut self, frame: &DrawList) {
        self.container.set_inner_html("");
        for spec in layout(frame) {
            let node = match self.document.create_element("div") {
                Ok(node) => node,
                Err(e) => {
                    log::warn!("create_element failed: {e:?}");
                    return;
                }
            };
            if let Err(e) = node.set_attribute("style", &spec.style) {
                log::warn!("set style failed: {e:?}");
            }
            if let Some(text) = &spec.text {
                node.set_text_content(Some(text));
            }
            if let Err(e) = self.container.append_child(&node) {
                log::warn!("append_child failed: {e:?}");
                return;
            }
        }
    }
}
