use std::collections::HashMap;

use lab_engine::{FrameHandle, FrameSource};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// `requestAnimationFrame`-backed frame source.
///
/// Handles are issued locally and mapped to the browser's request ids, so a
/// fired callback can name itself before the browser id is known. When a
/// request fires, the one-shot closure calls `on_frame` with its handle.
pub struct BrowserFrames {
    window: Option<web_sys::Window>,
    on_frame: fn(FrameHandle),
    next: u32,
    requests: HashMap<FrameHandle, i32>,
}

impl BrowserFrames {
    pub fn new(on_frame: fn(FrameHandle)) -> Self {
        Self {
            window: web_sys::window(),
            on_frame,
            next: 1,
            requests: HashMap::new(),
        }
    }

    /// Forget a request that has fired.
    pub fn complete(&mut self, handle: FrameHandle) {
        self.requests.remove(&handle);
    }
}

impl FrameSource for BrowserFrames {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let window = self.window.as_ref()?;
        let handle = FrameHandle(self.next);
        let on_frame = self.on_frame;
        let callback = Closure::once_into_js(move || on_frame(handle));
        match window.request_animation_frame(callback.unchecked_ref()) {
            Ok(id) => {
                self.next = self.next.wrapping_add(1).max(1);
                self.requests.insert(handle, id);
                Some(handle)
            }
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {e:?}");
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let Some(id) = self.requests.remove(&handle) else {
            return;
        };
        if let Some(window) = &self.window {
            if let Err(e) = window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {e:?}");
            }
        }
    }
}
