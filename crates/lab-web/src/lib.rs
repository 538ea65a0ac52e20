//! Browser bridge for the science lab.
//!
//! One [`LabRunner`] lives in a `thread_local!`; the page drives it through
//! the `lab_*` exports and `requestAnimationFrame` drives it through
//! [`BrowserFrames`]. Fallible calls log a warning and return a neutral value
//! (`false`, `NaN`, `"null"`) instead of throwing into JS.

use std::cell::RefCell;

use lab_engine::{FrameHandle, LabConfig, Summary};
use wasm_bindgen::prelude::*;

pub mod canvas;
pub mod dom;
pub mod frames;
pub mod provider;
pub mod runner;

pub use frames::BrowserFrames;
pub use provider::WebProvider;
pub use runner::LabRunner;

thread_local! {
    static RUNNER: RefCell<Option<LabRunner>> = const { RefCell::new(None) };
}

fn with_runner<R>(f: impl FnOnce(&mut LabRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("lab not initialized; call lab_init() first");
                None
            }
        }
    })
}

fn fire_frame(handle: FrameHandle) {
    with_runner(|r| r.fire(handle));
}

fn summary_json(summary: Option<&Summary>) -> String {
    let Some(summary) = summary else {
        return "null".to_string();
    };
    summary.to_json().unwrap_or_else(|e| {
        log::warn!("summary serialization failed: {e}");
        "null".to_string()
    })
}

/// Initialize the lab. `config_json` may be empty or `{}` for defaults.
#[wasm_bindgen]
pub fn lab_init(config_json: &str) {
    console_error_panic_hook::set_once();
    let config = if config_json.trim().is_empty() {
        LabConfig::default()
    } else {
        LabConfig::from_json(config_json).unwrap_or_else(|e| {
            web_sys::console::warn_1(&format!("{e}; using defaults").into());
            LabConfig::default()
        })
    };
    let _ = console_log::init_with_level(config.level());

    let runner = LabRunner::new(config, fire_frame);
    let previous = RUNNER.with(|cell| cell.borrow_mut().replace(runner));
    if let Some(mut previous) = previous {
        previous.close();
    }
    log::info!("science lab: initialized");
}

/// Registry keys in launcher order, as a JSON array.
#[wasm_bindgen]
pub fn lab_modules() -> String {
    with_runner(|r| serde_json::to_string(&r.modules()))
        .and_then(|json| json.map_err(|e| log::warn!("{e}")).ok())
        .unwrap_or_else(|| "[]".to_string())
}

/// Control schema of a module, as JSON.
#[wasm_bindgen]
pub fn lab_controls(id: &str) -> String {
    with_runner(|r| r.controls_json(id))
        .and_then(|json| json.map_err(|e| log::warn!("{e}")).ok())
        .unwrap_or_else(|| "null".to_string())
}

/// Open a module into the page container. `false` if it could not be opened.
#[wasm_bindgen]
pub fn lab_open(id: &str) -> bool {
    with_runner(|r| r.open(id))
        .and_then(|opened| opened.map_err(|e| log::warn!("{e}")).ok())
        .is_some()
}

#[wasm_bindgen]
pub fn lab_close() {
    with_runner(|r| r.close());
}

#[wasm_bindgen]
pub fn lab_start() {
    if let Some(Err(e)) = with_runner(|r| r.start()) {
        log::warn!("{e}");
    }
}

#[wasm_bindgen]
pub fn lab_stop() {
    if let Some(Err(e)) = with_runner(|r| r.stop()) {
        log::warn!("{e}");
    }
}

#[wasm_bindgen]
pub fn lab_reset() {
    if let Some(Err(e)) = with_runner(|r| r.reset()) {
        log::warn!("{e}");
    }
}

/// Commit a control value. Returns the stored (snapped) value, `NaN` on error.
#[wasm_bindgen]
pub fn lab_set_control(id: &str, value: f32) -> f32 {
    with_runner(|r| r.set_control(id, value))
        .and_then(|committed| committed.map_err(|e| log::warn!("{e}")).ok())
        .unwrap_or(f32::NAN)
}

/// Published result of the open session, or `null`.
#[wasm_bindgen]
pub fn lab_summary() -> String {
    with_runner(|r| summary_json(r.summary())).unwrap_or_else(|| "null".to_string())
}

/// Values derived from the current controls, or `null`.
#[wasm_bindgen]
pub fn lab_readout() -> String {
    with_runner(|r| summary_json(r.readout().as_ref())).unwrap_or_else(|| "null".to_string())
}

#[wasm_bindgen]
pub fn lab_is_running() -> bool {
    with_runner(|r| r.is_running()).unwrap_or(false)
}

// -- Vector tessellation (behind the `vectors` feature) --

/// Open a module drawing into the vertex buffer instead of the page.
#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn lab_open_vectors(id: &str) -> bool {
    with_runner(|r| r.open_vectors(id))
        .and_then(|opened| opened.map_err(|e| log::warn!("{e}")).ok())
        .is_some()
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn get_vector_vertices_ptr() -> *const f32 {
    with_runner(|r| r.vector_vertices_ptr()).unwrap_or(std::ptr::null())
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn get_vector_vertex_count() -> u32 {
    with_runner(|r| r.vector_vertex_count() as u32).unwrap_or(0)
}
