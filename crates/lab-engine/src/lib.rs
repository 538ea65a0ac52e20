pub mod api;
pub mod core;
pub mod experiments;
pub mod extensions;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::controls::{Control, ControlKind, ControlSchema, Params};
pub use api::module::{Exhibit, ExhibitView, Simulation, FRAME_DT};
pub use api::summary::{Acidity, ImageKind, Phase as MatterPhase, Summary};
pub use api::types::{FrameHandle, ModuleId, SessionId, SurfaceKind};
pub use core::config::LabConfig;
pub use core::error::LabError;
pub use core::host::Laboratory;
pub use core::registry::ModuleRegistry;
pub use core::scheduler::{FrameSource, Scheduler, VirtualFrames};
pub use core::session::{Phase, Session};
pub use renderer::dom::{layout, ElementSpec};
pub use renderer::draw::{Color, DrawCmd, DrawList, Stroke, TextAlign};
pub use renderer::surface::{FrameLog, RecordingProvider, RecordingSurface, Surface, SurfaceProvider};

#[cfg(feature = "vectors")]
pub use systems::vector::{VectorProvider, VectorState, VectorSurface, VectorVertex};
