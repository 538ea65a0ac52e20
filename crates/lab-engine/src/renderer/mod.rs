pub mod dom;
pub mod draw;
pub mod surface;

// Re-export key types for convenient access
pub use draw::{Color, DrawCmd, DrawList, Stroke, TextAlign};
pub use surface::{FrameLog, RecordingProvider, RecordingSurface, Surface, SurfaceProvider};
