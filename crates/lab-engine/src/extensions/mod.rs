// Presentational helpers, independent of any experiment.

pub mod easing;

pub use easing::{fade_envelope, quad_out};
