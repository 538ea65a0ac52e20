pub mod controls;
pub mod module;
pub mod summary;
pub mod types;
