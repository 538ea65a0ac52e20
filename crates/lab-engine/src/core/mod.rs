pub mod config;
pub mod error;
pub mod host;
pub mod registry;
pub mod scheduler;
pub mod session;
