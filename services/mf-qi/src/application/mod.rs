//! Application layer

pub mod autosave;
pub mod commands;
pub mod handler;
pub mod reference_loader;
pub mod views;

pub use autosave::run_autosave;
pub use commands::*;
pub use handler::ServiceHandler;
pub use reference_loader::ReferenceLoader;
pub use views::*;
