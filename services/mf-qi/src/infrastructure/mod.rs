//! 基础设施层

pub mod draft_store;
pub mod fallback;

pub use draft_store::{DRAFT_KEY, DraftRepository};
