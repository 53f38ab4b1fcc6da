//! 实体

mod draft;
mod inspection_form;
mod pallet_row;

pub use draft::*;
pub use inspection_form::*;
pub use pallet_row::*;
