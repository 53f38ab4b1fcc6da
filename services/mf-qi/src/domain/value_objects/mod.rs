//! 值对象

mod check_outcome;
mod form_number;
mod percent_ok;
mod row_id;

pub use check_outcome::*;
pub use form_number::*;
pub use percent_ok::*;
pub use row_id::*;
