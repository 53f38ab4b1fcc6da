//! 领域服务

pub mod date_rule;
pub mod submission;
pub mod validation;

pub use date_rule::{DateCheck, DateRuleError};
pub use submission::build_submission;
pub use validation::{SubmissionError, ValidatedForm, validate_for_submission};
