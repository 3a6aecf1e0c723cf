//! Secret scrubbing for blueprint text before it leaves the process.

pub mod redactor;
pub mod rules;

pub use redactor::{RedactionOutcome, Redactor};
