//! Diagnostic system for the Stencil stub parser.
//!
//! - Error codes for searchability (E0xxx lexical, E1xxx syntax, E2xxx
//!   construction)
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Labels for context (why it's wrong)
//!
//! The parser reports exactly one diagnostic per failed parse; rendering
//! it is a caller concern.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
