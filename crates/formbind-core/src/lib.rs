//! # formbind-core
//!
//! Foundation types for the formbind library: the [`FormError`] error type
//! with its fatal/recoverable severity split, structured [`Diagnostic`]
//! events for non-fatal conditions, and settings/logging helpers.

pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod settings;

pub use diagnostics::Diagnostic;
pub use error::{FormError, FormResult, Severity};
pub use settings::Settings;
