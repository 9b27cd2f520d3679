//! Structured diagnostics for non-fatal conditions.
//!
//! A binder never lets a submit-time failure crash the host page, but a
//! host application still needs to observe what went wrong. Each
//! swallowed failure (and each missing-registration warning) is emitted
//! as a [`Diagnostic`] value that hosts can subscribe to, instead of
//! having to scrape log output.

use std::fmt;

use serde::Serialize;

/// A non-fatal condition observed by a form binder.
///
/// Diagnostics are emitted through the binder's diagnostic signal and
/// simultaneously logged via `tracing`. They carry enough context for a
/// host to attribute the condition to a form (and, where it applies, a
/// field) without parsing log lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A submit event fired but no callback pair was registered.
    MissingSubmitHandler {
        /// The binder's form group name.
        form: String,
    },
    /// The validation pass itself failed; no callback was invoked.
    SubmitAborted {
        /// The binder's form group name.
        form: String,
        /// Display rendering of the underlying error.
        reason: String,
    },
    /// A live (blur-triggered) validity check failed.
    CheckFailed {
        /// The binder's form group name.
        form: String,
        /// The field whose check failed.
        field: String,
        /// Display rendering of the underlying error.
        reason: String,
    },
    /// A registered callback returned an error; it was swallowed.
    CallbackFailed {
        /// The binder's form group name.
        form: String,
        /// Display rendering of the callback's error.
        reason: String,
    },
}

impl Diagnostic {
    /// Logs this diagnostic at the appropriate level.
    ///
    /// `MissingSubmitHandler` is a warning; everything else represents a
    /// swallowed failure and logs as an error.
    pub fn log(&self) {
        match self {
            Self::MissingSubmitHandler { form } => {
                tracing::warn!(form = %form, "no submit callbacks registered");
            }
            Self::SubmitAborted { form, reason } => {
                tracing::error!(form = %form, %reason, "submit validation pass aborted");
            }
            Self::CheckFailed {
                form,
                field,
                reason,
            } => {
                tracing::error!(form = %form, field = %field, %reason, "validity check failed");
            }
            Self::CallbackFailed { form, reason } => {
                tracing::error!(form = %form, %reason, "submit callback failed");
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSubmitHandler { form } => {
                write!(f, "form \"{form}\": no submit callbacks registered")
            }
            Self::SubmitAborted { form, reason } => {
                write!(f, "form \"{form}\": submit aborted: {reason}")
            }
            Self::CheckFailed {
                form,
                field,
                reason,
            } => {
                write!(f, "form \"{form}\", field \"{field}\": check failed: {reason}")
            }
            Self::CallbackFailed { form, reason } => {
                write!(f, "form \"{form}\": callback failed: {reason}")
            }
        }
    }
}
