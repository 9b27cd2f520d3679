//! Error types for form binding and validation.
//!
//! This module provides the [`FormError`] enum covering the two failure
//! tiers of the library: fatal binding errors raised while a
//! `FormBinder` is being constructed against the host document, and
//! recoverable errors raised while a validation pass is running. The
//! [`FormError::severity`] classifier tells the two apart.

use thiserror::Error;

/// How an error should be treated by the integrating host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A misconfiguration between the declared bindings and the actual
    /// document. Construction is aborted and the binding declaration
    /// must be fixed; nothing can be retried at runtime.
    Fatal,
    /// A validation-time failure. Caught at the submit boundary, logged,
    /// and surfaced as a diagnostic; the host page keeps running.
    Recoverable,
}

/// The primary error type for the formbind library.
#[derive(Error, Debug)]
pub enum FormError {
    // ── Binding ──────────────────────────────────────────────────────

    /// No form element carries the requested `formGroup` attribute.
    #[error("couldn't find a form element carrying formGroup=\"{0}\"")]
    FormNotFound(String),

    /// No element of the expected tag carries the requested
    /// `formControl` attribute inside the form.
    #[error("couldn't find <{tag}> carrying formControl=\"{control}\" in form \"{group}\"")]
    ControlNotFound {
        /// The form group searched.
        group: String,
        /// The element tag expected for the field's kind.
        tag: String,
        /// The `formControl` attribute value searched for.
        control: String,
    },

    /// A single-choice field was bound to an element with no options.
    #[error("select carrying formControl=\"{0}\" exposes no options")]
    NoOptions(String),

    // ── Validation ───────────────────────────────────────────────────

    /// An `equals` rule referenced a field name that does not exist in
    /// the owning binder at validation time.
    #[error("field \"{field}\": equals rule references unknown field \"{referenced}\"")]
    UnknownPeer {
        /// The field whose rule set holds the reference.
        field: String,
        /// The name the reference points at.
        referenced: String,
    },
}

impl FormError {
    /// Returns the severity tier this error belongs to.
    ///
    /// Binding errors (`FormNotFound`, `ControlNotFound`, `NoOptions`)
    /// are fatal; validation-time errors are recoverable and get
    /// swallowed at the submit boundary.
    pub const fn severity(&self) -> Severity {
        match self {
            Self::FormNotFound(_) | Self::ControlNotFound { .. } | Self::NoOptions(_) => {
                Severity::Fatal
            }
            Self::UnknownPeer { .. } => Severity::Recoverable,
        }
    }
}

/// A convenience type alias for `Result<T, FormError>`.
pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_not_found_display() {
        let err = FormError::FormNotFound("signup".into());
        assert_eq!(
            err.to_string(),
            "couldn't find a form element carrying formGroup=\"signup\""
        );
    }

    #[test]
    fn test_control_not_found_display() {
        let err = FormError::ControlNotFound {
            group: "signup".into(),
            tag: "input".into(),
            control: "email".into(),
        };
        assert_eq!(
            err.to_string(),
            "couldn't find <input> carrying formControl=\"email\" in form \"signup\""
        );
    }

    #[test]
    fn test_unknown_peer_display() {
        let err = FormError::UnknownPeer {
            field: "confirm".into(),
            referenced: "password".into(),
        };
        assert!(err.to_string().contains("unknown field \"password\""));
    }

    #[test]
    fn test_severity_split() {
        assert_eq!(
            FormError::FormNotFound("x".into()).severity(),
            Severity::Fatal
        );
        assert_eq!(
            FormError::ControlNotFound {
                group: "g".into(),
                tag: "select".into(),
                control: "c".into(),
            }
            .severity(),
            Severity::Fatal
        );
        assert_eq!(FormError::NoOptions("c".into()).severity(), Severity::Fatal);
        assert_eq!(
            FormError::UnknownPeer {
                field: "a".into(),
                referenced: "b".into(),
            }
            .severity(),
            Severity::Recoverable
        );
    }
}
