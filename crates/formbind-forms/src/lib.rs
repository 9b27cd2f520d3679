//! # formbind-forms
//!
//! The form core of the formbind library: ordered [`RuleSet`]s built
//! from the factory functions in [`validators`], typed [`Field`]s with
//! kind-specific validity checks, and the [`FormBinder`] that binds a
//! declared field collection to a host document and runs the
//! validation/submit protocol.

pub mod binder;
pub mod field;
pub mod rules;
pub mod validators;

pub use binder::{BinderRef, FormBinder};
pub use field::{Field, FieldKind, FieldSnapshot, FieldValue, PeerValues, ValueType};
pub use rules::{RuleSet, RuleSpec};
