//! # formbind-dom
//!
//! The external-document seam of the formbind library. A form binder
//! never talks to a concrete document API; it locates its elements
//! through the [`Document`] capability and afterwards holds only opaque
//! [`ElementRef`]/[`FormRef`] handles exposing value access, validity
//! markers, and event subscription.
//!
//! [`MemoryDocument`] is the bundled in-memory implementation: the test
//! double every integration test drives, and a ready-made host for
//! headless use. A browser-backed host implements the same traits.

pub mod element;
pub mod memory;

pub use element::{
    ChoiceOption, Document, ElementEvent, ElementHandle, ElementRef, ElementTag, FormHandle,
    FormRef, Marker, SubmitEvent,
};
pub use memory::{MemoryDocument, MemoryElement};
