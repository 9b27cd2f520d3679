//! # formbind
//!
//! Declarative form binding and validation for Rust hosts.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient
//! access. Declare typed fields with validator rule sets, bind them to a
//! host document through the injected locator capability, and register a
//! success/failure callback pair; the binder intercepts submit events,
//! validates every field, and invokes exactly one of the two callbacks.
//!
//! ```
//! use std::collections::HashMap;
//!
//! use formbind::dom::{MemoryDocument, MemoryElement};
//! use formbind::forms::{validators, Field, FormBinder};
//!
//! let mut doc = MemoryDocument::new();
//! doc.add_form("signup");
//! doc.add_element(MemoryElement::text("signup", "email"));
//!
//! let binder = FormBinder::bind(
//!     "signup",
//!     vec![Field::single_line("email")
//!         .with_validators([validators::required(), validators::email()])],
//!     &doc,
//! )
//! .expect("bindings match the document");
//!
//! binder.borrow_mut().on_submit(
//!     |data: &HashMap<_, _>| {
//!         println!("submitted: {data:?}");
//!         Ok(())
//!     },
//!     |invalid| {
//!         println!("{} field(s) invalid", invalid.len());
//!         Ok(())
//!     },
//! );
//!
//! doc.type_into("signup", "email", "anna@example.com");
//! doc.submit("signup");
//! ```

/// Core types: errors, diagnostics, settings, and logging setup.
pub use formbind_core as core;

/// Signal dispatcher for event and diagnostic fan-out.
pub use formbind_signals as signals;

/// Document abstraction: element handles, markers, and the in-memory
/// document.
pub use formbind_dom as dom;

/// Form core: rule sets, validator factories, fields, and the binder.
pub use formbind_forms as forms;

// Third-party re-exports for user convenience
pub use anyhow;
pub use tracing;
