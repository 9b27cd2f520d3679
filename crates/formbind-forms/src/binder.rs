//! Form binders.
//!
//! A [`FormBinder`] owns a named collection of fields, discovers their
//! bound elements once at construction, wires change/blur/submit
//! notifications, and orchestrates whole-form validation before
//! invoking exactly one of two outcome callbacks.
//!
//! Binding is eager and all-or-nothing: the form element is located
//! first, then every field's element in declaration order, and the
//! first failure aborts construction without exposing a partial binder.
//! Afterwards the binder is terminally bound; re-construction is the
//! only way to rebind.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use formbind_core::{Diagnostic, FormError, FormResult};
use formbind_dom::{
    Document, ElementEvent, ElementHandle, ElementRef, FormHandle, FormRef, SubmitEvent,
};
use formbind_signals::Signal;

use crate::field::{Field, FieldKind, FieldSnapshot, FieldValue, PeerValues};

/// The callback invoked when every field validates. Receives the
/// collected data keyed by field name.
pub type ValidCallback = Rc<dyn Fn(&HashMap<String, FieldValue>) -> anyhow::Result<()>>;

/// The callback invoked when validation fails. Receives snapshots of
/// the invalid subset, in declaration order.
pub type InvalidCallback = Rc<dyn Fn(&[FieldSnapshot]) -> anyhow::Result<()>>;

#[derive(Clone)]
struct SubmitCallbacks {
    on_valid: ValidCallback,
    on_invalid: InvalidCallback,
}

/// A shared handle to a bound form binder.
///
/// The wired event subscriptions hold weak references back to the
/// binder, so `bind` hands out the binder behind `Rc<RefCell<…>>`.
pub type BinderRef = Rc<RefCell<FormBinder>>;

struct SubmitOutcome {
    data: HashMap<String, FieldValue>,
    invalid: Vec<FieldSnapshot>,
}

/// The owner of a named group of fields and the form-level submit
/// protocol.
pub struct FormBinder {
    name: String,
    fields: Vec<Field>,
    form: FormRef,
    callbacks: Option<SubmitCallbacks>,
    diagnostics: Rc<Signal<Diagnostic>>,
}

impl std::fmt::Debug for FormBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormBinder")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("callbacks", &self.callbacks.is_some())
            .finish_non_exhaustive()
    }
}

impl FormBinder {
    /// Binds the declared fields to the document.
    ///
    /// Locates the form carrying `formGroup=name` (failing with
    /// [`FormError::FormNotFound`] before any field is touched), then
    /// locates and attaches every field's element in declaration order.
    /// Radio groups additionally collect every sibling input sharing
    /// the resolved element's name attribute. The first failure aborts
    /// the whole construction.
    pub fn bind(
        name: impl Into<String>,
        fields: Vec<Field>,
        document: &dyn Document,
    ) -> FormResult<BinderRef> {
        let name = name.into();
        let form = document
            .form(&name)
            .ok_or_else(|| FormError::FormNotFound(name.clone()))?;

        let mut fields = fields;
        for field in &mut fields {
            let tag = field.kind().tag();
            let element = document.control(&name, tag, field.name()).ok_or_else(|| {
                FormError::ControlNotFound {
                    group: name.clone(),
                    tag: tag.to_string(),
                    control: field.name().to_string(),
                }
            })?;
            if field.kind() == FieldKind::RadioGroup {
                let input_name = element.borrow().input_name();
                field.bind_radio_siblings(document.inputs_named(&name, &input_name));
            }
            field.bind_element(element)?;
        }
        tracing::debug!(form = %name, fields = fields.len(), "form bound");

        let binder = Rc::new(RefCell::new(Self {
            name,
            fields,
            form,
            callbacks: None,
            diagnostics: Rc::new(Signal::new()),
        }));
        Self::wire(&binder);
        Ok(binder)
    }

    /// Registers the success/failure callback pair, replacing any prior
    /// pair. Either callback is invoked zero or one time per submit.
    pub fn on_submit<S, F>(&mut self, on_valid: S, on_invalid: F)
    where
        S: Fn(&HashMap<String, FieldValue>) -> anyhow::Result<()> + 'static,
        F: Fn(&[FieldSnapshot]) -> anyhow::Result<()> + 'static,
    {
        self.callbacks = Some(SubmitCallbacks {
            on_valid: Rc::new(on_valid),
            on_invalid: Rc::new(on_invalid),
        });
    }

    /// Looks up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Mutable lookup, for programmatic value or rule changes.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.name() == name)
    }

    /// The declared fields, in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The binder's form group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The signal carrying this binder's non-fatal observations.
    /// Connect a receiver to observe swallowed failures and
    /// missing-registration warnings without scraping logs.
    pub fn diagnostics(&self) -> Rc<Signal<Diagnostic>> {
        Rc::clone(&self.diagnostics)
    }

    /// Wires the submit interception and per-field listeners. Receivers
    /// hold weak references; they go quiet once the binder is dropped.
    fn wire(binder: &BinderRef) {
        let form = Rc::clone(&binder.borrow().form);
        let weak = Rc::downgrade(binder);
        form.borrow_mut().subscribe_submit(
            "formbind",
            Rc::new(move |event: &SubmitEvent| {
                event.prevent_default();
                if let Some(binder) = weak.upgrade() {
                    Self::dispatch_submit(&binder);
                }
            }),
        );

        let wired: Vec<(String, FieldKind, ElementRef)> = binder
            .borrow()
            .fields
            .iter()
            .filter(|field| field.kind() != FieldKind::RadioGroup)
            .filter_map(|field| {
                field
                    .element_ref()
                    .map(|element| (field.name().to_string(), field.kind(), element))
            })
            .collect();

        for (field_name, kind, element) in wired {
            // Text-like controls get live blur feedback; choices and
            // toggles only track value changes. Radio groups are
            // resolved from their siblings at check time.
            let live_check = matches!(
                kind,
                FieldKind::SingleLineText | FieldKind::MultiLineText
            );
            let receiver_id = format!("formbind:{field_name}");
            let weak = Rc::downgrade(binder);
            element.borrow_mut().subscribe(
                &receiver_id,
                Rc::new(move |event: &ElementEvent| {
                    let Some(binder) = weak.upgrade() else {
                        return;
                    };
                    match event {
                        ElementEvent::ValueChanged(raw) => {
                            binder.borrow_mut().store_field_raw(&field_name, raw);
                        }
                        ElementEvent::FocusLost if live_check => {
                            Self::run_live_check(&binder, &field_name);
                        }
                        ElementEvent::FocusLost => {}
                    }
                }),
            );
        }
    }

    fn store_field_raw(&mut self, field_name: &str, raw: &str) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name() == field_name) {
            field.store_raw(raw);
        }
    }

    /// Runs one field's check outside the submit pass (blur feedback).
    /// A lookup failure is logged and emitted, never propagated.
    fn run_live_check(binder: &BinderRef, field_name: &str) {
        let result = binder.borrow_mut().check_field(field_name);
        if let Err(err) = result {
            let (diagnostic, diagnostics) = {
                let binder = binder.borrow();
                (
                    Diagnostic::CheckFailed {
                        form: binder.name.clone(),
                        field: field_name.to_string(),
                        reason: err.to_string(),
                    },
                    Rc::clone(&binder.diagnostics),
                )
            };
            diagnostic.log();
            diagnostics.emit(&diagnostic);
        }
    }

    fn check_field(&mut self, field_name: &str) -> FormResult<()> {
        let peers = self.peer_values();
        match self.fields.iter_mut().find(|f| f.name() == field_name) {
            Some(field) => field.check_validity(&peers),
            None => Ok(()),
        }
    }

    /// Snapshot of every field's stored value, for `equals` resolution.
    fn peer_values(&self) -> PeerValues {
        let mut peers = PeerValues::new();
        for field in &self.fields {
            peers.insert(field.name(), field.value().clone());
        }
        peers
    }

    /// The submit interception: runs the validation protocol, then
    /// invokes at most one callback outside the binder borrow, so
    /// callbacks may call back into the binder through their own handle.
    fn dispatch_submit(binder: &BinderRef) {
        let (form_name, callbacks, diagnostics, outcome) = {
            let mut binder = binder.borrow_mut();
            let outcome = binder.run_validation_pass();
            (
                binder.name.clone(),
                binder.callbacks.clone(),
                Rc::clone(&binder.diagnostics),
                outcome,
            )
        };

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                let diagnostic = Diagnostic::SubmitAborted {
                    form: form_name,
                    reason: err.to_string(),
                };
                diagnostic.log();
                diagnostics.emit(&diagnostic);
                return;
            }
        };

        let Some(callbacks) = callbacks else {
            let diagnostic = Diagnostic::MissingSubmitHandler { form: form_name };
            diagnostic.log();
            diagnostics.emit(&diagnostic);
            return;
        };

        let result = if outcome.invalid.is_empty() {
            tracing::debug!(form = %form_name, "form valid, invoking success callback");
            (callbacks.on_valid)(&outcome.data)
        } else {
            tracing::debug!(
                form = %form_name,
                invalid = outcome.invalid.len(),
                "form invalid, invoking failure callback"
            );
            (callbacks.on_invalid)(&outcome.invalid)
        };
        if let Err(err) = result {
            let diagnostic = Diagnostic::CallbackFailed {
                form: form_name,
                reason: format!("{err:#}"),
            };
            diagnostic.log();
            diagnostics.emit(&diagnostic);
        }
    }

    /// Checks every field in declaration order, recording values and
    /// collecting the invalid subset. The peer snapshot is refreshed
    /// after each field, so an `equals` rule sees the freshest value of
    /// an earlier-checked peer.
    fn run_validation_pass(&mut self) -> FormResult<SubmitOutcome> {
        let mut peers = self.peer_values();
        let mut data = HashMap::new();
        let mut invalid = Vec::new();
        for index in 0..self.fields.len() {
            let field = &mut self.fields[index];
            field.check_validity(&peers)?;
            peers.insert(field.name(), field.value().clone());
            data.insert(field.name().to_string(), field.value().clone());
            if !field.valid() {
                invalid.push(field.snapshot());
            }
        }
        Ok(SubmitOutcome { data, invalid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators;
    use formbind_dom::{MemoryDocument, MemoryElement};
    use std::cell::Cell;

    fn signup_document() -> MemoryDocument {
        let mut doc = MemoryDocument::new();
        doc.add_form("signup");
        doc.add_element(MemoryElement::text("signup", "name"));
        doc.add_element(MemoryElement::text("signup", "email"));
        doc
    }

    #[test]
    fn test_bind_missing_form_fails_before_fields() {
        let doc = signup_document();
        let fields = vec![Field::single_line("name")];
        let err = FormBinder::bind("unknown", fields, &doc).expect_err("missing form");
        assert!(matches!(err, FormError::FormNotFound(name) if name == "unknown"));
    }

    #[test]
    fn test_bind_missing_control_aborts_construction() {
        let doc = signup_document();
        let fields = vec![
            Field::single_line("name"),
            Field::single_line("not-in-document"),
        ];
        let err = FormBinder::bind("signup", fields, &doc).expect_err("missing control");
        assert!(matches!(
            err,
            FormError::ControlNotFound { control, .. } if control == "not-in-document"
        ));
    }

    #[test]
    fn test_bind_requires_matching_tag() {
        let doc = signup_document();
        // Declared as a textarea, present as an input.
        let fields = vec![Field::multi_line("name")];
        let err = FormBinder::bind("signup", fields, &doc).expect_err("tag mismatch");
        assert!(matches!(
            err,
            FormError::ControlNotFound { tag, .. } if tag == "textarea"
        ));
    }

    #[test]
    fn test_bind_empty_select_aborts_construction() {
        let mut doc = MemoryDocument::new();
        doc.add_form("prefs");
        doc.add_element(MemoryElement::select("prefs", "color", &[]));
        let err = FormBinder::bind("prefs", vec![Field::single_choice("color")], &doc)
            .expect_err("empty select");
        assert!(matches!(err, FormError::NoOptions(control) if control == "color"));
    }

    #[test]
    fn test_field_lookup_by_name() {
        let doc = signup_document();
        let binder = FormBinder::bind(
            "signup",
            vec![Field::single_line("name"), Field::single_line("email")],
            &doc,
        )
        .expect("bindable");

        let binder = binder.borrow();
        assert!(binder.field("email").is_some());
        assert!(binder.field("missing").is_none());
        assert_eq!(binder.fields().len(), 2);
        assert_eq!(binder.name(), "signup");
    }

    #[test]
    fn test_on_submit_replaces_prior_pair() {
        let doc = signup_document();
        let binder = FormBinder::bind("signup", vec![Field::single_line("name")], &doc)
            .expect("bindable");

        let first_hits = Rc::new(Cell::new(0));
        let second_hits = Rc::new(Cell::new(0));

        let hits = Rc::clone(&first_hits);
        binder.borrow_mut().on_submit(
            move |_| {
                hits.set(hits.get() + 1);
                Ok(())
            },
            |_| Ok(()),
        );
        let hits = Rc::clone(&second_hits);
        binder.borrow_mut().on_submit(
            move |_| {
                hits.set(hits.get() + 1);
                Ok(())
            },
            |_| Ok(()),
        );

        doc.type_into("signup", "name", "Anna");
        doc.submit("signup");
        assert_eq!(first_hits.get(), 0);
        assert_eq!(second_hits.get(), 1);
    }

    #[test]
    fn test_value_changes_tracked_before_any_check() {
        let doc = signup_document();
        let binder = FormBinder::bind("signup", vec![Field::single_line("name")], &doc)
            .expect("bindable");

        doc.type_into("signup", "name", "Anna");
        assert_eq!(
            binder.borrow().field("name").expect("declared").value(),
            &FieldValue::Text("Anna".into())
        );
        // No check ran yet.
        assert!(binder.borrow().field("name").expect("declared").valid());
        assert_eq!(doc.marker_of("signup", "name"), None);
    }
}
