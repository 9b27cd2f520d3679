//! Typed form fields.
//!
//! A [`Field`] owns the validity-check logic for one bound external
//! control. It never validates on its own schedule: checks run in
//! response to a blur notification routed through the owning binder, or
//! to an explicit [`check_validity`](Field::check_validity) call during
//! the binder's submit pass.
//!
//! One field type covers every control kind: a [`FieldKind`] tag plus
//! kind-specific validation branches, sharing a single name/value/valid
//! surface.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use formbind_core::{FormError, FormResult};
use formbind_dom::{ElementHandle, ElementRef, ElementTag, Marker};

use crate::rules::{RuleSet, RuleSpec};
use crate::validators::{RULE_IBAN, RULE_REQUIRED, RULE_REQUIRE_OPTION};

/// The kinds of control a field can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    /// A single-line text input.
    SingleLineText,
    /// A multi-line textarea.
    MultiLineText,
    /// A select with options.
    SingleChoice,
    /// A checkbox.
    ToggleChoice,
    /// A group of radio inputs sharing a name attribute.
    RadioGroup,
}

impl FieldKind {
    /// The element tag this kind binds to. Toggles and radio groups
    /// resolve to the input tag.
    pub const fn tag(self) -> ElementTag {
        match self {
            Self::SingleLineText | Self::ToggleChoice | Self::RadioGroup => ElementTag::Input,
            Self::MultiLineText => ElementTag::Textarea,
            Self::SingleChoice => ElementTag::Select,
        }
    }
}

/// How raw element text is coerced into a [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ValueType {
    /// Keep the raw text.
    #[default]
    Text,
    /// Parse as a number; unparseable text becomes [`FieldValue::Null`].
    Number,
}

/// A field's current value: text, number, or nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value (nothing entered, nothing selected, toggle off).
    Null,
    /// A text value.
    Text(String),
    /// A numeric value.
    Number(f64),
}

impl FieldValue {
    /// The value as text: numbers in display form, `Null` as empty.
    pub fn as_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }

    /// Returns `true` for [`FieldValue::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// A snapshot of sibling field values, supplied by the owning binder so
/// `equals` references resolve without aliasing the field collection.
#[derive(Debug, Clone, Default)]
pub struct PeerValues {
    values: HashMap<String, FieldValue>,
}

impl PeerValues {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or replaces) a field's stored value.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.values.insert(name.into(), value);
    }

    /// Looks up a field's stored value.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }
}

/// An owned snapshot of one field, handed to failure callbacks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSnapshot {
    /// The field's name.
    pub name: String,
    /// The field's kind.
    pub kind: FieldKind,
    /// The value recorded when the snapshot was taken.
    pub value: FieldValue,
}

/// One declared, independently validated form field.
pub struct Field {
    name: String,
    kind: FieldKind,
    value_type: ValueType,
    rules: RuleSet,
    value: FieldValue,
    valid: bool,
    element: Option<ElementRef>,
    radio_elements: Vec<ElementRef>,
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("value", &self.value)
            .field("valid", &self.valid)
            .field("bound", &self.element.is_some())
            .finish_non_exhaustive()
    }
}

impl Field {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            value_type: ValueType::Text,
            rules: RuleSet::new(),
            value: FieldValue::Null,
            valid: true,
            element: None,
            radio_elements: Vec::new(),
        }
    }

    /// A single-line text input field.
    pub fn single_line(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::SingleLineText)
    }

    /// A multi-line textarea field.
    pub fn multi_line(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::MultiLineText)
    }

    /// A single-choice (select) field.
    pub fn single_choice(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::SingleChoice)
    }

    /// A toggle (checkbox) field.
    pub fn toggle(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::ToggleChoice)
    }

    /// A radio group field.
    pub fn radio_group(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::RadioGroup)
    }

    /// Merges an ordered list of rule sets into this field's rules,
    /// left to right, later entries overwriting same-named earlier ones.
    #[must_use]
    pub fn with_validators(mut self, rules: impl IntoIterator<Item = RuleSet>) -> Self {
        self.add_validators(rules);
        self
    }

    /// Sets how raw element text is coerced.
    #[must_use]
    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Adds validators to the active rule set. Does not re-run
    /// validation.
    pub fn add_validators(&mut self, rules: impl IntoIterator<Item = RuleSet>) {
        for set in rules {
            self.rules.merge(set);
        }
    }

    /// Removes the rules named in the given set. Absent names are
    /// no-ops. Does not re-run validation.
    pub fn remove_validators(&mut self, rules: &RuleSet) {
        for name in rules.names() {
            self.rules.remove(name);
        }
    }

    /// The field's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's kind.
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// The field's value coercion.
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// The field's stored value.
    pub const fn value(&self) -> &FieldValue {
        &self.value
    }

    /// The outcome of the most recent check; `true` before any check
    /// has run.
    pub const fn valid(&self) -> bool {
        self.valid
    }

    /// The field's active rules.
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Sets the stored value and, when bound, the element's displayed
    /// value. Does not trigger a validity re-check.
    pub fn set_value(&mut self, value: impl Into<FieldValue>) {
        let value = value.into();
        if let Some(element) = &self.element {
            element.borrow_mut().set_value(&value.as_text());
        }
        self.value = value;
    }

    /// An owned snapshot of the field's current state.
    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            name: self.name.clone(),
            kind: self.kind,
            value: self.value.clone(),
        }
    }

    /// Attaches the bound element. Called exactly once by the owning
    /// binder; fails for a single-choice element without options.
    pub(crate) fn bind_element(&mut self, element: ElementRef) -> FormResult<()> {
        debug_assert!(self.element.is_none(), "an element is bound exactly once");
        if self.kind == FieldKind::SingleChoice && element.borrow().options().is_empty() {
            return Err(FormError::NoOptions(self.name.clone()));
        }
        self.element = Some(element);
        Ok(())
    }

    /// Attaches the radio sibling elements discovered during binding.
    pub(crate) fn bind_radio_siblings(&mut self, elements: Vec<ElementRef>) {
        self.radio_elements = elements;
    }

    pub(crate) fn element_ref(&self) -> Option<ElementRef> {
        self.element.clone()
    }

    /// Records a raw value delivered by a change notification, coerced
    /// per the field's value type.
    pub(crate) fn store_raw(&mut self, raw: &str) {
        self.value = self.coerce(raw);
    }

    fn coerce(&self, raw: &str) -> FieldValue {
        match self.value_type {
            ValueType::Text => FieldValue::Text(raw.to_string()),
            ValueType::Number => raw
                .trim()
                .parse::<f64>()
                .map_or(FieldValue::Null, FieldValue::Number),
        }
    }

    /// Pulls the current value from the bound element(s) and evaluates
    /// every rule in the active set against it.
    ///
    /// Text-like kinds evaluate the whole rule set against the
    /// rule-specific normalized value (the iban rule strips spaces, all
    /// others trim). A single choice consults only the `require_option`
    /// rule, a toggle only `required`. `valid` becomes `true` only when
    /// every consulted rule passes, and the matching marker is applied
    /// to the bound element as the unconditional last step.
    ///
    /// An `equals` rule naming an unknown peer fails with
    /// [`FormError::UnknownPeer`] before any marker is touched.
    pub fn check_validity(&mut self, peers: &PeerValues) -> FormResult<()> {
        self.refresh_value();
        let valid = match self.kind {
            FieldKind::SingleLineText | FieldKind::MultiLineText | FieldKind::RadioGroup => {
                self.text_rules_pass(peers)?
            }
            FieldKind::SingleChoice => self.choice_rules_pass(),
            FieldKind::ToggleChoice => self.toggle_rules_pass(),
        };
        self.valid = valid;
        self.apply_marker();
        Ok(())
    }

    fn refresh_value(&mut self) {
        if self.kind == FieldKind::RadioGroup {
            let checked = self.radio_elements.iter().find_map(|element| {
                let element = element.borrow();
                element.is_checked().then(|| element.value())
            });
            self.value = checked.map_or(FieldValue::Null, |raw| self.coerce(&raw));
            return;
        }

        let Some(element) = self.element.clone() else {
            return;
        };
        let raw = element.borrow().value();
        self.value = if self.kind == FieldKind::ToggleChoice {
            if element.borrow().is_checked() {
                FieldValue::Text(raw)
            } else {
                FieldValue::Null
            }
        } else {
            self.coerce(&raw)
        };
    }

    fn text_rules_pass(&self, peers: &PeerValues) -> FormResult<bool> {
        let raw = self.value.as_text();
        let mut valid = true;
        for (name, spec) in self.rules.iter() {
            let value = if name == RULE_IBAN {
                raw.replace(' ', "")
            } else {
                raw.trim().to_string()
            };
            match spec {
                RuleSpec::FieldReference(peer_name) => {
                    let peer = peers.get(peer_name).ok_or_else(|| FormError::UnknownPeer {
                        field: self.name.clone(),
                        referenced: peer_name.clone(),
                    })?;
                    if value != peer.as_text() {
                        valid = false;
                    }
                }
                RuleSpec::Presence => {
                    if value.is_empty() {
                        valid = false;
                    }
                }
                RuleSpec::Pattern(re) => {
                    if !re.is_match(&value) {
                        valid = false;
                    }
                }
            }
        }
        Ok(valid)
    }

    fn choice_rules_pass(&self) -> bool {
        let Some(RuleSpec::Pattern(required)) = self.rules.get(RULE_REQUIRE_OPTION) else {
            return true;
        };
        let Some(element) = &self.element else {
            return true;
        };
        element
            .borrow()
            .options()
            .iter()
            .all(|option| !required.is_match(&option.value) || option.selected)
    }

    fn toggle_rules_pass(&self) -> bool {
        if !self.rules.contains(RULE_REQUIRED) {
            return true;
        }
        self.element
            .as_ref()
            .is_some_and(|element| element.borrow().is_checked())
    }

    fn apply_marker(&self) {
        let marker = if self.valid {
            Marker::Valid
        } else {
            Marker::Invalid
        };
        if let Some(element) = &self.element {
            element.borrow_mut().set_marker(marker);
        }
    }
}
