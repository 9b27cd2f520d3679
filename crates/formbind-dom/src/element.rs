//! Element and form handle traits.
//!
//! These traits are the capability a host document injects into the
//! core: attribute-based lookup ([`Document`]), per-element value and
//! marker access ([`ElementHandle`]), and submit interception
//! ([`FormHandle`]). The core calls [`Document`] exactly once, during
//! binding; afterwards it holds only the returned handles.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use formbind_signals::SignalReceiver;

/// The element tags a field can bind to.
///
/// Toggle (checkbox) and radio controls resolve to the `input` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementTag {
    /// `<input>`: single-line text, checkbox, radio.
    Input,
    /// `<textarea>`.
    Textarea,
    /// `<select>`.
    Select,
}

impl fmt::Display for ElementTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Input => "input",
            Self::Textarea => "textarea",
            Self::Select => "select",
        };
        write!(f, "{name}")
    }
}

/// The mutually exclusive validity marker applied after every check.
///
/// Implementors of [`ElementHandle::set_marker`] must guarantee that
/// applying one marker removes the other: after the first check exactly
/// one marker is present, never both, never neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// The element passed its most recent validity check.
    Valid,
    /// The element failed its most recent validity check.
    Invalid,
}

/// A notification delivered from an element to its subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementEvent {
    /// The element's displayed value changed (keystroke, selection,
    /// toggle). Carries the new raw value text.
    ValueChanged(String),
    /// The element lost focus.
    FocusLost,
}

/// One option of a choice element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    /// The option's value attribute.
    pub value: String,
    /// Whether the option is currently selected.
    pub selected: bool,
}

/// A form's submit notification.
///
/// Subscribers call [`prevent_default`](Self::prevent_default) to
/// suppress the host's default submit action (navigation, in a browser).
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: Cell<bool>,
}

impl SubmitEvent {
    /// Creates a fresh submit event with the default action pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppresses the host's default submit action.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Returns `true` if any subscriber suppressed the default action.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// An opaque handle to one bound element.
///
/// The core reads and writes the element exclusively through this
/// interface; it never learns what concrete document API backs it.
pub trait ElementHandle {
    /// The element's tag.
    fn tag(&self) -> ElementTag;

    /// The element's `name` attribute. Radio inputs belonging to the
    /// same group share it.
    fn input_name(&self) -> String;

    /// The element's current displayed value. For a select element this
    /// is the selected option's value, or empty when none is selected.
    fn value(&self) -> String;

    /// Sets the element's displayed value. For a select element this
    /// selects the option with the given value (exclusively).
    fn set_value(&mut self, value: &str);

    /// Whether a checkbox or radio element is currently checked.
    /// Non-checkable elements return `false`.
    fn is_checked(&self) -> bool;

    /// The options of a choice element; empty for anything else.
    fn options(&self) -> Vec<ChoiceOption>;

    /// The marker currently applied, if any check has run yet.
    fn marker(&self) -> Option<Marker>;

    /// Applies a validity marker, replacing the opposite one.
    fn set_marker(&mut self, marker: Marker);

    /// Subscribes to this element's change/blur notifications. A
    /// receiver with the same ID replaces the previous one.
    fn subscribe(&mut self, receiver_id: &str, receiver: SignalReceiver<ElementEvent>);
}

/// A shared, interiorly mutable element handle.
pub type ElementRef = Rc<RefCell<dyn ElementHandle>>;

/// An opaque handle to the form element owning a group of controls.
pub trait FormHandle {
    /// The form's `formGroup` attribute value.
    fn group_name(&self) -> String;

    /// Subscribes to the form's submit notifications. A receiver with
    /// the same ID replaces the previous one.
    fn subscribe_submit(&mut self, receiver_id: &str, receiver: SignalReceiver<SubmitEvent>);
}

/// A shared, interiorly mutable form handle.
pub type FormRef = Rc<RefCell<dyn FormHandle>>;

/// The element-locator capability a host document provides.
///
/// Lookup follows the binding discovery contract: a form is the element
/// carrying `formGroup=group`; a control is a descendant of that form
/// matching the given tag and carrying `formControl=control`; radio
/// siblings are every input inside the form sharing a `name` attribute.
pub trait Document {
    /// Locates the form element carrying `formGroup=group`.
    fn form(&self, group: &str) -> Option<FormRef>;

    /// Locates the control element for a field, by tag and
    /// `formControl` attribute, inside the given form.
    fn control(&self, group: &str, tag: ElementTag, control: &str) -> Option<ElementRef>;

    /// Locates every input inside the form sharing the given `name`
    /// attribute (radio sibling discovery).
    fn inputs_named(&self, group: &str, input_name: &str) -> Vec<ElementRef>;
}
