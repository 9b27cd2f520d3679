//! In-memory document implementation.
//!
//! [`MemoryDocument`] plays the role of the host document in tests and
//! headless environments: elements are built with the constructors on
//! [`MemoryElement`], attached to a named form group, and driven through
//! user-action helpers (`type_into`, `focus_out`, `choose_option`,
//! `set_checked`, `check_radio`, `submit`) that mutate element state and
//! dispatch the same notifications a browser host would.
//!
//! Dispatch clones the per-element signal handle out of the element
//! borrow before emitting, so receivers are free to re-borrow the
//! element (a blur receiver writing a validity marker back, for
//! example).

use std::cell::RefCell;
use std::rc::Rc;

use formbind_signals::{Signal, SignalReceiver};

use crate::element::{
    ChoiceOption, Document, ElementEvent, ElementHandle, ElementRef, ElementTag, FormHandle,
    FormRef, Marker, SubmitEvent,
};

/// One in-memory element.
///
/// Built with a kind-specific constructor, optionally adjusted with the
/// `with_*`/`as_control` builders, then attached to a document via
/// [`MemoryDocument::add_element`].
pub struct MemoryElement {
    group: String,
    tag: ElementTag,
    control: Option<String>,
    input_name: String,
    value: String,
    checked: bool,
    options: Vec<ChoiceOption>,
    marker: Option<Marker>,
    events: Rc<Signal<ElementEvent>>,
}

impl MemoryElement {
    fn new(group: &str, tag: ElementTag, control: Option<&str>, input_name: &str) -> Self {
        Self {
            group: group.to_string(),
            tag,
            control: control.map(str::to_string),
            input_name: input_name.to_string(),
            value: String::new(),
            checked: false,
            options: Vec::new(),
            marker: None,
            events: Rc::new(Signal::new()),
        }
    }

    /// A single-line text input carrying `formControl=control`.
    pub fn text(group: &str, control: &str) -> Self {
        Self::new(group, ElementTag::Input, Some(control), control)
    }

    /// A textarea carrying `formControl=control`.
    pub fn textarea(group: &str, control: &str) -> Self {
        Self::new(group, ElementTag::Textarea, Some(control), control)
    }

    /// A select carrying `formControl=control`, with the given option
    /// values and nothing selected.
    pub fn select(group: &str, control: &str, option_values: &[&str]) -> Self {
        let mut element = Self::new(group, ElementTag::Select, Some(control), control);
        element.options = option_values
            .iter()
            .map(|value| ChoiceOption {
                value: (*value).to_string(),
                selected: false,
            })
            .collect();
        element
    }

    /// An unchecked checkbox carrying `formControl=control`. The value
    /// attribute defaults to "on", as in HTML.
    pub fn checkbox(group: &str, control: &str) -> Self {
        let mut element = Self::new(group, ElementTag::Input, Some(control), control);
        element.value = "on".to_string();
        element
    }

    /// One radio input of a group sharing `input_name`, carrying the
    /// given value attribute and no `formControl` attribute. Mark the
    /// group's representative with [`as_control`](Self::as_control).
    pub fn radio(group: &str, input_name: &str, value: &str) -> Self {
        let mut element = Self::new(group, ElementTag::Input, None, input_name);
        element.value = value.to_string();
        element
    }

    /// Sets the `formControl` attribute.
    #[must_use]
    pub fn as_control(mut self, control: &str) -> Self {
        self.control = Some(control.to_string());
        self
    }

    /// Sets the initial displayed value.
    #[must_use]
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    /// Sets the initial checked state.
    #[must_use]
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Marks the option with the given value as initially selected.
    #[must_use]
    pub fn with_selected(mut self, option_value: &str) -> Self {
        for option in &mut self.options {
            option.selected = option.value == option_value;
        }
        self
    }

    /// The `formControl` attribute, if this element carries one.
    pub fn control_attr(&self) -> Option<&str> {
        self.control.as_deref()
    }

    /// Directly sets the checked state, without dispatching any event.
    /// Simulated user interaction goes through
    /// [`MemoryDocument::set_checked`] instead.
    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    fn events_handle(&self) -> Rc<Signal<ElementEvent>> {
        Rc::clone(&self.events)
    }
}

impl ElementHandle for MemoryElement {
    fn tag(&self) -> ElementTag {
        self.tag
    }

    fn input_name(&self) -> String {
        self.input_name.clone()
    }

    fn value(&self) -> String {
        if self.tag == ElementTag::Select {
            return self
                .options
                .iter()
                .find(|option| option.selected)
                .map(|option| option.value.clone())
                .unwrap_or_default();
        }
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        if self.tag == ElementTag::Select {
            for option in &mut self.options {
                option.selected = option.value == value;
            }
        }
        self.value = value.to_string();
    }

    fn is_checked(&self) -> bool {
        self.checked
    }

    fn options(&self) -> Vec<ChoiceOption> {
        self.options.clone()
    }

    fn marker(&self) -> Option<Marker> {
        self.marker
    }

    fn set_marker(&mut self, marker: Marker) {
        self.marker = Some(marker);
    }

    fn subscribe(&mut self, receiver_id: &str, receiver: SignalReceiver<ElementEvent>) {
        self.events.connect(receiver_id, receiver);
    }
}

struct MemoryForm {
    group: String,
    submit: Rc<Signal<SubmitEvent>>,
}

impl FormHandle for MemoryForm {
    fn group_name(&self) -> String {
        self.group.clone()
    }

    fn subscribe_submit(&mut self, receiver_id: &str, receiver: SignalReceiver<SubmitEvent>) {
        self.submit.connect(receiver_id, receiver);
    }
}

/// An in-memory document of form groups and their elements.
#[derive(Default)]
pub struct MemoryDocument {
    forms: Vec<Rc<RefCell<MemoryForm>>>,
    elements: Vec<Rc<RefCell<MemoryElement>>>,
}

impl MemoryDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a form element carrying `formGroup=group`.
    pub fn add_form(&mut self, group: &str) {
        self.forms.push(Rc::new(RefCell::new(MemoryForm {
            group: group.to_string(),
            submit: Rc::new(Signal::new()),
        })));
    }

    /// Adds an element, returning a shared handle for direct state
    /// inspection in tests.
    pub fn add_element(&mut self, element: MemoryElement) -> Rc<RefCell<MemoryElement>> {
        let element = Rc::new(RefCell::new(element));
        self.elements.push(Rc::clone(&element));
        element
    }

    fn element_by_control(
        &self,
        group: &str,
        control: &str,
    ) -> Option<&Rc<RefCell<MemoryElement>>> {
        self.elements.iter().find(|element| {
            let element = element.borrow();
            element.group == group && element.control.as_deref() == Some(control)
        })
    }

    fn expect_element(&self, group: &str, control: &str) -> &Rc<RefCell<MemoryElement>> {
        self.element_by_control(group, control)
            .unwrap_or_else(|| panic!("no element with formControl=\"{control}\" in \"{group}\""))
    }

    /// Simulates the user typing into a text-like element: the value is
    /// replaced and a value-changed notification is dispatched.
    ///
    /// # Panics
    ///
    /// Panics if no element with the given `formControl` exists.
    pub fn type_into(&self, group: &str, control: &str, text: &str) {
        let element = self.expect_element(group, control);
        let events = {
            let mut element = element.borrow_mut();
            element.set_value(text);
            element.events_handle()
        };
        events.emit(&ElementEvent::ValueChanged(text.to_string()));
    }

    /// Simulates the element losing focus.
    ///
    /// # Panics
    ///
    /// Panics if no element with the given `formControl` exists.
    pub fn focus_out(&self, group: &str, control: &str) {
        let element = self.expect_element(group, control);
        let events = element.borrow().events_handle();
        events.emit(&ElementEvent::FocusLost);
    }

    /// Simulates the user picking an option of a select element.
    ///
    /// # Panics
    ///
    /// Panics if no element with the given `formControl` exists.
    pub fn choose_option(&self, group: &str, control: &str, option_value: &str) {
        let element = self.expect_element(group, control);
        let events = {
            let mut element = element.borrow_mut();
            element.set_value(option_value);
            element.events_handle()
        };
        events.emit(&ElementEvent::ValueChanged(option_value.to_string()));
    }

    /// Simulates the user toggling a checkbox.
    ///
    /// # Panics
    ///
    /// Panics if no element with the given `formControl` exists.
    pub fn set_checked(&self, group: &str, control: &str, checked: bool) {
        let element = self.expect_element(group, control);
        let (events, value) = {
            let mut element = element.borrow_mut();
            element.checked = checked;
            (element.events_handle(), element.value.clone())
        };
        events.emit(&ElementEvent::ValueChanged(value));
    }

    /// Simulates the user checking the radio input of the named group
    /// that carries the given value attribute; its siblings become
    /// unchecked.
    pub fn check_radio(&self, group: &str, input_name: &str, value: &str) {
        for element in &self.elements {
            let mut element = element.borrow_mut();
            if element.group == group
                && element.tag == ElementTag::Input
                && element.input_name == input_name
            {
                element.checked = element.value == value;
            }
        }
    }

    /// Dispatches a submit event on the named form.
    ///
    /// Returns `true` if a subscriber prevented the default action.
    ///
    /// # Panics
    ///
    /// Panics if no form with the given `formGroup` exists.
    pub fn submit(&self, group: &str) -> bool {
        let form = self
            .forms
            .iter()
            .find(|form| form.borrow().group == group)
            .unwrap_or_else(|| panic!("no form with formGroup=\"{group}\""));
        tracing::debug!(form = %group, "dispatching submit");
        let submit = Rc::clone(&form.borrow().submit);
        let event = SubmitEvent::new();
        submit.emit(&event);
        event.default_prevented()
    }

    /// Reads back the marker currently applied to an element.
    ///
    /// # Panics
    ///
    /// Panics if no element with the given `formControl` exists.
    pub fn marker_of(&self, group: &str, control: &str) -> Option<Marker> {
        self.expect_element(group, control).borrow().marker()
    }
}

impl Document for MemoryDocument {
    fn form(&self, group: &str) -> Option<FormRef> {
        self.forms
            .iter()
            .find(|form| form.borrow().group == group)
            .map(|form| Rc::clone(form) as FormRef)
    }

    fn control(&self, group: &str, tag: ElementTag, control: &str) -> Option<ElementRef> {
        self.elements
            .iter()
            .find(|element| {
                let element = element.borrow();
                element.group == group
                    && element.tag == tag
                    && element.control.as_deref() == Some(control)
            })
            .map(|element| Rc::clone(element) as ElementRef)
    }

    fn inputs_named(&self, group: &str, input_name: &str) -> Vec<ElementRef> {
        self.elements
            .iter()
            .filter(|element| {
                let element = element.borrow();
                element.group == group
                    && element.tag == ElementTag::Input
                    && element.input_name == input_name
            })
            .map(|element| Rc::clone(element) as ElementRef)
            .collect()
    }
}
