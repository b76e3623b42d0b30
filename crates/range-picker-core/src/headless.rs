//! In-memory adapter.
//!
//! [`HeadlessAdapter`] implements [`PickerAdapter`] without any UI toolkit. It keeps the state a
//! real binding would push into widgets (input text, attributes, mask instances, calendar
//! state), dispatches host events to registered listeners, and records every adapter call.
//!
//! Hosts can render straight from its state; tests use it to observe what the coordinator did.
//!
//! # Example
//!
//! ```rust
//! use range_picker_core::{
//!     HeadlessAdapter, HostEventKind, PickerCommand, PickerOptions, RangeCoordinator,
//! };
//!
//! let mut adapter = HeadlessAdapter::new();
//! let listener = adapter.add_listener(HostEventKind::Change, |ctx| ctx.prevent_default());
//!
//! let mut picker = RangeCoordinator::new(adapter, PickerOptions::default()).unwrap();
//! picker.initialize();
//! picker.execute(PickerCommand::SetAttribute {
//!     name: "from".to_string(),
//!     value: Some("2024-01-10".to_string()),
//! });
//! assert_eq!(picker.from(), None);
//!
//! assert!(picker.adapter_mut().remove_listener(listener));
//! ```

use crate::{
    AcceptabilityPolicy, CalendarConfig, DateRange, EventContext, FocusTarget, HostEvent,
    HostEventKind, InputField, KeyPress, MaskOptions, PickerAdapter, PickerCommand,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A call the coordinator made on the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterCall {
    /// `initialize_accessibility`
    InitializeAccessibility,
    /// `set_input_value`
    SetInputValue {
        /// Target input.
        field: InputField,
        /// New text.
        value: String,
        /// Whether input listeners were notified.
        notify: bool,
    },
    /// `initialize_mask`
    InitializeMask {
        /// Target input.
        field: InputField,
        /// Mask options.
        options: MaskOptions,
    },
    /// `destroy_mask`
    DestroyMask(InputField),
    /// `attach_calendar`
    AttachCalendar,
    /// `detach_calendar`
    DetachCalendar,
    /// `go_to_calendar_date`
    GoToCalendarDate(NaiveDate),
    /// `set_calendar_value`
    SetCalendarValue(DateRange),
    /// `set_calendar_active_date`
    SetCalendarActiveDate(NaiveDate),
    /// `set_calendar_constraints`
    SetCalendarConstraints,
    /// `propagate_calendar_key`
    PropagateCalendarKey(KeyPress),
    /// `set_active_descendant`
    SetActiveDescendant(String),
    /// `focus_input`
    FocusInput(InputField),
    /// `select_input_text`
    SelectInputText(InputField),
    /// `set_disabled`
    SetDisabled(bool),
    /// `emit_host_event`
    EmitHostEvent(HostEventKind),
    /// `destroy`
    Destroy,
}

/// A live mask instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskInstance {
    /// Unique id; a re-initialized mask gets a new one.
    pub id: u64,
    /// Options it was created with.
    pub options: MaskOptions,
}

/// State of one input element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    /// Current text.
    pub text: String,
    /// Whether the element is disabled.
    pub disabled: bool,
    /// Attributes (`role`, `aria-*`, ...).
    pub attributes: BTreeMap<String, String>,
    /// Attached mask, if any.
    pub mask: Option<MaskInstance>,
    /// How many times the input notified its own listeners of a programmatic change.
    pub notifications: usize,
}

impl InputState {
    /// Attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }
}

/// State of the calendar popup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarState {
    /// Whether the popup is attached.
    pub attached: bool,
    /// Configuration of the current attachment.
    pub config: Option<CalendarConfig>,
    /// Range last pushed by the coordinator.
    pub value: DateRange,
    /// Date whose month is displayed.
    pub month_of: Option<NaiveDate>,
    /// Cell with keyboard focus.
    pub active_date: Option<NaiveDate>,
    /// Keys forwarded for grid navigation.
    pub propagated_keys: Vec<KeyPress>,
}

/// An event dispatched to host listeners and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedEvent {
    /// The event.
    pub event: HostEvent,
    /// `false` if a listener canceled it.
    pub not_canceled: bool,
}

/// Handle returned by [`HeadlessAdapter::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&mut EventContext<'_>)>;

/// In-memory [`PickerAdapter`].
pub struct HeadlessAdapter {
    has_inputs: bool,
    from: InputState,
    to: InputState,
    toggle_disabled: bool,
    calendar: CalendarState,
    focused: Option<InputField>,
    selected: Option<InputField>,
    listeners: Vec<(ListenerId, HostEventKind, Listener)>,
    next_listener_id: u64,
    next_mask_id: u64,
    deferred: Vec<PickerCommand>,
    events: Vec<DispatchedEvent>,
    calls: Vec<AdapterCall>,
    destroyed: bool,
}

impl Default for HeadlessAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HeadlessAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessAdapter")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("calendar", &self.calendar)
            .field("focused", &self.focused)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl HeadlessAdapter {
    /// An adapter with both inputs present and empty.
    pub fn new() -> Self {
        Self {
            has_inputs: true,
            from: InputState::default(),
            to: InputState::default(),
            toggle_disabled: false,
            calendar: CalendarState::default(),
            focused: None,
            selected: None,
            listeners: Vec::new(),
            next_listener_id: 0,
            next_mask_id: 0,
            deferred: Vec::new(),
            events: Vec::new(),
            calls: Vec::new(),
            destroyed: false,
        }
    }

    /// An adapter whose dual-input structure is missing.
    pub fn without_inputs() -> Self {
        Self {
            has_inputs: false,
            ..Self::new()
        }
    }

    /// Pre-fill an input, as markup would before the coordinator initializes.
    pub fn with_input_text(mut self, field: InputField, text: impl Into<String>) -> Self {
        self.input_mut(field).text = text.into();
        self
    }

    /// Register a host listener for `kind`.
    pub fn add_listener<F>(&mut self, kind: HostEventKind, listener: F) -> ListenerId
    where
        F: FnMut(&mut EventContext<'_>) + 'static,
    {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, kind, Box::new(listener)));
        id
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// State of one input.
    pub fn input(&self, field: InputField) -> &InputState {
        match field {
            InputField::From => &self.from,
            InputField::To => &self.to,
        }
    }

    fn input_mut(&mut self, field: InputField) -> &mut InputState {
        match field {
            InputField::From => &mut self.from,
            InputField::To => &mut self.to,
        }
    }

    /// Text of one input.
    pub fn input_text(&self, field: InputField) -> &str {
        &self.input(field).text
    }

    /// Simulate the user editing an input's text directly (no coordinator involvement).
    pub fn type_text(&mut self, field: InputField, text: impl Into<String>) {
        self.input_mut(field).text = text.into();
    }

    /// Move focus, as the host toolkit would before reporting focus/blur.
    pub fn set_focus(&mut self, field: Option<InputField>) {
        self.focused = field;
    }

    /// The focused input.
    pub fn focused(&self) -> Option<InputField> {
        self.focused
    }

    /// The input whose text was last selected.
    pub fn selected(&self) -> Option<InputField> {
        self.selected
    }

    /// Whether the toggle affordance is disabled.
    pub fn toggle_disabled(&self) -> bool {
        self.toggle_disabled
    }

    /// Calendar popup state.
    pub fn calendar(&self) -> &CalendarState {
        &self.calendar
    }

    /// Number of live mask instances across both inputs.
    pub fn live_masks(&self) -> usize {
        usize::from(self.from.mask.is_some()) + usize::from(self.to.mask.is_some())
    }

    /// Every event dispatched so far.
    pub fn event_log(&self) -> &[DispatchedEvent] {
        &self.events
    }

    /// Payloads of every dispatched `change` event, canceled or not.
    pub fn change_events(&self) -> Vec<DateRange> {
        self.events
            .iter()
            .filter_map(|dispatched| dispatched.event.range())
            .collect()
    }

    /// Kinds of every dispatched event, in order.
    pub fn event_kinds(&self) -> Vec<HostEventKind> {
        self.events
            .iter()
            .map(|dispatched| dispatched.event.kind)
            .collect()
    }

    /// Every adapter call so far.
    pub fn calls(&self) -> &[AdapterCall] {
        &self.calls
    }

    /// Forget recorded calls and events.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
        self.events.clear();
    }

    /// Whether `destroy` ran.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl PickerAdapter for HeadlessAdapter {
    fn has_input_elements(&self) -> bool {
        self.has_inputs
    }

    fn initialize_accessibility(&mut self) {
        self.calls.push(AdapterCall::InitializeAccessibility);
        for field in [InputField::From, InputField::To] {
            let input = self.input_mut(field);
            input.set_attribute("autocomplete", "off");
            input.set_attribute("spellcheck", "false");
            input.set_attribute("role", "combobox");
            input.set_attribute("aria-haspopup", "true");
            input.set_attribute("aria-expanded", "false");
        }
        if self.to.attribute("aria-label").is_none() {
            self.to.set_attribute("aria-label", "To date");
        }
    }

    fn input_value(&self, field: InputField) -> String {
        self.input(field).text.clone()
    }

    fn set_input_value(&mut self, field: InputField, value: &str, notify: bool) {
        self.calls.push(AdapterCall::SetInputValue {
            field,
            value: value.to_string(),
            notify,
        });
        let input = self.input_mut(field);
        if input.text != value {
            input.text = value.to_string();
            if notify {
                input.notifications += 1;
            }
        }
    }

    fn initialize_mask(&mut self, field: InputField, options: &MaskOptions) {
        self.calls.push(AdapterCall::InitializeMask {
            field,
            options: options.clone(),
        });
        let id = self.next_mask_id;
        self.next_mask_id += 1;
        // Replacing the Option drops the previous instance.
        self.input_mut(field).mask = Some(MaskInstance {
            id,
            options: options.clone(),
        });
    }

    fn destroy_mask(&mut self, field: InputField) {
        self.calls.push(AdapterCall::DestroyMask(field));
        self.input_mut(field).mask = None;
    }

    fn attach_calendar(&mut self, config: &CalendarConfig) {
        self.calls.push(AdapterCall::AttachCalendar);
        self.calendar.attached = true;
        self.calendar.value = config.value;
        self.calendar.config = Some(config.clone());
        self.calendar.propagated_keys.clear();
        self.from.set_attribute("aria-expanded", "true");
        self.to.set_attribute("aria-expanded", "true");
    }

    fn detach_calendar(&mut self) {
        self.calls.push(AdapterCall::DetachCalendar);
        self.calendar.attached = false;
        self.calendar.config = None;
        self.calendar.active_date = None;
        for field in [InputField::From, InputField::To] {
            let input = self.input_mut(field);
            input.set_attribute("aria-expanded", "false");
            input.attributes.remove("aria-activedescendant");
        }
    }

    fn go_to_calendar_date(&mut self, date: NaiveDate) {
        self.calls.push(AdapterCall::GoToCalendarDate(date));
        self.calendar.month_of = Some(date);
    }

    fn set_calendar_value(&mut self, range: DateRange) {
        self.calls.push(AdapterCall::SetCalendarValue(range));
        self.calendar.value = range;
    }

    fn set_calendar_active_date(&mut self, date: NaiveDate) {
        self.calls.push(AdapterCall::SetCalendarActiveDate(date));
        self.calendar.active_date = Some(date);
        self.calendar.month_of = Some(date);
    }

    fn set_calendar_constraints(&mut self, policy: &AcceptabilityPolicy) {
        self.calls.push(AdapterCall::SetCalendarConstraints);
        if let Some(config) = self.calendar.config.as_mut() {
            config.policy = policy.clone();
        }
    }

    fn propagate_calendar_key(&mut self, key: KeyPress) {
        self.calls.push(AdapterCall::PropagateCalendarKey(key));
        self.calendar.propagated_keys.push(key);
    }

    fn set_active_descendant(&mut self, id: &str) {
        self.calls.push(AdapterCall::SetActiveDescendant(id.to_string()));
        self.from.set_attribute("aria-activedescendant", id);
    }

    fn is_input_focused(&self, related: Option<FocusTarget>) -> bool {
        // An explicit blur target wins over the recorded focus.
        match related {
            Some(target) => matches!(target, FocusTarget::Input(_)),
            None => self.focused.is_some(),
        }
    }

    fn focus_input(&mut self, field: InputField) {
        self.calls.push(AdapterCall::FocusInput(field));
        self.focused = Some(field);
    }

    fn select_input_text(&mut self, field: InputField) {
        self.calls.push(AdapterCall::SelectInputText(field));
        self.selected = Some(field);
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.calls.push(AdapterCall::SetDisabled(disabled));
        let value = disabled.to_string();
        for field in [InputField::From, InputField::To] {
            let input = self.input_mut(field);
            input.disabled = disabled;
            input.set_attribute("aria-disabled", value.clone());
        }
        self.toggle_disabled = disabled;
    }

    fn emit_host_event(&mut self, event: &HostEvent) -> bool {
        self.calls.push(AdapterCall::EmitHostEvent(event.kind));

        let mut ctx = EventContext::new(event);
        for (_, kind, listener) in self.listeners.iter_mut() {
            if *kind == event.kind {
                listener(&mut ctx);
            }
        }
        let (not_canceled, deferred) = ctx.finish();
        self.deferred.extend(deferred);

        self.events.push(DispatchedEvent {
            event: event.clone(),
            not_canceled,
        });
        not_canceled
    }

    fn take_deferred_commands(&mut self) -> Vec<PickerCommand> {
        std::mem::take(&mut self.deferred)
    }

    fn destroy(&mut self) {
        self.calls.push(AdapterCall::Destroy);
        self.listeners.clear();
        self.deferred.clear();
        self.from.mask = None;
        self.to.mask = None;
        self.destroyed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_listener_add_remove_is_symmetric() {
        let mut adapter = HeadlessAdapter::new();
        let hits = Rc::new(Cell::new(0));
        let hits_clone = Rc::clone(&hits);
        let id = adapter.add_listener(HostEventKind::Open, move |_| {
            hits_clone.set(hits_clone.get() + 1);
        });

        adapter.emit_host_event(&HostEvent::open());
        adapter.emit_host_event(&HostEvent::close());
        assert_eq!(hits.get(), 1);

        assert!(adapter.remove_listener(id));
        assert!(!adapter.remove_listener(id));
        adapter.emit_host_event(&HostEvent::open());
        assert_eq!(hits.get(), 1);
        assert_eq!(adapter.listener_count(), 0);
    }

    #[test]
    fn test_mask_reinitialization_replaces_instance() {
        let mut adapter = HeadlessAdapter::new();
        let options = MaskOptions::for_pattern("MM/DD/YYYY", false);
        adapter.initialize_mask(InputField::From, &options);
        adapter.initialize_mask(InputField::From, &options);
        assert_eq!(adapter.live_masks(), 1);
        assert_eq!(adapter.input(InputField::From).mask.as_ref().unwrap().id, 1);

        adapter.destroy_mask(InputField::From);
        adapter.destroy_mask(InputField::From);
        assert_eq!(adapter.live_masks(), 0);
    }

    #[test]
    fn test_set_disabled_is_atomic() {
        let mut adapter = HeadlessAdapter::new();
        adapter.set_disabled(true);
        for field in [InputField::From, InputField::To] {
            assert!(adapter.input(field).disabled);
            assert_eq!(adapter.input(field).attribute("aria-disabled"), Some("true"));
        }
        assert!(adapter.toggle_disabled());
    }

    #[test]
    fn test_set_input_value_notifies_only_on_change() {
        let mut adapter = HeadlessAdapter::new();
        adapter.set_input_value(InputField::To, "x", true);
        adapter.set_input_value(InputField::To, "x", true);
        assert_eq!(adapter.input(InputField::To).notifications, 1);
        assert_eq!(adapter.calls().len(), 2);
    }

    #[test]
    fn test_related_target_overrides_recorded_focus() {
        let mut adapter = HeadlessAdapter::new();
        adapter.set_focus(Some(InputField::From));
        assert!(adapter.is_input_focused(None));
        assert!(adapter.is_input_focused(Some(FocusTarget::Input(InputField::To))));
        assert!(!adapter.is_input_focused(Some(FocusTarget::Outside)));
        assert!(!adapter.is_input_focused(Some(FocusTarget::Calendar)));

        adapter.set_focus(None);
        assert!(!adapter.is_input_focused(None));
    }

    #[test]
    fn test_destroy_releases_listeners_and_masks() {
        let mut adapter = HeadlessAdapter::new();
        adapter.add_listener(HostEventKind::Change, |_| {});
        adapter.initialize_mask(InputField::To, &MaskOptions::for_pattern("MM/DD/YYYY", false));
        adapter.destroy();
        assert_eq!(adapter.listener_count(), 0);
        assert_eq!(adapter.live_masks(), 0);
        assert!(adapter.is_destroyed());
    }
}
