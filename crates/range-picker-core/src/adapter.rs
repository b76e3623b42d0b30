//! Adapter boundary between the coordinator and a concrete UI.
//!
//! The coordinator never touches widgets directly. Everything it needs from the two input
//! surfaces, the mask engine and the calendar popup goes through [`PickerAdapter`]. A host
//! implements the trait on top of its toolkit; [`HeadlessAdapter`](crate::HeadlessAdapter) is an
//! in-memory implementation.
//!
//! # Contract
//!
//! - `initialize_mask` replaces an existing mask on the same field (the previous instance is
//!   destroyed first); `destroy_mask` on a field without a mask is a no-op.
//! - `attach_calendar` sets `aria-expanded="true"`; `detach_calendar` sets it back to `false` and
//!   removes `aria-activedescendant`.
//! - `set_disabled` disables both inputs and the toggle affordance in one call.
//! - `emit_host_event` returns `true` if the event was **not** canceled.

use crate::{AcceptabilityPolicy, DateRange, HostEvent, MaskOptions, PickerCommand};
use chrono::NaiveDate;

/// One of the two text inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    /// The "from" (start date) input.
    From,
    /// The "to" (end date) input.
    To,
}

impl InputField {
    /// The other input.
    pub fn other(self) -> Self {
        match self {
            Self::From => Self::To,
            Self::To => Self::From,
        }
    }
}

/// Where focus went when an input blurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// One of the picker's own inputs.
    Input(InputField),
    /// The calendar popup.
    Calendar,
    /// Anything outside the picker.
    Outside,
}

/// Keys the coordinator reacts to or forwards to the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKey {
    /// Escape.
    Escape,
    /// Enter.
    Enter,
    /// Tab.
    Tab,
    /// Space bar.
    Space,
    /// Arrow up.
    ArrowUp,
    /// Arrow down.
    ArrowDown,
    /// Arrow left.
    ArrowLeft,
    /// Arrow right.
    ArrowRight,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Home.
    Home,
    /// End.
    End,
}

/// A key press on one of the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key.
    pub key: PickerKey,
    /// Whether Alt was held.
    pub alt: bool,
    /// Whether Shift was held.
    pub shift: bool,
}

impl KeyPress {
    /// A key press without modifiers.
    pub fn plain(key: PickerKey) -> Self {
        Self {
            key,
            alt: false,
            shift: false,
        }
    }

    /// A key press with Alt held.
    pub fn alt(key: PickerKey) -> Self {
        Self {
            key,
            alt: true,
            shift: false,
        }
    }
}

/// Everything a calendar needs when it is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarConfig {
    /// The committed range to highlight.
    pub value: DateRange,
    /// Constraints used to disable cells.
    pub policy: AcceptabilityPolicy,
    /// Whether the "today" shortcut is shown.
    pub show_today: bool,
    /// Whether the "clear" shortcut is shown.
    pub show_clear: bool,
}

/// Concrete UI binding driven by the coordinator.
pub trait PickerAdapter {
    /// Whether both input surfaces exist.
    fn has_input_elements(&self) -> bool;

    /// Apply static accessibility attributes (combobox role, `aria-haspopup`, labels).
    fn initialize_accessibility(&mut self);

    /// Current raw text of `field`.
    fn input_value(&self, field: InputField) -> String;

    /// Replace the text of `field`. When `notify` is set the input reports the change to its
    /// own listeners as if the user had edited it.
    fn set_input_value(&mut self, field: InputField, value: &str, notify: bool);

    /// Create (or replace) the mask on `field`.
    fn initialize_mask(&mut self, field: InputField, options: &MaskOptions);

    /// Destroy the mask on `field`, if any.
    fn destroy_mask(&mut self, field: InputField);

    /// Show the calendar popup.
    fn attach_calendar(&mut self, config: &CalendarConfig);

    /// Hide the calendar popup.
    fn detach_calendar(&mut self);

    /// Navigate the calendar to the month containing `date`.
    fn go_to_calendar_date(&mut self, date: NaiveDate);

    /// Push the authoritative range into the calendar.
    fn set_calendar_value(&mut self, range: DateRange);

    /// Move the calendar's keyboard focus to `date`.
    fn set_calendar_active_date(&mut self, date: NaiveDate);

    /// Push updated constraints into the calendar.
    fn set_calendar_constraints(&mut self, policy: &AcceptabilityPolicy);

    /// Forward a navigation key to the calendar.
    fn propagate_calendar_key(&mut self, key: KeyPress);

    /// Point `aria-activedescendant` at a calendar cell.
    fn set_active_descendant(&mut self, id: &str);

    /// Whether focus is moving to one of the picker's inputs.
    ///
    /// A `related` target decides on its own; without one, the current focus is consulted.
    fn is_input_focused(&self, related: Option<FocusTarget>) -> bool;

    /// Move keyboard focus to `field`.
    fn focus_input(&mut self, field: InputField);

    /// Select the whole text of `field`.
    fn select_input_text(&mut self, field: InputField);

    /// Disable or enable both inputs and the toggle affordance together.
    fn set_disabled(&mut self, disabled: bool);

    /// Dispatch `event` to host listeners. Returns `true` if it was not canceled.
    fn emit_host_event(&mut self, event: &HostEvent) -> bool;

    /// Commands host listeners queued during dispatch.
    fn take_deferred_commands(&mut self) -> Vec<PickerCommand> {
        Vec::new()
    }

    /// Release listeners and resources. Called once from
    /// [`RangeCoordinator::destroy`](crate::RangeCoordinator::destroy).
    fn destroy(&mut self) {}
}
