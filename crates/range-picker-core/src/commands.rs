//! Command and event interface.
//!
//! Two entry points feed the coordinator:
//!
//! - [`PickerCommand`]: the programmatic surface (property and attribute setters, shortcuts).
//! - [`InputEvent`]: what the UI reports (keystrokes, focus, calendar clicks).
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use range_picker_core::{
//!     DateRange, HeadlessAdapter, PickerCommand, PickerOptions, RangeCoordinator,
//! };
//!
//! let mut picker =
//!     RangeCoordinator::new(HeadlessAdapter::new(), PickerOptions::default()).unwrap();
//! picker.initialize();
//!
//! let from = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
//! let to = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
//! picker.execute(PickerCommand::SetValue(DateRange::between(from, to)));
//!
//! assert_eq!(picker.value(), DateRange::between(from, to));
//! assert_eq!(picker.adapter().input_text(range_picker_core::InputField::From), "01/10/2024");
//! ```

use crate::{DateRange, FocusTarget, InputField, KeyPress};
use chrono::{NaiveDate, Weekday};

/// Programmatic operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerCommand {
    /// Set both sides.
    SetValue(DateRange),
    /// Set the start date, keeping the committed end date.
    SetFrom(Option<NaiveDate>),
    /// Set the end date, keeping the committed start date.
    SetTo(Option<NaiveDate>),
    /// A string attribute changed (`from`, `to`, `end-value`).
    SetAttribute {
        /// Attribute name.
        name: String,
        /// New value, `None` when removed.
        value: Option<String>,
    },
    /// Replace the minimum date.
    SetMin(Option<NaiveDate>),
    /// Replace the maximum date.
    SetMax(Option<NaiveDate>),
    /// Replace the disabled date list.
    SetDisabledDates(Vec<NaiveDate>),
    /// Replace the disabled weekday list.
    SetDisabledDaysOfWeek(Vec<Weekday>),
    /// Enable or disable input masking.
    SetMasked(bool),
    /// Enable or disable the whole picker.
    SetDisabled(bool),
    /// Open the calendar.
    Open,
    /// Close the calendar.
    Close,
    /// Apply the "today" shortcut.
    Today,
    /// Clear both sides and close the calendar.
    Clear,
}

/// Which end of the range a calendar click completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEdge {
    /// The click set the start date; the range is still open.
    From,
    /// The click set the end date; the range is complete.
    To,
}

/// A selection reported by the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarSelection {
    /// The clicked date.
    pub date: Option<NaiveDate>,
    /// The range the calendar proposes after the click.
    pub range: DateRange,
    /// Which edge the click completed, if the calendar tracks it.
    pub edge: Option<RangeEdge>,
}

impl CalendarSelection {
    /// A selection proposing `range`, produced by clicking `date`.
    pub fn new(date: NaiveDate, range: DateRange, edge: RangeEdge) -> Self {
        Self {
            date: Some(date),
            range,
            edge: Some(edge),
        }
    }
}

/// Notifications from the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Raw text of an unmasked input changed.
    Input {
        /// Which input.
        field: InputField,
        /// Its full text.
        text: String,
    },
    /// The mask on `field` resolved new text.
    MaskResolved {
        /// Which input.
        field: InputField,
        /// Text after masking.
        text: String,
    },
    /// An input gained focus.
    Focus {
        /// Which input.
        field: InputField,
    },
    /// An input lost focus.
    Blur {
        /// Which input.
        field: InputField,
        /// Where focus went.
        related: Option<FocusTarget>,
    },
    /// A key was pressed on an input.
    Key {
        /// Which input.
        field: InputField,
        /// The key.
        key: KeyPress,
    },
    /// The calendar reported a selection.
    CalendarSelect(CalendarSelection),
    /// The calendar's keyboard focus moved to the cell with this id.
    CalendarActiveCell {
        /// Cell element id.
        id: String,
    },
    /// The toggle affordance was clicked.
    ToggleClick,
    /// The calendar's "today" button was clicked.
    TodayClick,
    /// The calendar's "clear" button was clicked.
    ClearClick,
}
