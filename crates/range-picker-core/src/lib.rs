#![warn(missing_docs)]
//! Range Picker Core - Headless Date Range Picker Kernel
//!
//! # Overview
//!
//! `range-picker-core` is the state machine behind a two-input date-range picker: a "from" input,
//! a "to" input, an optional input mask and a popup calendar. It owns the committed range and
//! keeps every surface consistent with it while enforcing min/max/disabled-date constraints.
//!
//! It does not render anything. A host binds its toolkit through the [`PickerAdapter`] trait and
//! feeds user activity back as [`InputEvent`]s.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Commands & UI Events                       │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Range Coordinator (candidate → commit)     │  ← State Machine
//! ├─────────────────────────────────────────────┤
//! │  Acceptability Policy │ Date Formatter      │  ← Gates & Collaborators
//! ├─────────────────────────────────────────────┤
//! │  DateRange value object                     │  ← Data
//! ├─────────────────────────────────────────────┤
//! │  PickerAdapter (inputs, mask, calendar)     │  ← UI Boundary
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use range_picker_core::{
//!     CalendarSelection, DateRange, HeadlessAdapter, HostEventKind, InputEvent, InputField,
//!     PickerCommand, PickerOptions, RangeCoordinator, RangeEdge,
//! };
//!
//! let mut picker =
//!     RangeCoordinator::new(HeadlessAdapter::new(), PickerOptions::default()).unwrap();
//! picker.initialize();
//!
//! picker.execute(PickerCommand::Open);
//!
//! let from = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
//! let to = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
//! picker.handle_event(InputEvent::CalendarSelect(CalendarSelection::new(
//!     to,
//!     DateRange::between(from, to),
//!     RangeEdge::To,
//! )));
//!
//! assert_eq!(picker.value(), DateRange::between(from, to));
//! assert!(!picker.is_open());
//! assert_eq!(picker.adapter().input_text(InputField::To), "01/20/2024");
//! assert_eq!(
//!     picker.adapter().event_kinds(),
//!     vec![HostEventKind::Open, HostEventKind::Close, HostEventKind::Change]
//! );
//! ```
//!
//! # Module Description
//!
//! - [`range`] - `DateRange` value object
//! - [`policy`] - min/max/disabled-date/disabled-weekday rules
//! - [`format`] - parsing/formatting collaborator and the default pattern formatter
//! - [`mask`] - mask options handed to the adapter
//! - [`adapter`] - the UI boundary trait
//! - [`events`] - host-facing events and the listener context
//! - [`commands`] - programmatic commands and UI events
//! - [`coordinator`] - the state machine
//! - [`headless`] - in-memory adapter

pub mod adapter;
pub mod clock;
pub mod commands;
pub mod coordinator;
mod error;
pub mod events;
pub mod format;
pub mod headless;
pub mod mask;
pub mod options;
pub mod policy;
pub mod range;

pub use adapter::{CalendarConfig, FocusTarget, InputField, KeyPress, PickerAdapter, PickerKey};
pub use clock::{Clock, FixedClock, SystemClock};
pub use commands::{CalendarSelection, InputEvent, PickerCommand, RangeEdge};
pub use coordinator::RangeCoordinator;
pub use error::PickerError;
pub use events::{ELEMENT_NAME, EventContext, EventDetail, HostEvent, HostEventKind};
pub use format::{DateFormatter, PatternFormatter};
pub use headless::{
    AdapterCall, CalendarState, DispatchedEvent, HeadlessAdapter, InputState, ListenerId,
    MaskInstance,
};
pub use mask::{MASK_PLACEHOLDER, MaskOptions};
pub use options::PickerOptions;
pub use policy::AcceptabilityPolicy;
pub use range::DateRange;
