//! Host-facing events.
//!
//! The coordinator describes every public event as a [`HostEvent`] and hands it to
//! [`PickerAdapter::emit_host_event`](crate::PickerAdapter::emit_host_event). The adapter
//! dispatches it to host listeners and reports whether it was canceled.

use crate::{DateRange, InputField, PickerCommand};

/// Tag name prefix shared by all event names.
pub const ELEMENT_NAME: &str = "date-range-picker";

/// Kind of a host event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEventKind {
    /// The committed range is about to change (cancelable unless corrective).
    Change,
    /// The calendar popup opened.
    Open,
    /// The calendar popup closed.
    Close,
    /// A masked input resolved new text.
    Input,
}

impl HostEventKind {
    /// The dispatched event name, e.g. `date-range-picker-change`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Change => "date-range-picker-change",
            Self::Open => "date-range-picker-open",
            Self::Close => "date-range-picker-close",
            Self::Input => "date-range-picker-input",
        }
    }
}

/// Event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDetail {
    /// No payload (`open`, `close`).
    None,
    /// The candidate range of a `change` event.
    Range(DateRange),
    /// Sanitized text of an `input` event and the field it came from.
    Text {
        /// Field whose mask resolved.
        field: InputField,
        /// Sanitized text.
        text: String,
    },
}

/// A public event as seen by host listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEvent {
    /// What happened.
    pub kind: HostEventKind,
    /// Payload.
    pub detail: EventDetail,
    /// Whether the event bubbles. Every picker event does.
    pub bubbles: bool,
    /// Whether the event crosses shadow boundaries. Every picker event does.
    pub composed: bool,
    /// Whether listeners may cancel it.
    pub cancelable: bool,
}

impl HostEvent {
    /// A `change` event carrying `range`.
    pub fn change(range: DateRange, cancelable: bool) -> Self {
        Self {
            kind: HostEventKind::Change,
            detail: EventDetail::Range(range),
            bubbles: true,
            composed: true,
            cancelable,
        }
    }

    /// A non-cancelable `open` event.
    pub fn open() -> Self {
        Self::plain(HostEventKind::Open)
    }

    /// A non-cancelable `close` event.
    pub fn close() -> Self {
        Self::plain(HostEventKind::Close)
    }

    /// A non-cancelable `input` event for resolved mask text.
    pub fn input(field: InputField, text: impl Into<String>) -> Self {
        Self {
            detail: EventDetail::Text {
                field,
                text: text.into(),
            },
            ..Self::plain(HostEventKind::Input)
        }
    }

    fn plain(kind: HostEventKind) -> Self {
        Self {
            kind,
            detail: EventDetail::None,
            bubbles: true,
            composed: true,
            cancelable: false,
        }
    }

    /// The range payload of a `change` event.
    pub fn range(&self) -> Option<DateRange> {
        match self.detail {
            EventDetail::Range(range) => Some(range),
            _ => None,
        }
    }
}

/// Mutable view handed to host listeners while an event is dispatched.
///
/// Listeners cannot reach the coordinator during dispatch. They cancel through
/// [`prevent_default`](Self::prevent_default) and ask for follow-up changes through
/// [`defer`](Self::defer); deferred commands run after the current transition has committed.
#[derive(Debug)]
pub struct EventContext<'a> {
    event: &'a HostEvent,
    canceled: bool,
    deferred: Vec<PickerCommand>,
}

impl<'a> EventContext<'a> {
    /// Wrap an event for dispatch.
    pub fn new(event: &'a HostEvent) -> Self {
        Self {
            event,
            canceled: false,
            deferred: Vec::new(),
        }
    }

    /// The event being dispatched.
    pub fn event(&self) -> &HostEvent {
        self.event
    }

    /// Cancel the event. Has no effect on non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.event.cancelable {
            self.canceled = true;
        }
    }

    /// Whether a listener canceled the event.
    pub fn default_prevented(&self) -> bool {
        self.canceled
    }

    /// Queue a command to run once the current transition completes.
    pub fn defer(&mut self, command: PickerCommand) {
        self.deferred.push(command);
    }

    /// Consume the context, returning `(not_canceled, deferred_commands)`.
    pub fn finish(self) -> (bool, Vec<PickerCommand>) {
        (!self.canceled, self.deferred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert!(HostEventKind::Change.name().starts_with(ELEMENT_NAME));
        assert_eq!(HostEventKind::Close.name(), "date-range-picker-close");
    }

    #[test]
    fn test_prevent_default_respects_cancelable() {
        let corrective = HostEvent::change(DateRange::empty(), false);
        let mut ctx = EventContext::new(&corrective);
        ctx.prevent_default();
        assert!(!ctx.default_prevented());

        let user = HostEvent::change(DateRange::empty(), true);
        let mut ctx = EventContext::new(&user);
        ctx.prevent_default();
        ctx.defer(PickerCommand::Clear);
        let (proceed, deferred) = ctx.finish();
        assert!(!proceed);
        assert_eq!(deferred, vec![PickerCommand::Clear]);
    }

    #[test]
    fn test_open_close_are_not_cancelable() {
        assert!(!HostEvent::open().cancelable);
        assert!(HostEvent::close().bubbles);
        assert_eq!(HostEvent::open().range(), None);
    }
}
