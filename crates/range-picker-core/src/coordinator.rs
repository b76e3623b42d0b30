//! Range coordinator.
//!
//! [`RangeCoordinator`] owns the committed `{from, to}` pair and keeps the two inputs, the mask
//! collaborator and the calendar popup consistent with it.
//!
//! # Candidate then commit
//!
//! Every mutation (typed text, calendar click, `today`, `clear`, programmatic setters, constraint
//! changes) follows the same steps:
//!
//! 1. Build a candidate [`DateRange`].
//! 2. Drop it if it equals the committed range.
//! 3. Drop it unless the policy accepts `from` and the range as a whole.
//! 4. Emit a `change` event carrying the candidate.
//! 5. If not canceled, commit and repaint the inputs and the calendar.
//!
//! A canceled candidate leaves committed state untouched and does not revert what the user typed.
//!
//! # Re-entrancy
//!
//! Host listeners run inside step 4 and cannot borrow the coordinator. They queue
//! [`PickerCommand`]s on the [`EventContext`](crate::EventContext) instead; the coordinator drains
//! them through [`PickerAdapter::take_deferred_commands`] once the outer transition has
//! committed, so every follow-up is gated against settled state.

use crate::format::parse_iso_date;
use crate::{
    AcceptabilityPolicy, CalendarConfig, CalendarSelection, Clock, DateFormatter, DateRange,
    FocusTarget, HostEvent, InputEvent, InputField, KeyPress, MaskOptions, PatternFormatter,
    PickerAdapter, PickerCommand, PickerError, PickerKey, PickerOptions, RangeEdge, SystemClock,
};
use chrono::{NaiveDate, Weekday};
use log::{debug, trace, warn};

/// Upper bound on deferred-command rounds drained after one entry point.
const MAX_DEFERRED_ROUNDS: usize = 16;

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChangeSource {
    /// Text typed into one input (raw or mask-resolved).
    Typed(InputField),
    /// A calendar click.
    Calendar,
    /// The "today" shortcut.
    Today,
    /// The "clear" shortcut.
    Clear,
    /// A property or attribute setter.
    Programmatic,
    /// Re-application of changed constraints.
    Constraint,
}

impl ChangeSource {
    fn cancelable(self) -> bool {
        !matches!(self, Self::Constraint)
    }

    fn is_selection(self) -> bool {
        matches!(self, Self::Calendar | Self::Today | Self::Clear)
    }
}

/// The date-range picker state machine.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use range_picker_core::{
///     FixedClock, HeadlessAdapter, PickerCommand, PickerOptions, RangeCoordinator,
/// };
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// let mut picker = RangeCoordinator::new(HeadlessAdapter::new(), PickerOptions::default())
///     .unwrap()
///     .with_clock(FixedClock(today));
/// picker.initialize();
///
/// picker.execute(PickerCommand::Today);
/// assert_eq!(picker.from(), Some(today));
/// assert_eq!(picker.to(), None);
/// ```
pub struct RangeCoordinator<A: PickerAdapter> {
    adapter: A,
    formatter: Box<dyn DateFormatter>,
    clock: Box<dyn Clock>,
    policy: AcceptabilityPolicy,
    /// Last range whose change event was not canceled.
    committed: DateRange,
    /// Value supplied at construction, consumed by `initialize`.
    initial_value: DateRange,
    open: bool,
    masked: bool,
    disabled: bool,
    initialized: bool,
    show_mask_format: bool,
    allow_invalid_date: bool,
    notify_input_value_changes: bool,
    show_today: bool,
    show_clear: bool,
}

impl<A: PickerAdapter> RangeCoordinator<A> {
    /// Create a coordinator using a [`PatternFormatter`] for `options.date_pattern`.
    ///
    /// Fails if the adapter lacks either input or the pattern is malformed. Nothing is written
    /// to the adapter until [`initialize`](Self::initialize).
    pub fn new(adapter: A, options: PickerOptions) -> Result<Self, PickerError> {
        let formatter = PatternFormatter::new(&options.date_pattern)?;
        Self::with_formatter(adapter, options, Box::new(formatter))
    }

    /// Create a coordinator with a custom parsing/formatting collaborator.
    pub fn with_formatter(
        adapter: A,
        options: PickerOptions,
        formatter: Box<dyn DateFormatter>,
    ) -> Result<Self, PickerError> {
        if !adapter.has_input_elements() {
            return Err(PickerError::MissingInputs);
        }

        Ok(Self {
            adapter,
            formatter,
            clock: Box::new(SystemClock),
            policy: options.policy(),
            committed: DateRange::empty(),
            initial_value: options.value,
            open: false,
            masked: options.masked,
            disabled: options.disabled,
            initialized: false,
            show_mask_format: options.show_mask_format,
            allow_invalid_date: options.allow_invalid_date,
            notify_input_value_changes: options.notify_input_value_changes,
            show_today: options.show_today,
            show_clear: options.show_clear,
        })
    }

    /// Replace the clock used by the "today" shortcut.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Wire up accessibility and masks, seed state and paint both inputs.
    ///
    /// Seeding keeps anything already committed through commands, then falls back to the
    /// configured value and finally to whatever text the inputs already hold. No change event is
    /// emitted for the initial state.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }

        self.adapter.initialize_accessibility();
        self.apply_masks(self.adapter.is_input_focused(None));

        // Values committed by commands issued before initialization take precedence.
        let seeded = DateRange {
            from: self
                .committed
                .from
                .or(self.initial_value.from)
                .or_else(|| self.coerce_text(&self.adapter.input_value(InputField::From))),
            to: self
                .committed
                .to
                .or(self.initial_value.to)
                .or_else(|| self.coerce_text(&self.adapter.input_value(InputField::To))),
        };
        let mut seeded = self.policy.corrected(&seeded);
        if !self.policy.is_range_acceptable(&seeded) {
            seeded.to = None;
        }
        self.committed = seeded;
        self.initialized = true;
        debug!("range picker initialized with {:?}", self.committed);

        self.write_input(InputField::From, true);
        self.write_input(InputField::To, true);

        if self.disabled {
            self.adapter.set_disabled(true);
        }
    }

    /// Tear down masks and the calendar and release the adapter's listeners.
    pub fn destroy(&mut self) {
        self.adapter.destroy_mask(InputField::From);
        self.adapter.destroy_mask(InputField::To);
        if self.open {
            self.adapter.detach_calendar();
            self.open = false;
        }
        self.adapter.destroy();
        self.initialized = false;
    }

    /// The committed range.
    pub fn value(&self) -> DateRange {
        self.committed
    }

    /// The committed start date.
    pub fn from(&self) -> Option<NaiveDate> {
        self.committed.from
    }

    /// The committed end date.
    pub fn to(&self) -> Option<NaiveDate> {
        self.committed.to
    }

    /// Whether the calendar popup is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether input masking is active.
    pub fn is_masked(&self) -> bool {
        self.masked
    }

    /// Whether the picker is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The active constraints.
    pub fn policy(&self) -> &AcceptabilityPolicy {
        &self.policy
    }

    /// The adapter.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Mutable access to the adapter (e.g. to register host listeners).
    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    /// Run a programmatic command, then any commands listeners deferred.
    pub fn execute(&mut self, command: PickerCommand) {
        self.apply_command(command);
        self.drain_deferred();
    }

    /// React to a UI notification, then run any commands listeners deferred.
    pub fn handle_event(&mut self, event: InputEvent) {
        self.apply_event(event);
        self.drain_deferred();
    }

    fn apply_command(&mut self, command: PickerCommand) {
        match command {
            PickerCommand::SetValue(range) => {
                self.propose(range, ChangeSource::Programmatic);
            }
            PickerCommand::SetFrom(from) => {
                self.propose(self.committed.with_from(from), ChangeSource::Programmatic);
            }
            PickerCommand::SetTo(to) => {
                self.propose(self.committed.with_to(to), ChangeSource::Programmatic);
            }
            PickerCommand::SetAttribute { name, value } => self.set_attribute(&name, value),
            PickerCommand::SetMin(min) => {
                self.policy.min = min;
                self.reapply_constraints();
            }
            PickerCommand::SetMax(max) => {
                self.policy.max = max;
                self.reapply_constraints();
            }
            PickerCommand::SetDisabledDates(dates) => {
                self.policy.disabled_dates = dates;
                self.reapply_constraints();
            }
            PickerCommand::SetDisabledDaysOfWeek(days) => self.set_disabled_days_of_week(days),
            PickerCommand::SetMasked(masked) => self.set_masked(masked),
            PickerCommand::SetDisabled(disabled) => self.set_disabled(disabled),
            PickerCommand::Open => self.open_calendar(),
            PickerCommand::Close => self.close_calendar(),
            PickerCommand::Today => {
                self.today();
            }
            PickerCommand::Clear => self.clear(),
        }
    }

    fn apply_event(&mut self, event: InputEvent) {
        if self.disabled && !matches!(event, InputEvent::Blur { .. }) {
            trace!("ignoring {:?} while disabled", event);
            return;
        }

        match event {
            InputEvent::Input { field, text } => {
                // With a mask in place only resolved mask output counts.
                if !self.masked {
                    self.handle_text(field, &text, false);
                }
            }
            InputEvent::MaskResolved { field, text } => {
                if self.masked {
                    self.handle_text(field, &text, true);
                }
            }
            InputEvent::Focus { field } => self.on_focus(field),
            InputEvent::Blur { field, related } => self.on_blur(field, related),
            InputEvent::Key { key, .. } => self.on_key(key),
            InputEvent::CalendarSelect(selection) => self.on_date_selected(selection),
            InputEvent::CalendarActiveCell { id } => {
                if self.open {
                    self.adapter.set_active_descendant(&id);
                }
            }
            InputEvent::ToggleClick => {
                if self.open {
                    self.close_calendar();
                } else {
                    self.open_calendar();
                    self.adapter.focus_input(InputField::From);
                }
            }
            InputEvent::TodayClick => {
                self.today();
            }
            InputEvent::ClearClick => self.clear(),
        }
    }

    fn drain_deferred(&mut self) {
        for _ in 0..MAX_DEFERRED_ROUNDS {
            let pending = self.adapter.take_deferred_commands();
            if pending.is_empty() {
                return;
            }
            for command in pending {
                trace!("running deferred {:?}", command);
                self.apply_command(command);
            }
        }

        let dropped = self.adapter.take_deferred_commands().len();
        if dropped > 0 {
            warn!(
                "dropping {} deferred picker commands after {} rounds",
                dropped, MAX_DEFERRED_ROUNDS
            );
        }
    }

    /// Gate, emit and commit a candidate. Returns `true` if it was committed.
    fn propose(&mut self, candidate: DateRange, source: ChangeSource) -> bool {
        if candidate == self.committed {
            trace!("{:?}: candidate equals committed value", source);
            return false;
        }
        if !self.is_acceptable(&candidate) {
            trace!("{:?}: candidate {:?} rejected by policy", source, candidate);
            return false;
        }

        let event = HostEvent::change(candidate, source.cancelable());
        if !self.adapter.emit_host_event(&event) {
            debug!("{:?}: change to {:?} canceled", source, candidate);
            return false;
        }

        let previous = self.committed;
        self.committed = candidate;
        debug!("{:?}: committed {:?}", source, candidate);
        self.repaint_after_commit(previous, source);
        true
    }

    fn is_acceptable(&self, range: &DateRange) -> bool {
        self.policy.is_date_acceptable(range.from) && self.policy.is_range_acceptable(range)
    }

    fn repaint_after_commit(&mut self, previous: DateRange, source: ChangeSource) {
        match source {
            // The user is still editing; the text is reformatted on blur.
            ChangeSource::Typed(_) => {}
            _ if source.is_selection() => {
                self.write_input(InputField::From, false);
                self.write_input(InputField::To, false);
            }
            _ => {
                if previous.from != self.committed.from {
                    self.write_input(InputField::From, false);
                }
                if previous.to != self.committed.to {
                    self.write_input(InputField::To, false);
                }
            }
        }

        if self.open {
            self.adapter.set_calendar_value(self.committed);
        }

        if source.is_selection() {
            let field = if self.committed.to.is_some() {
                InputField::To
            } else {
                InputField::From
            };
            self.adapter.select_input_text(field);
        }
    }

    fn handle_text(&mut self, field: InputField, raw: &str, from_mask: bool) {
        let sanitized = self.formatter.sanitize(raw);
        let parsed = self.formatter.parse(&sanitized);

        if from_mask {
            self.adapter.emit_host_event(&HostEvent::input(field, sanitized));
        }

        let candidate = match field {
            InputField::From => self.committed.with_from(parsed),
            InputField::To => self.committed.with_to(parsed),
        };
        self.propose(candidate, ChangeSource::Typed(field));
    }

    fn on_date_selected(&mut self, selection: CalendarSelection) {
        if selection.edge == Some(RangeEdge::To) {
            self.close_calendar();
        }
        let committed = self.propose(selection.range, ChangeSource::Calendar);
        if let (true, true, Some(date)) = (committed, self.open, selection.date) {
            self.adapter.set_calendar_active_date(date);
        }
    }

    /// Apply the "today" shortcut. Returns `true` if the resulting range is in effect.
    fn today(&mut self) -> bool {
        let today = self.clock.today();
        let candidate = if self.open {
            self.committed.with_from(Some(today))
        } else {
            DateRange::starting(today)
        };

        if !self.is_acceptable(&candidate) {
            debug!("today shortcut rejected: {:?} is not acceptable", candidate);
            return false;
        }

        let in_effect =
            candidate == self.committed || self.propose(candidate, ChangeSource::Today);
        if in_effect {
            self.adapter.set_calendar_active_date(today);
        }
        in_effect
    }

    fn clear(&mut self) {
        self.propose(DateRange::empty(), ChangeSource::Clear);
        self.close_calendar();
    }

    fn set_attribute(&mut self, name: &str, value: Option<String>) {
        let date = value.as_deref().and_then(|v| self.coerce_attribute(v));
        match name {
            "from" => {
                self.propose(self.committed.with_from(date), ChangeSource::Programmatic);
            }
            "to" | "end-value" => {
                self.propose(self.committed.with_to(date), ChangeSource::Programmatic);
            }
            other => trace!("ignoring unobserved attribute {:?}", other),
        }
    }

    fn set_disabled_days_of_week(&mut self, days: Vec<Weekday>) {
        self.policy.disabled_days_of_week = days;
        self.reapply_constraints();
    }

    /// Clear whichever committed side the current policy no longer accepts.
    fn reapply_constraints(&mut self) {
        let corrected = self.policy.corrected(&self.committed);
        if corrected != self.committed {
            debug!(
                "constraints changed: correcting {:?} to {:?}",
                self.committed, corrected
            );
            self.propose(corrected, ChangeSource::Constraint);
        }

        if self.open {
            self.adapter.set_calendar_constraints(&self.policy);
        }
    }

    fn set_masked(&mut self, masked: bool) {
        if self.masked == masked {
            return;
        }
        self.masked = masked;
        self.apply_masks(self.adapter.is_input_focused(None));
    }

    /// Rebuild or tear down both masks. `focused` says whether an input holds focus afterwards.
    fn apply_masks(&mut self, focused: bool) {
        if self.masked {
            let show = self.show_mask_format && focused;
            let options = MaskOptions::for_pattern(self.formatter.pattern(), show);
            self.adapter.initialize_mask(InputField::From, &options);
            self.adapter.initialize_mask(InputField::To, &options);
        } else {
            self.adapter.destroy_mask(InputField::From);
            self.adapter.destroy_mask(InputField::To);
            self.format_input(InputField::From);
            self.format_input(InputField::To);
        }
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        self.adapter.set_disabled(disabled);
        if disabled {
            self.close_calendar();
        }
    }

    fn open_calendar(&mut self) {
        if self.open || self.disabled {
            return;
        }

        self.format_input(InputField::To);

        let config = CalendarConfig {
            value: self.committed,
            policy: self.policy.clone(),
            show_today: self.show_today,
            show_clear: self.show_clear,
        };
        self.adapter.attach_calendar(&config);
        self.open = true;
        debug!("calendar opened");

        if let Some(date) = self.committed.focus_date() {
            self.adapter.go_to_calendar_date(date);
        }
        self.adapter.emit_host_event(&HostEvent::open());
    }

    fn close_calendar(&mut self) {
        if !self.open {
            return;
        }

        self.adapter.detach_calendar();
        self.open = false;
        debug!("calendar closed");
        self.adapter.emit_host_event(&HostEvent::close());
    }

    fn on_focus(&mut self, field: InputField) {
        if self.masked && self.show_mask_format {
            self.apply_masks(true);
        }
        self.adapter.select_input_text(field);
    }

    fn on_blur(&mut self, field: InputField, related: Option<FocusTarget>) {
        let focus_stays_inside = self.adapter.is_input_focused(related);
        if self.masked && !focus_stays_inside {
            self.apply_masks(false);
        }

        self.format_input(field);

        if !self.open || related == Some(FocusTarget::Calendar) {
            return;
        }
        let should_close = match field {
            InputField::From => !focus_stays_inside,
            InputField::To => true,
        };
        if should_close {
            self.close_calendar();
        }
    }

    fn on_key(&mut self, key: KeyPress) {
        if !self.open {
            if key.key == PickerKey::ArrowDown {
                self.open_calendar();
            }
            return;
        }

        match key.key {
            PickerKey::Escape | PickerKey::Tab => self.close_calendar(),
            PickerKey::ArrowUp if key.alt => self.close_calendar(),
            PickerKey::ArrowUp
            | PickerKey::ArrowDown
            | PickerKey::ArrowLeft
            | PickerKey::ArrowRight
            | PickerKey::PageUp
            | PickerKey::PageDown
            | PickerKey::Enter => self.adapter.propagate_calendar_key(key),
            PickerKey::Space | PickerKey::Home | PickerKey::End => {}
        }
    }

    /// Reformat the text currently in `field` without touching committed state.
    ///
    /// Parseable, acceptable text is rewritten in canonical form; anything else is cleared unless
    /// invalid dates are allowed.
    fn format_input(&mut self, field: InputField) {
        let text = self.adapter.input_value(field);
        if text.is_empty() {
            return;
        }

        let notify = self.notify_input_value_changes;
        match self.coerce_text(&text) {
            Some(date) if self.policy.is_date_acceptable(Some(date)) => {
                let formatted = self.formatter.format(date);
                if formatted != text {
                    self.adapter.set_input_value(field, &formatted, notify);
                }
            }
            _ => {
                if !self.allow_invalid_date {
                    self.adapter.set_input_value(field, "", notify);
                }
            }
        }
    }

    /// Paint `field` from committed state.
    fn write_input(&mut self, field: InputField, silent: bool) {
        if !self.initialized {
            return;
        }
        let date = match field {
            InputField::From => self.committed.from,
            InputField::To => self.committed.to,
        };
        let text = date.map(|d| self.formatter.format(d)).unwrap_or_default();
        let notify = !silent && self.notify_input_value_changes;
        self.adapter.set_input_value(field, &text, notify);
    }

    fn coerce_text(&self, text: &str) -> Option<NaiveDate> {
        self.formatter.parse(&self.formatter.sanitize(text))
    }

    fn coerce_attribute(&self, text: &str) -> Option<NaiveDate> {
        self.coerce_text(text).or_else(|| parse_iso_date(text))
    }
}
