//! Picker configuration.

use crate::{AcceptabilityPolicy, DateRange, PatternFormatter};
use chrono::{NaiveDate, Weekday};

/// Construction-time configuration for a [`RangeCoordinator`](crate::RangeCoordinator).
///
/// Every field can be changed later through [`PickerCommand`](crate::PickerCommand) except
/// `date_pattern`, `allow_invalid_date`, `notify_input_value_changes`, `show_mask_format`,
/// `show_today` and `show_clear`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOptions {
    /// Initial value. When empty, the coordinator seeds itself from existing input text.
    pub value: DateRange,
    /// Earliest acceptable date.
    pub min: Option<NaiveDate>,
    /// Latest acceptable date.
    pub max: Option<NaiveDate>,
    /// Individually disabled dates.
    pub disabled_dates: Vec<NaiveDate>,
    /// Disabled weekdays.
    pub disabled_days_of_week: Vec<Weekday>,
    /// Whether keystrokes go through an input mask.
    pub masked: bool,
    /// Whether the mask placeholder is visible while typing.
    pub show_mask_format: bool,
    /// Display pattern for [`PatternFormatter`].
    pub date_pattern: String,
    /// Keep unparseable text in the inputs instead of clearing it on blur.
    pub allow_invalid_date: bool,
    /// Forwarded as `notify` whenever the coordinator rewrites input text.
    pub notify_input_value_changes: bool,
    /// Show the calendar's "today" shortcut.
    pub show_today: bool,
    /// Show the calendar's "clear" shortcut.
    pub show_clear: bool,
    /// Start disabled.
    pub disabled: bool,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            value: DateRange::empty(),
            min: None,
            max: None,
            disabled_dates: Vec::new(),
            disabled_days_of_week: Vec::new(),
            masked: true,
            show_mask_format: false,
            date_pattern: PatternFormatter::DEFAULT_PATTERN.to_string(),
            allow_invalid_date: false,
            notify_input_value_changes: false,
            show_today: false,
            show_clear: false,
            disabled: false,
        }
    }
}

impl PickerOptions {
    /// Set the initial value.
    pub fn with_value(mut self, value: DateRange) -> Self {
        self.value = value;
        self
    }

    /// Set the minimum date.
    pub fn with_min(mut self, min: NaiveDate) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the maximum date.
    pub fn with_max(mut self, max: NaiveDate) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the disabled dates.
    pub fn with_disabled_dates(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.disabled_dates = dates.into_iter().collect();
        self
    }

    /// Set the disabled weekdays.
    pub fn with_disabled_days_of_week(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.disabled_days_of_week = days.into_iter().collect();
        self
    }

    /// Enable or disable masking.
    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    /// Show or hide the mask placeholder.
    pub fn show_mask_format(mut self, show: bool) -> Self {
        self.show_mask_format = show;
        self
    }

    /// Set the display pattern.
    pub fn with_date_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.date_pattern = pattern.into();
        self
    }

    /// Keep unparseable text on blur.
    pub fn allow_invalid_date(mut self, allow: bool) -> Self {
        self.allow_invalid_date = allow;
        self
    }

    /// Notify input listeners when text is rewritten.
    pub fn notify_input_value_changes(mut self, notify: bool) -> Self {
        self.notify_input_value_changes = notify;
        self
    }

    /// Show the "today" and "clear" shortcuts.
    pub fn with_shortcuts(mut self, today: bool, clear: bool) -> Self {
        self.show_today = today;
        self.show_clear = clear;
        self
    }

    /// Start disabled.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// The acceptability policy described by these options.
    pub fn policy(&self) -> AcceptabilityPolicy {
        AcceptabilityPolicy {
            min: self.min,
            max: self.max,
            disabled_dates: self.disabled_dates.clone(),
            disabled_days_of_week: self.disabled_days_of_week.clone(),
        }
    }
}
