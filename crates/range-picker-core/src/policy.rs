//! Acceptability policy.
//!
//! Every candidate range passes through [`AcceptabilityPolicy`] before it may become committed
//! state. The policy is a plain value: the coordinator owns one and replaces individual
//! constraints when the host changes them.

use crate::DateRange;
use chrono::{Datelike, NaiveDate, Weekday};

/// Min/max/disabled-date/disabled-weekday rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptabilityPolicy {
    /// Earliest acceptable date (inclusive).
    pub min: Option<NaiveDate>,
    /// Latest acceptable date (inclusive).
    pub max: Option<NaiveDate>,
    /// Individually disabled dates.
    pub disabled_dates: Vec<NaiveDate>,
    /// Disabled days of the week.
    pub disabled_days_of_week: Vec<Weekday>,
}

impl AcceptabilityPolicy {
    /// A policy that accepts every date.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Returns `true` if `date` may be committed.
    ///
    /// `None` is always acceptable: the absence of a date is not itself a violation.
    pub fn is_date_acceptable(&self, date: Option<NaiveDate>) -> bool {
        let Some(date) = date else {
            return true;
        };

        if self.min.is_some_and(|min| date < min) {
            return false;
        }
        if self.max.is_some_and(|max| date > max) {
            return false;
        }
        if self.disabled_dates.contains(&date) {
            return false;
        }
        !self.disabled_days_of_week.contains(&date.weekday())
    }

    /// Returns `true` if `range` may be committed as a whole.
    ///
    /// A range without `to` is acceptable here; callers that also need the lone `from` checked
    /// combine this with [`is_date_acceptable`](Self::is_date_acceptable).
    pub fn is_range_acceptable(&self, range: &DateRange) -> bool {
        if range.to.is_none() {
            return true;
        }

        let ordered = match (range.from, range.to) {
            (Some(from), Some(to)) => from <= to,
            _ => true,
        };

        self.is_date_acceptable(range.from) && self.is_date_acceptable(range.to) && ordered
    }

    /// Returns `range` with every side that this policy rejects cleared.
    pub fn corrected(&self, range: &DateRange) -> DateRange {
        DateRange {
            from: range.from.filter(|d| self.is_date_acceptable(Some(*d))),
            to: range.to.filter(|d| self.is_date_acceptable(Some(*d))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_none_is_always_acceptable() {
        let policy = AcceptabilityPolicy {
            min: Some(d(2024, 1, 1)),
            max: Some(d(2024, 1, 2)),
            disabled_dates: vec![d(2024, 1, 1)],
            disabled_days_of_week: vec![Weekday::Mon, Weekday::Tue],
        };
        assert!(policy.is_date_acceptable(None));
    }

    #[test]
    fn test_min_max_are_inclusive() {
        let policy = AcceptabilityPolicy {
            min: Some(d(2024, 1, 10)),
            max: Some(d(2024, 1, 20)),
            ..Default::default()
        };
        assert!(policy.is_date_acceptable(Some(d(2024, 1, 10))));
        assert!(policy.is_date_acceptable(Some(d(2024, 1, 20))));
        assert!(!policy.is_date_acceptable(Some(d(2024, 1, 9))));
        assert!(!policy.is_date_acceptable(Some(d(2024, 1, 21))));
    }

    #[test]
    fn test_disabled_dates_and_weekdays() {
        let policy = AcceptabilityPolicy {
            disabled_dates: vec![d(2024, 6, 3)],
            disabled_days_of_week: vec![Weekday::Sat, Weekday::Sun],
            ..Default::default()
        };
        // 2024-06-03 is a Monday, 2024-06-01 a Saturday.
        assert!(!policy.is_date_acceptable(Some(d(2024, 6, 3))));
        assert!(!policy.is_date_acceptable(Some(d(2024, 6, 1))));
        assert!(policy.is_date_acceptable(Some(d(2024, 6, 4))));
    }

    #[test]
    fn test_range_without_to_is_acceptable() {
        let policy = AcceptabilityPolicy {
            min: Some(d(2024, 1, 10)),
            ..Default::default()
        };
        assert!(policy.is_range_acceptable(&DateRange::starting(d(2023, 1, 1))));
    }

    #[test]
    fn test_range_requires_order_and_acceptable_sides() {
        let policy = AcceptabilityPolicy {
            max: Some(d(2024, 1, 31)),
            ..Default::default()
        };
        assert!(policy.is_range_acceptable(&DateRange::between(d(2024, 1, 1), d(2024, 1, 1))));
        assert!(!policy.is_range_acceptable(&DateRange::between(d(2024, 1, 5), d(2024, 1, 1))));
        assert!(!policy.is_range_acceptable(&DateRange::between(d(2024, 1, 1), d(2024, 2, 1))));
        assert!(policy.is_range_acceptable(&DateRange::new(None, Some(d(2024, 1, 3)))));
    }

    #[test]
    fn test_corrected_clears_only_offending_side() {
        let policy = AcceptabilityPolicy {
            max: Some(d(2024, 1, 15)),
            ..Default::default()
        };
        let range = DateRange::between(d(2024, 1, 10), d(2024, 1, 20));
        assert_eq!(policy.corrected(&range), DateRange::starting(d(2024, 1, 10)));
    }
}
