//! Date range value object.
//!
//! A [`DateRange`] is a pair of optional calendar dates. It does not validate itself: ordering
//! (`from <= to`) is only enforced when a candidate is accepted by
//! [`AcceptabilityPolicy`](crate::AcceptabilityPolicy).
//!
//! The type is `Copy`, so every hand-off between the coordinator, the adapter and host listeners
//! is an independent value. Nothing aliases the coordinator's committed state.

use chrono::NaiveDate;

/// A `{from, to}` pair of optional dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateRange {
    /// Start of the range (inclusive).
    pub from: Option<NaiveDate>,
    /// End of the range (inclusive).
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Create a range from its two sides.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// A range with neither side set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A range that only has a start date.
    pub fn starting(from: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    /// A range with both sides set.
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Return an independent copy of this range.
    ///
    /// Equivalent to `*self`; kept as a named operation for hosts porting code that copies
    /// ranges explicitly before exposing them.
    pub fn copy(&self) -> Self {
        *self
    }

    /// Returns `true` if neither side is set.
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Returns `true` if both sides are set.
    pub fn is_complete(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }

    /// Returns a copy with `from` replaced.
    pub fn with_from(self, from: Option<NaiveDate>) -> Self {
        Self { from, ..self }
    }

    /// Returns a copy with `to` replaced.
    pub fn with_to(self, to: Option<NaiveDate>) -> Self {
        Self { to, ..self }
    }

    /// Returns `true` if `date` lies inside a complete range (both ends inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.from, self.to) {
            (Some(from), Some(to)) => from <= date && date <= to,
            _ => false,
        }
    }

    /// The date a calendar should navigate to when showing this range: `to` if set, else `from`.
    pub fn focus_date(&self) -> Option<NaiveDate> {
        self.to.or(self.from)
    }
}

impl From<(Option<NaiveDate>, Option<NaiveDate>)> for DateRange {
    fn from((from, to): (Option<NaiveDate>, Option<NaiveDate>)) -> Self {
        Self { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_copy_is_independent() {
        let original = DateRange::between(d(2024, 1, 10), d(2024, 1, 20));
        let mut copy = original.copy();
        copy.to = None;

        assert_eq!(original.to, Some(d(2024, 1, 20)));
        assert_eq!(copy.from, original.from);
    }

    #[test]
    fn test_does_not_self_validate_order() {
        let reversed = DateRange::between(d(2024, 2, 1), d(2024, 1, 1));
        assert!(reversed.is_complete());
        assert!(!reversed.contains(d(2024, 1, 15)));
    }

    #[test]
    fn test_focus_date_prefers_to() {
        assert_eq!(DateRange::empty().focus_date(), None);
        assert_eq!(DateRange::starting(d(2024, 3, 1)).focus_date(), Some(d(2024, 3, 1)));
        assert_eq!(
            DateRange::between(d(2024, 3, 1), d(2024, 3, 9)).focus_date(),
            Some(d(2024, 3, 9))
        );
        assert_eq!(
            DateRange::new(None, Some(d(2024, 3, 9))).focus_date(),
            Some(d(2024, 3, 9))
        );
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::between(d(2024, 1, 10), d(2024, 1, 20));
        assert!(range.contains(d(2024, 1, 10)));
        assert!(range.contains(d(2024, 1, 20)));
        assert!(!range.contains(d(2024, 1, 21)));
        assert!(!DateRange::starting(d(2024, 1, 10)).contains(d(2024, 1, 10)));
    }
}
