use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Configuration errors raised while building a picker.
///
/// Date-domain rejections (unparseable text, constraint violations, canceled change events) are
/// not errors; they simply leave committed state untouched.
pub enum PickerError {
    #[error("the date range picker requires two inputs")]
    /// The adapter does not expose both the "from" and the "to" input.
    MissingInputs,

    #[error("invalid date pattern '{pattern}': expected YYYY, MM and DD exactly once")]
    /// A formatter pattern is missing a date token or repeats one.
    InvalidDatePattern {
        /// The rejected pattern.
        pattern: String,
    },
}
