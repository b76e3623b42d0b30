//! Input mask configuration.
//!
//! The mask engine itself (keystroke filtering, caret handling) lives behind the adapter. The
//! coordinator only decides *when* a mask exists and with which options. The adapter reports
//! fully resolved mask output back as
//! [`InputEvent::MaskResolved`](crate::InputEvent::MaskResolved).

/// Character shown for not-yet-typed positions when the mask format is visible.
pub const MASK_PLACEHOLDER: char = '_';

/// Options passed to [`PickerAdapter::initialize_mask`](crate::PickerAdapter::initialize_mask).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskOptions {
    /// Date pattern the mask constrains input to (e.g. `MM/DD/YYYY`).
    pub pattern: String,
    /// Placeholder rendering of `pattern` (e.g. `__/__/____`).
    pub placeholder: String,
    /// Whether the placeholder is rendered while the user types.
    pub show_mask_format: bool,
}

impl MaskOptions {
    /// Build mask options for a date pattern.
    pub fn for_pattern(pattern: &str, show_mask_format: bool) -> Self {
        Self {
            pattern: pattern.to_string(),
            placeholder: mask_format(pattern),
            show_mask_format,
        }
    }
}

/// Replace every date token letter in `pattern` with [`MASK_PLACEHOLDER`].
pub fn mask_format(pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| match c {
            'Y' | 'M' | 'D' => MASK_PLACEHOLDER,
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_format() {
        assert_eq!(mask_format("MM/DD/YYYY"), "__/__/____");
        assert_eq!(mask_format("DD.MM.YYYY"), "__.__.____");
    }

    #[test]
    fn test_options_for_pattern() {
        let options = MaskOptions::for_pattern("YYYY-MM-DD", true);
        assert_eq!(options.placeholder, "____-__-__");
        assert!(options.show_mask_format);
    }
}
