//! Parsing and formatting collaborator.
//!
//! The coordinator never interprets date text itself. It goes through a [`DateFormatter`],
//! which hosts may replace (locale-aware formats, custom parse callbacks, etc.).
//!
//! [`PatternFormatter`] is the default implementation. It understands token patterns such as
//! `MM/DD/YYYY`, `DD.MM.YYYY` or `YYYY-MM-DD`:
//!
//! - `YYYY`: four-digit year
//! - `MM`: month, one or two digits when parsing, zero-padded when formatting
//! - `DD`: day of month, same rules as `MM`
//!
//! Every other character is a literal separator.

use crate::error::PickerError;
use crate::mask::MASK_PLACEHOLDER;
use chrono::NaiveDate;
use regex::Regex;

/// String ⇄ date conversion used by the coordinator.
pub trait DateFormatter {
    /// Parse display text into a date. Returns `None` for empty or unparseable text.
    fn parse(&self, text: &str) -> Option<NaiveDate>;

    /// Format a date for display.
    fn format(&self, date: NaiveDate) -> String;

    /// Strip input artifacts (mask placeholders, surrounding whitespace) from raw text.
    fn sanitize(&self, text: &str) -> String {
        text.trim().to_string()
    }

    /// The date pattern handed to the mask collaborator (e.g. `MM/DD/YYYY`).
    fn pattern(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Year,
    Month,
    Day,
}

/// Token-pattern formatter (`MM/DD/YYYY` and friends).
#[derive(Debug, Clone)]
pub struct PatternFormatter {
    pattern: String,
    chrono_format: String,
    matcher: Regex,
    order: [Part; 3],
    placeholder: Regex,
}

impl PatternFormatter {
    /// The pattern used when none is configured.
    pub const DEFAULT_PATTERN: &'static str = "MM/DD/YYYY";

    /// Compile a token pattern.
    ///
    /// Fails with [`PickerError::InvalidDatePattern`] unless `YYYY`, `MM` and `DD` each appear
    /// exactly once.
    pub fn new(pattern: &str) -> Result<Self, PickerError> {
        let invalid = || PickerError::InvalidDatePattern {
            pattern: pattern.to_string(),
        };

        let mut chrono_format = String::new();
        let mut regex_source = String::from("^");
        let mut order = Vec::with_capacity(3);

        let mut rest = pattern;
        while !rest.is_empty() {
            let (part, token_len) = if rest.starts_with("YYYY") {
                (Some(Part::Year), 4)
            } else if rest.starts_with("MM") {
                (Some(Part::Month), 2)
            } else if rest.starts_with("DD") {
                (Some(Part::Day), 2)
            } else {
                (None, 0)
            };

            match part {
                Some(part) => {
                    if order.contains(&part) {
                        return Err(invalid());
                    }
                    order.push(part);
                    let (fmt, re) = match part {
                        Part::Year => ("%Y", r"(\d{4})"),
                        Part::Month => ("%m", r"(\d{1,2})"),
                        Part::Day => ("%d", r"(\d{1,2})"),
                    };
                    chrono_format.push_str(fmt);
                    regex_source.push_str(re);
                    rest = &rest[token_len..];
                }
                None => {
                    let Some(ch) = rest.chars().next() else {
                        break;
                    };
                    if ch == '%' {
                        chrono_format.push_str("%%");
                    } else {
                        chrono_format.push(ch);
                    }
                    regex_source.push_str(&regex::escape(&ch.to_string()));
                    rest = &rest[ch.len_utf8()..];
                }
            }
        }
        regex_source.push('$');

        let order: [Part; 3] = order.try_into().map_err(|_| invalid())?;
        let matcher = Regex::new(&regex_source).map_err(|_| invalid())?;
        let placeholder = Regex::new(&regex::escape(&MASK_PLACEHOLDER.to_string()))
            .map_err(|_| invalid())?;

        Ok(Self {
            pattern: pattern.to_string(),
            chrono_format,
            matcher,
            order,
            placeholder,
        })
    }
}

impl Default for PatternFormatter {
    fn default() -> Self {
        // The default pattern is a compile-time constant known to be well formed.
        match Self::new(Self::DEFAULT_PATTERN) {
            Ok(formatter) => formatter,
            Err(_) => unreachable!("default date pattern is valid"),
        }
    }
}

impl DateFormatter for PatternFormatter {
    fn parse(&self, text: &str) -> Option<NaiveDate> {
        let captures = self.matcher.captures(text.trim())?;

        let (mut year, mut month, mut day) = (None, None, None);
        for (index, part) in self.order.iter().enumerate() {
            let value = captures.get(index + 1)?.as_str();
            match part {
                Part::Year => year = value.parse::<i32>().ok(),
                Part::Month => month = value.parse::<u32>().ok(),
                Part::Day => day = value.parse::<u32>().ok(),
            }
        }

        NaiveDate::from_ymd_opt(year?, month?, day?)
    }

    fn format(&self, date: NaiveDate) -> String {
        date.format(&self.chrono_format).to_string()
    }

    fn sanitize(&self, text: &str) -> String {
        let stripped = self.placeholder.replace_all(text, "");
        let stripped = stripped.trim();
        if stripped.chars().any(|c| c.is_ascii_digit()) {
            stripped.to_string()
        } else {
            String::new()
        }
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Parse an ISO `YYYY-MM-DD` date. Used as the fallback for string attributes.
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}
