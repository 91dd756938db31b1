//! Core types for date normalization.
//!
//! This module defines:
//! - The bound pair produced by resolvers ([`DateRange`])
//! - The externally visible per-record output ([`NormalizationResult`])
//! - The error taxonomy: resolver-local failures ([`ResolveError`]),
//!   final outcomes ([`NormalizeError`]) and build-time registry
//!   misconfiguration ([`RegistryError`])

use chrono::NaiveDate;
use serde::Serialize;

/// One side of a date range. `None` means unbounded in that direction,
/// which is distinct from a failed normalization.
pub type DateBound = Option<NaiveDate>;

/// An ordered (start, end) pair of bounds.
///
/// At least one side is always bounded: there is no constructor for a
/// range that is open on both ends. `start <= end` is expected but not
/// enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: DateBound,
    end: DateBound,
}

impl DateRange {
    /// A closed range from `start` to `end`.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// A single precise date: both bounds equal.
    pub fn exact(date: NaiveDate) -> Self {
        Self::between(date, date)
    }

    /// Known start, unbounded end ("after 1900").
    pub fn starting(start: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Unbounded start, known end ("before 1900").
    pub fn ending(end: NaiveDate) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    pub fn start(&self) -> DateBound {
        self.start
    }

    pub fn end(&self) -> DateBound {
        self.end
    }

    /// Iterates over the bounded sides only.
    pub fn bounds(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.into_iter().chain(self.end)
    }
}

/// The per-record output handed to the batch driver.
///
/// Serializes to the AtoM column layout
/// `originalDateString, startDate, endDate`; unbounded sides become
/// empty cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizationResult {
    #[serde(rename = "originalDateString")]
    pub original: String,
    #[serde(rename = "startDate")]
    pub start: DateBound,
    #[serde(rename = "endDate")]
    pub end: DateBound,
}

impl NormalizationResult {
    pub fn new(original: impl Into<String>, range: DateRange) -> Self {
        Self {
            original: original.into(),
            start: range.start(),
            end: range.end(),
        }
    }

    /// Start bound as `YYYY-MM-DD`, or `None` when unbounded.
    pub fn start_iso(&self) -> Option<String> {
        self.start.map(format_iso)
    }

    /// End bound as `YYYY-MM-DD`, or `None` when unbounded.
    pub fn end_iso(&self) -> Option<String> {
        self.end.map(format_iso)
    }
}

pub(crate) fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// A resolver-local failure. The orchestrator treats it as "this
/// candidate is broken, try the next strategy" rather than "no match".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Captured groups do not form a real calendar date (e.g. April 31).
    InvalidCalendarDate { year: i32, month: u32, day: u32 },

    /// A captured word is not a full English month name.
    UnknownMonth { name: String },

    /// A captured numeric group could not be read as a number.
    InvalidNumber { value: String },
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCalendarDate { year, month, day } => {
                write!(f, "Invalid calendar date: {:04}-{:02}-{:02}", year, month, day)
            }
            Self::UnknownMonth { name } => write!(f, "Unknown month name: {}", name),
            Self::InvalidNumber { value } => write!(f, "Invalid number: {}", value),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Why a raw date string could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// No collaborator, pattern or fallback template interpreted the string.
    MatchNotFound { cleaned: String },

    /// A pattern matched but its captured data was not a valid date, and
    /// the fallback chain could not recover.
    InvalidCalendarDate { cleaned: String, source: ResolveError },

    /// A pattern matched but its resolver refused the captures for a
    /// non-calendar reason (an unknown month word, an unreadable number),
    /// and the fallback chain could not recover.
    Rejected { cleaned: String, source: ResolveError },

    /// The resolved range has a bound outside the sane-year window.
    OutOfPlausibleRange {
        start: DateBound,
        end: DateBound,
        min_year: i32,
        max_year: i32,
    },
}

impl std::fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MatchNotFound { cleaned } => {
                write!(f, "DATE NOT NORMALIZED: No match found: {}", cleaned)
            }
            Self::InvalidCalendarDate { cleaned, source } | Self::Rejected { cleaned, source } => {
                write!(f, "DATE NOT NORMALIZED: {} in '{}'", source, cleaned)
            }
            Self::OutOfPlausibleRange {
                start,
                end,
                min_year,
                max_year,
            } => write!(
                f,
                "DATE NOT NORMALIZED: {} to {} is outside {}-{}",
                start.map_or_else(|| "unbounded".to_string(), format_iso),
                end.map_or_else(|| "unbounded".to_string(), format_iso),
                min_year,
                max_year
            ),
        }
    }
}

impl std::error::Error for NormalizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidCalendarDate { source, .. } | Self::Rejected { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

impl NormalizeError {
    /// Wrap a resolver's refusal, keeping calendar failures distinct from
    /// every other kind of rejection.
    pub fn from_resolve(cleaned: &str, source: ResolveError) -> Self {
        let cleaned = cleaned.to_string();
        match source {
            ResolveError::InvalidCalendarDate { .. } => Self::InvalidCalendarDate { cleaned, source },
            _ => Self::Rejected { cleaned, source },
        }
    }
}

/// A pattern table entry that cannot be turned into a working binding.
/// Raised while building a registry, never while normalizing data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The resolver was declared without a matching rule.
    MissingMatcher { name: String },

    /// The matching rule is not a valid regular expression.
    InvalidMatcher { name: String, message: String },

    /// Two bindings share a name, so fixtures could not tell them apart.
    DuplicateName { name: String },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingMatcher { name } => write!(
                f,
                "Pattern \"{}\" does not have the required regular expression defined",
                name
            ),
            Self::InvalidMatcher { name, message } => {
                write!(f, "Pattern \"{}\" has an invalid regular expression: {}", name, message)
            }
            Self::DuplicateName { name } => write!(f, "Pattern \"{}\" is declared twice", name),
        }
    }
}

impl std::error::Error for RegistryError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bounds_skips_unbounded_side() {
        let r = DateRange::starting(ymd(1900, 12, 31));
        assert_eq!(r.bounds().collect::<Vec<_>>(), vec![ymd(1900, 12, 31)]);
    }

    #[test]
    fn test_result_iso_formatting_pads_year() {
        let result = NormalizationResult::new("0500", DateRange::exact(ymd(500, 1, 1)));
        assert_eq!(result.start_iso().as_deref(), Some("0500-01-01"));
        assert_eq!(result.end_iso().as_deref(), Some("0500-01-01"));
    }

    #[test]
    fn test_error_display() {
        let err = NormalizeError::MatchNotFound {
            cleaned: "unknown".to_string(),
        };
        assert_eq!(err.to_string(), "DATE NOT NORMALIZED: No match found: unknown");

        let err = ResolveError::InvalidCalendarDate {
            year: 2023,
            month: 2,
            day: 30,
        };
        assert_eq!(err.to_string(), "Invalid calendar date: 2023-02-30");
    }

    #[test]
    fn test_only_calendar_failures_are_invalid_calendar_dates() {
        let calendar = ResolveError::InvalidCalendarDate {
            year: 1900,
            month: 2,
            day: 29,
        };
        assert!(matches!(
            NormalizeError::from_resolve("1900-02-29", calendar),
            NormalizeError::InvalidCalendarDate { .. }
        ));

        let unknown = ResolveError::UnknownMonth {
            name: "and".to_string(),
        };
        assert_eq!(
            NormalizeError::from_resolve("1950 and 1960s", unknown.clone()),
            NormalizeError::Rejected {
                cleaned: "1950 and 1960s".to_string(),
                source: unknown,
            }
        );

        let number = ResolveError::InvalidNumber {
            value: "x".to_string(),
        };
        assert!(matches!(
            NormalizeError::from_resolve("x", number),
            NormalizeError::Rejected { .. }
        ));
    }
}
