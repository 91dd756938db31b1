//! Fixed-template fallback for strings the pattern table does not cover.
//!
//! Only strings containing a full English month name qualify. The
//! title-cased string is then tried against each template in turn. A
//! template applies only when the string has its exact shape (whitespace
//! between fields, four-digit years) and chrono parses the whole of it.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use super::calendar::{LONG_MONTHS, last_of_month};
use super::prepare::title_case;
use super::types::DateRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Precision {
    /// A complete date; start and end are both that date.
    Day,
    /// A year and month; bounds span the whole month.
    Month,
}

/// A single strftime-style interpretation of the fallback string.
struct Template {
    precision: Precision,
    format: &'static str,
    shape: Regex,
}

/// Templates in precedence order.
static TEMPLATES: LazyLock<Vec<Template>> = LazyLock::new(|| {
    [
        (Precision::Day, "%Y %B %d", r"^\d{4}\s+[A-Za-z]+\s+\d{1,2}$"),
        (Precision::Day, "%Y %B%d", r"^\d{4}\s+[A-Za-z]+\d{1,2}$"),
        (Precision::Month, "%Y %B", r"^\d{4}\s+[A-Za-z]+$"),
        (Precision::Month, "%B %Y", r"^[A-Za-z]+\s+\d{4}$"),
        (Precision::Day, "%B %d %Y", r"^[A-Za-z]+\s+\d{1,2}\s+\d{4}$"),
    ]
    .into_iter()
    .map(|(precision, format, shape)| Template {
        precision,
        format,
        shape: Regex::new(shape).unwrap(),
    })
    .collect()
});

/// Try the fallback templates on a cleaned string.
///
/// Returns `None` when no month name is present or no template parses the
/// whole string.
pub fn resolve_fallback(cleaned: &str) -> Option<DateRange> {
    let titled = title_case(cleaned);
    if !contains_long_month(&titled) {
        return None;
    }

    TEMPLATES
        .iter()
        .filter(|template| template.shape.is_match(&titled))
        .find_map(|template| match template.precision {
            Precision::Day => NaiveDate::parse_from_str(&titled, template.format)
                .ok()
                .map(DateRange::exact),
            Precision::Month => parse_month(&titled, template.format),
        })
}

fn contains_long_month(s: &str) -> bool {
    LONG_MONTHS.iter().any(|month| s.contains(month))
}

/// Parse a day-less template by pinning the day to the 1st, then widen the
/// result to the whole month.
fn parse_month(s: &str, fmt: &str) -> Option<DateRange> {
    let first = NaiveDate::parse_from_str(&format!("{s} 1"), &format!("{fmt} %d")).ok()?;
    let last = last_of_month(first.year(), first.month()).ok()?;
    Some(DateRange::between(first, last))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_month_day() {
        assert_eq!(
            resolve_fallback("1950 march 5"),
            Some(DateRange::exact(ymd(1950, 3, 5)))
        );
    }

    #[test]
    fn test_year_month_is_leap_aware() {
        assert_eq!(
            resolve_fallback("2000 february"),
            Some(DateRange::between(ymd(2000, 2, 1), ymd(2000, 2, 29)))
        );
        assert_eq!(
            resolve_fallback("1900 february"),
            Some(DateRange::between(ymd(1900, 2, 1), ymd(1900, 2, 28)))
        );
    }

    #[test]
    fn test_month_year() {
        assert_eq!(
            resolve_fallback("september 1950"),
            Some(DateRange::between(ymd(1950, 9, 1), ymd(1950, 9, 30)))
        );
    }

    #[test]
    fn test_month_day_year() {
        assert_eq!(
            resolve_fallback("july 4 1976"),
            Some(DateRange::exact(ymd(1976, 7, 4)))
        );
    }

    #[test]
    fn test_requires_full_month_name() {
        assert_eq!(resolve_fallback("1950 5"), None);
        assert_eq!(resolve_fallback("unknown"), None);
    }

    #[test]
    fn test_trailing_text_fails_every_template() {
        assert_eq!(resolve_fallback("september 1950 maybe"), None);
        assert_eq!(resolve_fallback("early march 1950"), None);
    }

    #[test]
    fn test_fields_must_be_separated_by_whitespace() {
        assert_eq!(resolve_fallback("1950march"), None);
        assert_eq!(resolve_fallback("september1950"), None);
        assert_eq!(resolve_fallback("1950march5"), None);
    }

    #[test]
    fn test_year_must_have_four_digits() {
        assert_eq!(resolve_fallback("march 76"), None);
        assert_eq!(resolve_fallback("july 4 76"), None);
        assert_eq!(resolve_fallback("76 march 4"), None);
        assert_eq!(resolve_fallback("march 19500"), None);
    }

    #[test]
    fn test_day_glued_to_month_is_accepted() {
        assert_eq!(
            resolve_fallback("1950 march5"),
            Some(DateRange::exact(ymd(1950, 3, 5)))
        );
    }

    #[test]
    fn test_impossible_day_fails() {
        assert_eq!(resolve_fallback("february 30 2023"), None);
        assert_eq!(resolve_fallback("2023 february 30"), None);
    }
}
