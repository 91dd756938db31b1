//! Calendar arithmetic shared by the resolvers and the fallback chain.
//!
//! Everything here is proleptic Gregorian. Month lengths come from chrono,
//! and decade/century bounds are computed from the numeric prefix written
//! in the source string ("195-" is the 1950s, "19--" is the 1900s).

use chrono::{Datelike, Months, NaiveDate};

use super::types::ResolveError;

/// Full English month names, in calendar order.
pub const LONG_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Number of days in `month` (1-12) of `year`, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some(last.day())
}

/// Month number (1-12) for a full English month name, case-insensitive.
/// Abbreviations are not accepted; the cleaner expands them beforehand.
pub fn month_from_name(name: &str) -> Option<u32> {
    LONG_MONTHS
        .iter()
        .position(|month| month.eq_ignore_ascii_case(name))
        .map(|idx| idx as u32 + 1)
}

/// Like [`month_from_name`], but reports the unknown word as a resolver error.
pub fn require_month(name: &str) -> Result<u32, ResolveError> {
    month_from_name(name).ok_or_else(|| ResolveError::UnknownMonth {
        name: name.to_string(),
    })
}

/// Builds a validated calendar date.
pub fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate, ResolveError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(ResolveError::InvalidCalendarDate { year, month, day })
}

pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, ResolveError> {
    date(year, month, 1)
}

/// Last calendar day of the month, leap-year aware.
pub fn last_of_month(year: i32, month: u32) -> Result<NaiveDate, ResolveError> {
    let day = days_in_month(year, month)
        .ok_or(ResolveError::InvalidCalendarDate { year, month, day: 1 })?;
    date(year, month, day)
}

pub fn year_start(year: i32) -> Result<NaiveDate, ResolveError> {
    date(year, 1, 1)
}

pub fn year_end(year: i32) -> Result<NaiveDate, ResolveError> {
    date(year, 12, 31)
}

/// First day of the decade named by a three-digit prefix: `195` → 1950-01-01.
pub fn decade_start(prefix: i32) -> Result<NaiveDate, ResolveError> {
    year_start(prefix * 10)
}

/// Last day of the decade named by a three-digit prefix: `195` → 1959-12-31.
pub fn decade_end(prefix: i32) -> Result<NaiveDate, ResolveError> {
    year_end(prefix * 10 + 9)
}

/// Last day of the decade containing `year`: 1955 → 1959-12-31.
pub fn decade_end_of_year(year: i32) -> Result<NaiveDate, ResolveError> {
    decade_end(year / 10)
}

/// First day of the century named by a two-digit prefix: `18` → 1800-01-01.
pub fn century_start(prefix: i32) -> Result<NaiveDate, ResolveError> {
    year_start(prefix * 100)
}

/// Last day of the century named by a two-digit prefix: `19` → 1999-12-31.
pub fn century_end(prefix: i32) -> Result<NaiveDate, ResolveError> {
    year_end(prefix * 100 + 99)
}

/// Two-digit years at or above this value belong to the 1900s, the rest
/// to the 2000s (the POSIX `%y` convention).
pub const TWO_DIGIT_YEAR_PIVOT: i32 = 69;

pub fn expand_two_digit_year(yy: i32) -> i32 {
    if yy >= TWO_DIGIT_YEAR_PIVOT {
        1900 + yy
    } else {
        2000 + yy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_february_length_follows_leap_rules() {
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(1900, 2), Some(28));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(1600, 2), Some(29));
    }

    #[test]
    fn test_days_in_month_across_the_year() {
        let lengths: Vec<u32> = (1..=12).filter_map(|m| days_in_month(1999, m)).collect();
        assert_eq!(lengths, vec![31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]);
        assert_eq!(days_in_month(1999, 12), Some(31));
    }

    #[test]
    fn test_days_in_month_rejects_bad_month() {
        assert_eq!(days_in_month(2000, 0), None);
        assert_eq!(days_in_month(2000, 13), None);
    }

    #[test]
    fn test_last_of_month() {
        assert_eq!(last_of_month(2000, 2).unwrap(), ymd(2000, 2, 29));
        assert_eq!(last_of_month(1900, 2).unwrap(), ymd(1900, 2, 28));
        assert_eq!(last_of_month(1834, 8).unwrap(), ymd(1834, 8, 31));
        assert_eq!(last_of_month(1834, 9).unwrap(), ymd(1834, 9, 30));
        assert!(matches!(
            last_of_month(1834, 13),
            Err(ResolveError::InvalidCalendarDate { month: 13, .. })
        ));
    }

    #[test]
    fn test_month_lookup() {
        assert_eq!(month_from_name("january"), Some(1));
        assert_eq!(month_from_name("SEPTEMBER"), Some(9));
        assert_eq!(month_from_name("sep"), None);
        assert_eq!(
            require_month("smarch"),
            Err(ResolveError::UnknownMonth {
                name: "smarch".to_string()
            })
        );
    }

    #[test]
    fn test_date_rejects_impossible_day() {
        assert_eq!(
            date(2023, 2, 30),
            Err(ResolveError::InvalidCalendarDate {
                year: 2023,
                month: 2,
                day: 30
            })
        );
        assert_eq!(date(2000, 2, 29).unwrap(), ymd(2000, 2, 29));
    }

    #[test]
    fn test_decade_and_century_bounds() {
        assert_eq!(decade_start(195).unwrap(), ymd(1950, 1, 1));
        assert_eq!(decade_end(195).unwrap(), ymd(1959, 12, 31));
        assert_eq!(decade_end_of_year(1955).unwrap(), ymd(1959, 12, 31));
        assert_eq!(century_start(18).unwrap(), ymd(1800, 1, 1));
        assert_eq!(century_end(19).unwrap(), ymd(1999, 12, 31));
    }

    #[test]
    fn test_two_digit_year_pivot() {
        assert_eq!(expand_two_digit_year(99), 1999);
        assert_eq!(expand_two_digit_year(69), 1969);
        assert_eq!(expand_two_digit_year(68), 2068);
        assert_eq!(expand_two_digit_year(5), 2005);
    }
}
