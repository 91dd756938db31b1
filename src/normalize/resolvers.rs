//! Resolvers for the pattern table.
//!
//! Each resolver receives the cleaned string and the captures of the
//! pattern that matched it, and computes the bounding [`DateRange`].
//! Resolvers never panic on data: a capture that cannot become a real
//! calendar date is returned as a [`ResolveError`].

use chrono::NaiveDate;
use regex::Captures;

use super::calendar::{
    century_end, century_start, date, decade_end, decade_end_of_year, decade_start,
    expand_two_digit_year, first_of_month, last_of_month, require_month, year_end, year_start,
};
use super::types::{DateRange, ResolveError};

type ResolveResult = Result<DateRange, ResolveError>;

/// Read capture group `idx` as a number. Missing groups are reported the
/// same way as unparsable ones.
fn int<T: std::str::FromStr>(caps: &Captures<'_>, idx: usize) -> Result<T, ResolveError> {
    let value = caps.get(idx).map_or("", |m| m.as_str());
    value.parse().map_err(|_| ResolveError::InvalidNumber {
        value: value.to_string(),
    })
}

/// Read optional capture group `idx` as a day number.
fn opt_day(caps: &Captures<'_>, idx: usize) -> Result<Option<u32>, ResolveError> {
    match caps.get(idx) {
        Some(_) => int(caps, idx).map(Some),
        None => Ok(None),
    }
}

fn month(caps: &Captures<'_>, idx: usize) -> Result<u32, ResolveError> {
    require_month(caps.get(idx).map_or("", |m| m.as_str()))
}

/// `YYYY`, `MM`, `DD` in three consecutive groups starting at `idx`.
fn iso_ymd(caps: &Captures<'_>, idx: usize) -> Result<NaiveDate, ResolveError> {
    date(int(caps, idx)?, int(caps, idx + 1)?, int(caps, idx + 2)?)
}

/// `MM`, `DD`, `YYYY` in three consecutive groups starting at `idx`.
fn us_mdy(caps: &Captures<'_>, idx: usize) -> Result<NaiveDate, ResolveError> {
    date(int(caps, idx + 2)?, int(caps, idx)?, int(caps, idx + 1)?)
}

// ── Year, decade and century shapes ──

/// 'Between 1900 and 2000' | '1950 or 1951' | '1950-1951' | '1950 1951' | '1950-1960s'
/// = first year start, second year end.
pub fn year_to_year(_: &str, caps: &Captures<'_>) -> ResolveResult {
    year_to_year_bounds(int(caps, 1)?, int(caps, 2)?)
}

fn year_to_year_bounds(first: i32, second: i32) -> ResolveResult {
    Ok(DateRange::between(year_start(first)?, year_end(second)?))
}

/// '1950', '1950?', '?-1950', '1950--' = '1950-01-01', '1950-12-31'
pub fn single_year(_: &str, caps: &Captures<'_>) -> ResolveResult {
    let year = int(caps, 1)?;
    year_to_year_bounds(year, year)
}

/// '1950,  1960' = '1950-01-01', '1950-12-31'.
///
/// Only the first year is used for both bounds, unlike every other
/// two-year shape. Kept as-is until the archivists confirm the intent.
pub fn first_year_twice(_: &str, caps: &Captures<'_>) -> ResolveResult {
    let first = int(caps, 1)?;
    year_to_year_bounds(first, first)
}

/// 'After 1900' = '1900-12-31', unbounded
pub fn after_year(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::starting(year_end(int(caps, 1)?)?))
}

/// 'Before 1900' = unbounded, '1900-01-01'
pub fn before_year(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::ending(year_start(int(caps, 1)?)?))
}

/// '195-' = '1950-01-01', '1959-12-31'
pub fn decade(_: &str, caps: &Captures<'_>) -> ResolveResult {
    let prefix = int(caps, 1)?;
    Ok(DateRange::between(decade_start(prefix)?, decade_end(prefix)?))
}

/// '1955-' | '1955s' | '1955's' = '1955-01-01', '1959-12-31'
pub fn decade_of_year(_: &str, caps: &Captures<'_>) -> ResolveResult {
    let year = int(caps, 1)?;
    Ok(DateRange::between(year_start(year)?, decade_end_of_year(year)?))
}

/// '19-' | '19--' | '19??' = '1900-01-01', '1999-12-31'
pub fn century(_: &str, caps: &Captures<'_>) -> ResolveResult {
    let prefix = int(caps, 1)?;
    Ok(DateRange::between(century_start(prefix)?, century_end(prefix)?))
}

/// '18---19--' = '1800-01-01', '1999-12-31'
pub fn century_to_century(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::between(century_start(int(caps, 1)?)?, century_end(int(caps, 2)?)?))
}

/// '183--19--' = '1830-01-01', '1999-12-31'
pub fn decade_to_century(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::between(decade_start(int(caps, 1)?)?, century_end(int(caps, 2)?)?))
}

/// '18---194-' = '1800-01-01', '1949-12-31'
pub fn century_to_decade(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::between(century_start(int(caps, 1)?)?, decade_end(int(caps, 2)?)?))
}

/// '1834-19--' = '1834-01-01', '1999-12-31'
pub fn year_to_century(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::between(year_start(int(caps, 1)?)?, century_end(int(caps, 2)?)?))
}

/// '18---1945' = '1800-01-01', '1945-12-31'
pub fn century_to_year(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::between(century_start(int(caps, 1)?)?, year_end(int(caps, 2)?)?))
}

/// '195--196-' | '198- 199-' = '1950-01-01', '1969-12-31'
pub fn decade_to_decade(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::between(decade_start(int(caps, 1)?)?, decade_end(int(caps, 2)?)?))
}

/// '1955-196-' = '1955-01-01', '1969-12-31'
pub fn year_to_decade(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::between(year_start(int(caps, 1)?)?, decade_end(int(caps, 2)?)?))
}

/// '195--1960' = '1950-01-01', '1960-12-31'
pub fn decade_to_year(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::between(decade_start(int(caps, 1)?)?, year_end(int(caps, 2)?)?))
}

// ── Numeric calendar dates ──

/// '2000-02-29' = '2000-02-29', '2000-02-29'
pub fn iso_date(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::exact(iso_ymd(caps, 1)?))
}

/// '1834-08' = '1834-08-01', '1834-08-31'
pub fn iso_month(_: &str, caps: &Captures<'_>) -> ResolveResult {
    let (year, month) = (int(caps, 1)?, int(caps, 2)?);
    Ok(DateRange::between(first_of_month(year, month)?, last_of_month(year, month)?))
}

/// '2006-01 to 2006-03' = '2006-01-01', '2006-03-31'
pub fn iso_month_to_month(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::between(
        first_of_month(int(caps, 1)?, int(caps, 2)?)?,
        last_of_month(int(caps, 3)?, int(caps, 4)?)?,
    ))
}

/// '2006-01 to 2006-12-16' = '2006-01-01', '2006-12-16'
pub fn iso_month_to_date(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::between(
        first_of_month(int(caps, 1)?, int(caps, 2)?)?,
        iso_ymd(caps, 3)?,
    ))
}

/// '2006-01-15 to 2006-12' = '2006-01-15', '2006-12-31'
pub fn iso_date_to_month(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::between(
        iso_ymd(caps, 1)?,
        last_of_month(int(caps, 4)?, int(caps, 5)?)?,
    ))
}

/// '2006-01-15 to 2006-12-16' = '2006-01-15', '2006-12-16'
pub fn iso_date_to_date(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::between(iso_ymd(caps, 1)?, iso_ymd(caps, 4)?))
}

/// '1950-06-01 and/or after' = '1950-06-01', unbounded
pub fn iso_date_or_after(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::starting(iso_ymd(caps, 1)?))
}

/// '1950-06-01 and/or before' = unbounded, '1950-06-01'
pub fn iso_date_or_before(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::ending(iso_ymd(caps, 1)?))
}

/// Match mm/dd/yyyy (or, at some risk, dd/mm/yyyy) = date, unbounded.
pub fn us_date(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::starting(us_mdy(caps, 1)?))
}

/// Match mm/dd/yy = date, unbounded. Two-digit years pivot at 69.
pub fn us_date_short_year(_: &str, caps: &Captures<'_>) -> ResolveResult {
    let year = expand_two_digit_year(int(caps, 3)?);
    Ok(DateRange::starting(date(year, int(caps, 1)?, int(caps, 2)?)?))
}

/// Match 'mm/dd/yyyy mm/dd/yyyy' = first date, second date.
pub fn us_date_pair(_: &str, caps: &Captures<'_>) -> ResolveResult {
    Ok(DateRange::between(us_mdy(caps, 1)?, us_mdy(caps, 4)?))
}

// ── Month-name ranges ──

/// '2000-march 2000-april' = '2000-03-01', '2000-04-30'
pub fn month_to_month(_: &str, caps: &Captures<'_>) -> ResolveResult {
    let (y1, m1) = (int(caps, 1)?, month(caps, 2)?);
    let (y2, m2) = (int(caps, 3)?, month(caps, 4)?);
    Ok(DateRange::between(first_of_month(y1, m1)?, last_of_month(y2, m2)?))
}

/// '2001-november-22 2001-november-23' = '2001-11-22', '2001-11-23'
pub fn day_to_day(_: &str, caps: &Captures<'_>) -> ResolveResult {
    let start = date(int(caps, 1)?, month(caps, 2)?, int(caps, 3)?)?;
    let end = date(int(caps, 4)?, month(caps, 5)?, int(caps, 6)?)?;
    Ok(DateRange::between(start, end))
}

/// Mixed specificity month ranges:
/// - '1997-october 1998-june-04' = '1997-10-01', '1998-06-04'
/// - '1992-august-09 1993-july' = '1992-08-09', '1993-07-31'
///
/// A missing start day defaults to the 1st, a missing end day to the
/// last day of that month.
pub fn mixed_month_day(_: &str, caps: &Captures<'_>) -> ResolveResult {
    let (y1, m1) = (int(caps, 1)?, month(caps, 2)?);
    let (y2, m2) = (int(caps, 4)?, month(caps, 5)?);

    let start = match opt_day(caps, 3)? {
        Some(d1) => date(y1, m1, d1)?,
        None => first_of_month(y1, m1)?,
    };
    let end = month_end_or_day(y2, m2, opt_day(caps, 6)?)?;
    Ok(DateRange::between(start, end))
}

/// Year-only start with a month-level end:
/// - '1991 1993-may-05' = '1991-01-01', '1993-05-05'
/// - '1991 1993-may' = '1991-01-01', '1993-05-31'
pub fn year_to_month_day(_: &str, caps: &Captures<'_>) -> ResolveResult {
    let start = year_start(int(caps, 1)?)?;
    let end = month_end_or_day(int(caps, 2)?, month(caps, 3)?, opt_day(caps, 4)?)?;
    Ok(DateRange::between(start, end))
}

fn month_end_or_day(year: i32, month: u32, day: Option<u32>) -> Result<NaiveDate, ResolveError> {
    match day {
        Some(day) => date(year, month, day),
        None => last_of_month(year, month),
    }
}

/// 'march 5 1950-april 6 1951' (commas already stripped) = '1950-03-05', '1951-04-06'
pub fn month_day_year_range(_: &str, caps: &Captures<'_>) -> ResolveResult {
    let start = date(int(caps, 3)?, month(caps, 1)?, int(caps, 2)?)?;
    let end = date(int(caps, 6)?, month(caps, 4)?, int(caps, 5)?)?;
    Ok(DateRange::between(start, end))
}
