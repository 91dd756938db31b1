//! Archival date normalization.
//!
//! Turns loosely formatted date strings ("ca. 1950s", "18---19--",
//! "2006-01 to 2006-12-16") into a bounding pair of calendar dates using
//! a four-stage pipeline:
//! 1. Text preparation (cleaning and month expansion)
//! 2. An optional external range parser
//! 3. The ordered regex pattern table and its resolvers
//! 4. Fixed-template fallback for month-name strings
//!
//! followed by a sane-year filter on the result.

mod calendar;
mod fallback;
mod patterns;
mod prepare;
mod resolvers;
mod types;


use chrono::{Datelike, NaiveDate};

pub use calendar::days_in_month;
pub use fallback::resolve_fallback;
pub use patterns::{
    DEFAULT_REGISTRY, PatternBinding, PatternRegistry, PatternSpec, Resolver,
    default_pattern_specs,
};
pub use prepare::clean_date_text;
pub use types::{
    DateBound, DateRange, NormalizationResult, NormalizeError, RegistryError, ResolveError,
};

/// A general-purpose date range parser consulted before the pattern table.
///
/// Whatever it returns is trusted as-is, apart from the sane-year filter.
/// Implementations must decline (return `None`) rather than guess.
pub trait RangeParser: Send + Sync {
    fn try_parse_range(&self, cleaned: &str) -> Option<(NaiveDate, NaiveDate)>;
}

/// A range parser that never recognizes anything, leaving every string to
/// the pattern table.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRangeParser;

impl RangeParser for NoRangeParser {
    fn try_parse_range(&self, _cleaned: &str) -> Option<(NaiveDate, NaiveDate)> {
        None
    }
}

pub const DEFAULT_MIN_YEAR: i32 = 1000;
pub const DEFAULT_MAX_YEAR: i32 = 2100;

/// Inclusive window of plausible calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaneYearWindow {
    pub min_year: i32,
    pub max_year: i32,
}

impl SaneYearWindow {
    pub fn new(min_year: i32, max_year: i32) -> Self {
        Self { min_year, max_year }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.min_year..=self.max_year).contains(&date.year())
    }

    /// Every bounded side must fall inside the window; unbounded sides
    /// are always acceptable.
    pub fn accepts(&self, range: &DateRange) -> bool {
        range.bounds().all(|date| self.contains(date))
    }
}

impl Default for SaneYearWindow {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_YEAR, DEFAULT_MAX_YEAR)
    }
}

/// The normalization pipeline: a pattern registry, an optional external
/// range parser, and the sane-year window.
///
/// Holds no mutable state, so one instance can serve any number of
/// threads.
pub struct Normalizer<'r> {
    registry: &'r PatternRegistry,
    range_parser: Box<dyn RangeParser>,
    window: SaneYearWindow,
}

impl Default for Normalizer<'static> {
    fn default() -> Self {
        Self::new(&DEFAULT_REGISTRY)
    }
}

impl<'r> Normalizer<'r> {
    pub fn new(registry: &'r PatternRegistry) -> Self {
        Self {
            registry,
            range_parser: Box::new(NoRangeParser),
            window: SaneYearWindow::default(),
        }
    }

    pub fn with_range_parser(mut self, range_parser: impl RangeParser + 'static) -> Self {
        self.range_parser = Box::new(range_parser);
        self
    }

    pub fn with_window(mut self, window: SaneYearWindow) -> Self {
        self.window = window;
        self
    }

    pub fn window(&self) -> SaneYearWindow {
        self.window
    }

    /// Normalize one raw date string.
    pub fn normalize(&self, raw: &str) -> Result<NormalizationResult, NormalizeError> {
        let cleaned = clean_date_text(raw);
        let range = self.resolve(&cleaned)?;

        if !self.window.accepts(&range) {
            return Err(NormalizeError::OutOfPlausibleRange {
                start: range.start(),
                end: range.end(),
                min_year: self.window.min_year,
                max_year: self.window.max_year,
            });
        }

        Ok(NormalizationResult::new(raw, range))
    }

    /// Resolve an already cleaned string, without the sane-year filter.
    ///
    /// A pattern whose resolver rejects its captures does not end the
    /// search: the fallback templates still get a chance, and the
    /// resolver's error is only reported if they fail too, as
    /// `InvalidCalendarDate` for calendar failures and `Rejected` otherwise.
    pub fn resolve(&self, cleaned: &str) -> Result<DateRange, NormalizeError> {
        if let Some((start, end)) = self.range_parser.try_parse_range(cleaned) {
            return Ok(DateRange::between(start, end));
        }

        let rejected = match self.registry.find_first_match(cleaned) {
            Some((binding, caps)) => match binding.resolve(cleaned, &caps) {
                Ok(range) => return Ok(range),
                Err(e) => Some(e),
            },
            None => None,
        };

        if let Some(range) = resolve_fallback(cleaned) {
            return Ok(range);
        }

        Err(match rejected {
            Some(source) => NormalizeError::from_resolve(cleaned, source),
            None => NormalizeError::MatchNotFound {
                cleaned: cleaned.to_string(),
            },
        })
    }
}

/// Normalize one raw date string with the default registry and window.
pub fn normalize(raw: &str) -> Result<NormalizationResult, NormalizeError> {
    Normalizer::default().normalize(raw)
}
