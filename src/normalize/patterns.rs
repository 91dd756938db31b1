//! Ordered regex pattern table for date normalization.
//!
//! Each entry binds a regular expression, matched against the cleaned
//! string, to the resolver that turns its captures into a [`DateRange`].
//! Patterns are tried sequentially and the first match wins: there is no
//! search for a longer or more specific competitor, so anchored and
//! specific shapes must be declared before general ones.
//!
//! The default table is compiled once via `LazyLock`. Alternate tables can
//! be built with [`PatternRegistry::from_specs`].

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::resolvers;
use super::types::{DateRange, RegistryError, ResolveError};

/// Computes a date range from the cleaned string and a pattern's captures.
pub type Resolver = fn(&str, &Captures<'_>) -> Result<DateRange, ResolveError>;

/// An uncompiled table entry.
#[derive(Debug, Clone)]
pub struct PatternSpec {
    /// Stable name used in diagnostics and precedence tests.
    pub name: &'static str,
    /// Regular expression source. Unanchored unless it anchors itself.
    pub regex: String,
    pub resolve: Resolver,
}

impl PatternSpec {
    pub fn new(name: &'static str, regex: impl Into<String>, resolve: Resolver) -> Self {
        Self {
            name,
            regex: regex.into(),
            resolve,
        }
    }
}

/// A compiled, immutable pattern binding.
pub struct PatternBinding {
    name: &'static str,
    regex: Regex,
    resolve: Resolver,
}

impl PatternBinding {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run this binding's resolver on a match it produced.
    pub fn resolve(&self, cleaned: &str, caps: &Captures<'_>) -> Result<DateRange, ResolveError> {
        (self.resolve)(cleaned, caps)
    }
}

impl std::fmt::Debug for PatternBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternBinding")
            .field("name", &self.name)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

/// All compiled patterns, in declaration order. First match wins.
#[derive(Debug)]
pub struct PatternRegistry {
    patterns: Vec<PatternBinding>,
}

impl PatternRegistry {
    /// Compile a pattern table.
    ///
    /// Fails on the first entry with an empty or invalid matcher, or on a
    /// duplicated name. Declaration order is preserved.
    pub fn from_specs(specs: &[PatternSpec]) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        let mut patterns = Vec::with_capacity(specs.len());

        for spec in specs {
            if spec.regex.trim().is_empty() {
                return Err(RegistryError::MissingMatcher {
                    name: spec.name.to_string(),
                });
            }
            if !seen.insert(spec.name) {
                return Err(RegistryError::DuplicateName {
                    name: spec.name.to_string(),
                });
            }
            let regex = Regex::new(&spec.regex).map_err(|e| RegistryError::InvalidMatcher {
                name: spec.name.to_string(),
                message: e.to_string(),
            })?;
            patterns.push(PatternBinding {
                name: spec.name,
                regex,
                resolve: spec.resolve,
            });
        }

        Ok(Self { patterns })
    }

    /// Find the first binding, in declaration order, whose regex matches
    /// anywhere in `cleaned`.
    pub fn find_first_match<'r, 't>(
        &'r self,
        cleaned: &'t str,
    ) -> Option<(&'r PatternBinding, Captures<'t>)> {
        self.patterns
            .iter()
            .find_map(|binding| binding.regex.captures(cleaned).map(|caps| (binding, caps)))
    }

    /// Names of every binding, in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.patterns.iter().map(|p| p.name).collect()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Process-wide default registry, compiled on first use.
///
/// A broken built-in table is a programmer error, so it panics here rather
/// than surfacing as a per-record failure.
pub static DEFAULT_REGISTRY: LazyLock<PatternRegistry> = LazyLock::new(|| {
    PatternRegistry::from_specs(&default_pattern_specs())
        .unwrap_or_else(|e| panic!("Failed to build date pattern registry: {}", e))
});

/// The built-in pattern table, in precedence order.
pub fn default_pattern_specs() -> Vec<PatternSpec> {
    // Reused fragments
    let month_range = r"(\d{4})[-\s]?([a-z]+)";
    let day = r"(\d{1,2})";
    let iso_month = r"(\d{4})-(\d{2})";
    let iso_date = r"(\d{4})-(\d{2})-(\d{2})";

    let spec = |name, regex: String, resolve: Resolver| PatternSpec::new(name, regex, resolve);

    vec![
        spec("between", r"between (\d{4}) and (\d{4})".to_string(), resolvers::year_to_year),
        spec("decade", r"^(\d{3})-$".to_string(), resolvers::decade),
        spec("after", r"after (\d{4})".to_string(), resolvers::after_year),
        spec("before", r"before (\d{4})".to_string(), resolvers::before_year),
        spec("year-or-year", r"(\d{4}) or (\d{4})".to_string(), resolvers::year_to_year),
        spec("uncertain-year", r"(\d{4})\?".to_string(), resolvers::single_year),
        spec("decade-of-year", r"^(\d{4})['’]?[-s]$".to_string(), resolvers::decade_of_year),
        spec("century", r"^(\d{2})[?-]{1,2}$".to_string(), resolvers::century),
        spec("century-century", r"^(\d{2})---(\d{2})--$".to_string(), resolvers::century_to_century),
        spec("decade-century", r"^(\d{3})--(\d{2})--$".to_string(), resolvers::decade_to_century),
        spec("century-decade", r"^(\d{2})---(\d{3})-$".to_string(), resolvers::century_to_decade),
        spec("year-century", r"^(\d{4})-(\d{2})--$".to_string(), resolvers::year_to_century),
        spec("century-year", r"^(\d{2})---(\d{4})$".to_string(), resolvers::century_to_year),
        spec("decade-decade", r"^(\d{3})--(\d{3})-$".to_string(), resolvers::decade_to_decade),
        spec("year-decade", r"^(\d{4})-(\d{3})-$".to_string(), resolvers::year_to_decade),
        spec("decade-year", r"^(\d{3})--(\d{4})$".to_string(), resolvers::decade_to_year),
        spec("year-dash-year", r"^(\d{4})\s?-\s?(\d{4})$".to_string(), resolvers::year_to_year),
        spec("year-space-year", r"^(\d{4})\s(\d{4})$".to_string(), resolvers::year_to_year),
        spec("iso-date", format!("^{iso_date}$"), resolvers::iso_date),
        spec("us-date", r"^(\d{1,2})/(\d{1,2})/(\d{4})$".to_string(), resolvers::us_date),
        spec("us-date-short-year", r"^(\d{1,2})/(\d{1,2})/(\d{2})$".to_string(), resolvers::us_date_short_year),
        spec(
            "us-date-pair",
            r"^(\d{1,2})/(\d{1,2})/(\d{4})\s(\d{1,2})/(\d{1,2})/(\d{4})$".to_string(),
            resolvers::us_date_pair,
        ),
        spec("year", r"^(\d{4})$".to_string(), resolvers::single_year),
        spec(
            "month-month",
            format!(r"^{month_range}\s+{month_range}$"),
            resolvers::month_to_month,
        ),
        spec(
            "day-day",
            format!(r"^{month_range}[-\s]?{day}\s+{month_range}[-\s]?{day}$"),
            resolvers::day_to_day,
        ),
        spec(
            "mixed-month-day",
            format!(r"^{month_range}(?:[-\s]?{day})?\s+{month_range}(?:[-\s]?{day})?$"),
            resolvers::mixed_month_day,
        ),
        spec(
            "year-month-day",
            format!(r"^(\d{{4}})\s+{month_range}(?:[-\s]?{day})?$"),
            resolvers::year_to_month_day,
        ),
        spec("spaced-decades", r"^(\d{3})\s*-\s*(\d{3})\s*-$".to_string(), resolvers::decade_to_decade),
        spec("unknown-start-year", r"^\?-(\d{4})$".to_string(), resolvers::single_year),
        spec("year-comma-year", r"^(\d{4}),?\s+(\d{4})$".to_string(), resolvers::first_year_twice),
        spec(
            "year-year-suffix",
            r"^(\d{4})\s*-\s*(\d{4})['’]?[-s]$".to_string(),
            resolvers::year_to_year,
        ),
        spec("year-trailing-dashes", r"^(\d{4})-+$".to_string(), resolvers::single_year),
        spec(
            "month-day-year-range",
            r"^([a-z]+)\s+(\d{1,2}),?\s+(\d{4})\s*-\s*([a-z]+)\s+(\d{1,2}),?\s+(\d{4})$".to_string(),
            resolvers::month_day_year_range,
        ),
        spec("iso-month", format!("^{iso_month}$"), resolvers::iso_month),
        spec(
            "iso-month-to-month",
            format!(r"^{iso_month}\s*to\s*{iso_month}$"),
            resolvers::iso_month_to_month,
        ),
        spec(
            "iso-month-to-date",
            format!(r"^{iso_month}\s*to\s*{iso_date}$"),
            resolvers::iso_month_to_date,
        ),
        spec(
            "iso-date-to-month",
            format!(r"^{iso_date}\s*to\s*{iso_month}$"),
            resolvers::iso_date_to_month,
        ),
        spec(
            "iso-date-to-date",
            format!(r"^{iso_date}\s*to\s*{iso_date}$"),
            resolvers::iso_date_to_date,
        ),
        spec("year-or-after", r"^(\d{4})\s+(?:or|and)\s+after$".to_string(), resolvers::after_year),
        spec("year-or-before", r"^(\d{4})\s+(?:or|and)\s+before$".to_string(), resolvers::before_year),
        spec(
            "iso-date-or-after",
            format!(r"^{iso_date}\s+(?:and/or|and|or)\s+after$"),
            resolvers::iso_date_or_after,
        ),
        spec(
            "iso-date-or-before",
            format!(r"^{iso_date}\s+(?:and/or|and|or)\s+before$"),
            resolvers::iso_date_or_before,
        ),
    ]
}
