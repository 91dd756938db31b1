//! Text preparation for date normalization.
//!
//! Cleans raw date strings before any pattern is tried:
//! - Whitespace trimming and lower-casing
//! - Noise removal (`[`, `]`, `ca.`, `ca`, `cir`, commas, periods)
//! - Uncertain-dash collapsing (`-?` → `-`)
//! - Month abbreviation expansion (`jan` → `january`, `sept` → `september`)
//!
//! Every pattern in the registry is written against this cleaned form,
//! never against the raw input.

use std::sync::LazyLock;

use regex::Regex;

/// Literal substitutions, applied in order.
const LITERAL_SUBS: &[(&str, &str)] = &[
    ("[", ""),
    ("]", ""),
    ("ca.", ""),
    ("ca", ""),
    ("-?", "-"),
    ("cir", ""),
    (",", ""),
    (".", ""),
];

/// Month abbreviations expanded to full names. `sept` comes before `sep`
/// so the four-letter form is never left half-expanded.
static MONTH_ABBREVIATIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\bsept\b", "september"),
        (r"\bjan\b", "january"),
        (r"\bfeb\b", "february"),
        (r"\bmar\b", "march"),
        (r"\bapr\b", "april"),
        (r"\bjun\b", "june"),
        (r"\bjul\b", "july"),
        (r"\baug\b", "august"),
        (r"\bsep\b", "september"),
        (r"\boct\b", "october"),
        (r"\bnov\b", "november"),
        (r"\bdec\b", "december"),
    ]
    .into_iter()
    .map(|(pattern, month)| (Regex::new(pattern).unwrap(), month))
    .collect()
});

/// Clean a raw date string so the pattern registry can match it.
///
/// The literal substitution list is re-applied until the string stops
/// changing: a single pass over `19-??` would leave `19-?` behind, and
/// cleaning must be idempotent.
pub fn clean_date_text(raw: &str) -> String {
    let mut s = raw.trim().to_lowercase();

    loop {
        let next = apply_literal_subs(&s);
        if next == s {
            break;
        }
        s = next;
    }

    for (re, month) in MONTH_ABBREVIATIONS.iter() {
        s = re.replace_all(&s, *month).into_owned();
    }

    s.trim().to_string()
}

fn apply_literal_subs(s: &str) -> String {
    LITERAL_SUBS
        .iter()
        .fold(s.to_string(), |acc, (junk, replacement)| acc.replace(junk, replacement))
}

/// Title-case a cleaned string the way the fallback templates expect:
/// the first letter of every alphabetic run is upper-cased, the rest
/// lower-cased ("1950 march 5" → "1950 March 5").
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(c);
            prev_is_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_lowercases() {
        assert_eq!(clean_date_text("  Between 1900 AND 2000 "), "between 1900 and 2000");
    }

    #[test]
    fn test_removes_circa_markers() {
        assert_eq!(clean_date_text("ca. 1950s"), "1950s");
        assert_eq!(clean_date_text("ca 1950"), "1950");
        assert_eq!(clean_date_text("circa 1950"), "1950");
        assert_eq!(clean_date_text("[1950?]"), "1950?");
    }

    #[test]
    fn test_removes_commas_and_periods() {
        assert_eq!(clean_date_text("March 5, 1950."), "march 5 1950");
    }

    #[test]
    fn test_collapses_uncertain_dash() {
        assert_eq!(clean_date_text("195-?"), "195-");
        assert_eq!(clean_date_text("19-??"), "19-");
    }

    #[test]
    fn test_expands_month_abbreviations() {
        assert_eq!(clean_date_text("2000-Mar 2000-Apr"), "2000-march 2000-april");
        assert_eq!(clean_date_text("Sept. 1950"), "september 1950");
        assert_eq!(clean_date_text("Sep 1950"), "september 1950");
        assert_eq!(clean_date_text("1950 Dec 25"), "1950 december 25");
    }

    #[test]
    fn test_does_not_touch_full_month_names() {
        assert_eq!(clean_date_text("January 1950"), "january 1950");
        assert_eq!(clean_date_text("may 1950"), "may 1950");
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let samples = [
            "ca. 1950s",
            "[Between 1900 and 2000]",
            "18---19--",
            "19-??",
            "2006-01 to 2006-12-16",
            "Sept. 5, 1950",
            "c[a 1950",
            "  1950 ,  1960 ",
            "unknown",
            "",
        ];
        for sample in samples {
            let once = clean_date_text(sample);
            assert_eq!(clean_date_text(&once), once, "input: {sample:?}");
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("1950 march 5"), "1950 March 5");
        assert_eq!(title_case("september 1950"), "September 1950");
        assert_eq!(title_case("1950-march"), "1950-March");
    }
}
