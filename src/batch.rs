//! CSV batch driver around the normalizer.
//!
//! Reads one column of date strings from a CSV file, normalizes every
//! non-blank cell in parallel, and writes the AtoM start/end columns plus
//! an optional log of the strings that could not be normalized.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use indicatif::ProgressBar;
use log::{debug, warn};
use rayon::prelude::*;

use crate::normalize::{NormalizationResult, NormalizeError, Normalizer};

/// Header line of the error log.
pub const ERROR_LOG_HEADER: &str = "invalidDates";

/// Per-input outcome of a batch run, in input order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<NormalizationResult>,
    pub failures: Vec<(String, NormalizeError)>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.results.len() + self.failures.len()
    }

    /// The raw strings that failed, in input order.
    pub fn failed_inputs(&self) -> Vec<&str> {
        self.failures.iter().map(|(input, _)| input.as_str()).collect()
    }
}

/// Read the date strings from `column` of the CSV at `path`.
///
/// Cells are trimmed and blank cells skipped. Rows may be ragged: extra
/// fields are ignored and a short row simply has no date. Rows the CSV
/// reader cannot decode are logged and skipped; a missing column is an
/// error.
pub fn read_date_strings(path: &Path, column: &str) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open input CSV {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header from {}", path.display()))?;
    let idx = headers.iter().position(|h| h == column).ok_or_else(|| {
        anyhow!(
            "Date string column \"{}\" not found in CSV, if you are using a custom column name \
             for your date strings, use the -c option to specify the custom name.",
            column
        )
    })?;

    let mut dates = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping unreadable row {} in {}: {}", row + 2, path.display(), e);
                continue;
            }
        };
        let value = record.get(idx).unwrap_or("").trim();
        if !value.is_empty() {
            dates.push(value.to_string());
        }
    }
    Ok(dates)
}

/// Normalize every input in parallel, keeping input order.
pub fn normalize_all(
    normalizer: &Normalizer<'_>,
    inputs: &[String],
    progress: &ProgressBar,
) -> BatchOutcome {
    let outcomes: Vec<Result<NormalizationResult, (String, NormalizeError)>> = inputs
        .par_iter()
        .map(|input| {
            let outcome = normalizer
                .normalize(input)
                .map_err(|e| (input.clone(), e));
            progress.inc(1);
            outcome
        })
        .collect();

    let mut batch = BatchOutcome::default();
    for outcome in outcomes {
        match outcome {
            Ok(result) => batch.results.push(result),
            Err((input, e)) => {
                debug!("{}", e);
                batch.failures.push((input, e));
            }
        }
    }
    batch
}

/// Write results with the `originalDateString,startDate,endDate` header.
pub fn write_results(path: &Path, results: &[NormalizationResult]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create output CSV {}", path.display()))?;

    if results.is_empty() {
        writer.write_record(["originalDateString", "startDate", "endDate"])?;
    }
    for result in results {
        writer
            .serialize(result)
            .with_context(|| format!("Failed to write row for {:?}", result.original))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the failed inputs, one per line, under [`ERROR_LOG_HEADER`].
pub fn write_error_log(path: &Path, failed: &[&str]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create error log {}", path.display()))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "{}", ERROR_LOG_HEADER)?;
    for input in failed {
        writeln!(out, "{}", input)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("input.csv");
        fs::write(&path, content).expect("Failed to write input CSV");
        path
    }

    #[test]
    fn test_read_skips_blank_cells_and_trims() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "Title,Dates\na, 1950 \nb,\nc,   \nd,195-\n");
        let dates = read_date_strings(&path, "Dates").unwrap();
        assert_eq!(dates, vec!["1950".to_string(), "195-".to_string()]);
    }

    #[test]
    fn test_read_keeps_dates_from_ragged_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "Identifier,Title,Dates\nA,Letters,1950\nB,Notes,1960,extra note\nC,Map\nD,Plans,1970\n",
        );
        let dates = read_date_strings(&path, "Dates").unwrap();
        assert_eq!(dates, vec!["1950", "1960", "1970"]);
    }

    #[test]
    fn test_read_missing_column_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "Title,When\na,1950\n");
        let err = read_date_strings(&path, "Dates").unwrap_err();
        assert!(err.to_string().contains("\"Dates\" not found"));
    }

    #[test]
    fn test_normalize_all_keeps_input_order() {
        let inputs: Vec<String> = ["1950", "unknown", "195-", "0500", "After 1900"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let outcome = normalize_all(&Normalizer::default(), &inputs, &ProgressBar::hidden());

        let originals: Vec<&str> = outcome.results.iter().map(|r| r.original.as_str()).collect();
        assert_eq!(originals, vec!["1950", "195-", "After 1900"]);
        assert_eq!(outcome.failed_inputs(), vec!["unknown", "0500"]);
        assert_eq!(outcome.total(), 5);
    }

    #[test]
    fn test_write_results_leaves_unbounded_cells_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let normalizer = Normalizer::default();
        let results = vec![
            normalizer.normalize("Before 1900").unwrap(),
            normalizer.normalize("1950").unwrap(),
        ];
        write_results(&path, &results).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "originalDateString,startDate,endDate\n\
             Before 1900,,1900-01-01\n\
             1950,1950-01-01,1950-12-31\n"
        );
    }

    #[test]
    fn test_write_results_header_only_when_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_results(&path, &[]).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "originalDateString,startDate,endDate\n"
        );
    }

    #[test]
    fn test_write_error_log() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("errors.txt");
        write_error_log(&path, &["unknown", "0500"]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "invalidDates\nunknown\n0500\n");
    }
}
