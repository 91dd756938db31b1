use std::path::Path;

use anyhow::{Result, bail};
use clap::Parser;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::info;

use atom_date_normalizer::batch::{normalize_all, read_date_strings, write_error_log, write_results};
use atom_date_normalizer::cli::Cli;
use atom_date_normalizer::normalize::{Normalizer, SaneYearWindow};

fn main() -> std::io::Result<()> {
    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let multi = init_logging()?;

    if cli.min_year > cli.max_year {
        bail!(
            "--min-year ({}) must not be greater than --max-year ({})",
            cli.min_year,
            cli.max_year
        );
    }
    let normalizer =
        Normalizer::default().with_window(SaneYearWindow::new(cli.min_year, cli.max_year));

    let inputs = read_date_strings(Path::new(&cli.csv), &cli.column)?;
    info!("Read {} date strings from {}", inputs.len(), cli.csv);

    let progress_bar = multi.add(create_progress_bar(inputs.len()));
    let outcome = normalize_all(&normalizer, &inputs, &progress_bar);
    progress_bar.finish_with_message("Normalization complete!");

    write_results(Path::new(&cli.output), &outcome.results)?;
    info!("Wrote {} rows to {}", outcome.results.len(), cli.output);

    if let Some(error_log) = &cli.error_log {
        write_error_log(Path::new(error_log), &outcome.failed_inputs())?;
        info!("Wrote {} failed inputs to {}", outcome.failures.len(), error_log);
    }

    info!(
        "Normalized {} of {} date strings ({} failed)",
        outcome.results.len(),
        outcome.total(),
        outcome.failures.len()
    );
    Ok(())
}

/// Route `log` output through the progress bars so lines are not torn.
fn init_logging() -> Result<MultiProgress> {
    let logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).build();
    let level = logger.filter();
    let multi = MultiProgress::new();
    LogWrapper::new(multi.clone(), logger).try_init()?;
    log::set_max_level(level);
    Ok(multi)
}

fn create_progress_bar(total: usize) -> ProgressBar {
    let progress_bar = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} dates normalized ({eta})")
    {
        progress_bar.set_style(style.progress_chars("#>-"));
    }
    progress_bar
}
