use log::info;

use snafu::prelude::*;

use vote_tally::{build_report, normalize_records, summarize, TallyError};

use crate::args::Args;

pub mod fetch;
pub mod io_csv;

// Where the downloaded raw results land when no --input is given.
pub const RAW_RESULTS_PATH: &str = "fake_va_elec_results.csv";

#[derive(Debug, Snafu)]
pub enum PipelineError {
    #[snafu(display("Error downloading raw results from {url}"))]
    Download { source: reqwest::Error, url: String },
    #[snafu(display("Download of {url} failed with HTTP status {status}"))]
    DownloadStatus { status: u16, url: String },
    #[snafu(display("Error saving downloaded results to {path}"))]
    SaveDownload {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening results file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading results record at line {lineno}"))]
    CsvRecordParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error writing report to {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error flushing report to {path}"))]
    ReportFlush {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Bad results data"))]
    Tally { source: TallyError },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Runs all the stages end to end: fetch (unless a local input is
/// given), parse, tally, report.
///
/// A single malformed record aborts the run before anything is written:
/// no partial report is ever produced.
pub fn run_pipeline(args: &Args) -> PipelineResult<()> {
    let input = match &args.input {
        Some(path) => path.clone(),
        None => {
            let url = args.url.as_deref().unwrap_or(fetch::DEFAULT_RESULTS_URL);
            info!("Downloading raw election data: {}", RAW_RESULTS_PATH);
            fetch::download_results(url, RAW_RESULTS_PATH)?;
            RAW_RESULTS_PATH.to_string()
        }
    };

    info!("Cleaning data from {}", input);
    let raw_records = io_csv::read_results(&input)?;
    let normalized = normalize_records(&raw_records).context(TallySnafu {})?;

    info!("Tallying votes and assigning winners...");
    let summaries = summarize(&normalized);
    let report = build_report(&summaries);

    info!("Generating report: {}", args.out);
    io_csv::write_report(&args.out, &report)?;
    info!(
        "Done: {} races, {} report rows",
        summaries.len(),
        report.len()
    );
    Ok(())
}
