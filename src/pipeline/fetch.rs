// Downloads the raw results CSV.

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::info;
use reqwest::blocking::Client;
use snafu::prelude::*;

use crate::pipeline::*;

/// The published spreadsheet with the fake Virginia election results.
pub const DEFAULT_RESULTS_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vR66f495XUWKbhP48Eh1PtQ9mN_pbHTh2m-nma9sv0banZSORUJKcugDNKFzuUBhJ5tcsUMN6moYAHb/pub?gid=0&single=true&output=csv";

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches `url` and saves the body to `path`.
///
/// The download is skipped when `path` already exists, so repeated runs
/// keep working on the same snapshot of the data.
pub fn download_results(url: &str, path: &str) -> PipelineResult<()> {
    if Path::new(path).exists() {
        info!("Raw results file {} already present, not downloading", path);
        return Ok(());
    }

    let client = Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .context(DownloadSnafu { url })?;
    let response = client.get(url).send().context(DownloadSnafu { url })?;
    ensure!(
        response.status().is_success(),
        DownloadStatusSnafu {
            status: response.status().as_u16(),
            url,
        }
    );
    let body = response.text().context(DownloadSnafu { url })?;
    fs::write(path, body).context(SaveDownloadSnafu { path })?;
    info!("Saved raw results to {}", path);
    Ok(())
}
