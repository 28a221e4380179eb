//! HTTP download of the flight CSV.
//!
//! Fetch failures (and an upstream returning no usable data) are handled by
//! a bounded, explicit retry here rather than anywhere deeper in the
//! pipeline: once the text is in hand, ingest and aggregation are pure and
//! never re-fetch on their own.

use reqwest::blocking::Client;

use crate::error::AppError;

/// Fetch the CSV body as text, retrying up to `retries` additional times.
pub fn fetch_csv_text(url: &str, retries: usize) -> Result<String, AppError> {
    let client = Client::new();

    let mut last_err = None;
    for _attempt in 0..=retries {
        match try_fetch(&client, url) {
            Ok(text) => return Ok(text),
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.unwrap_or_else(|| AppError::runtime(format!("CSV fetch failed for {url}."))))
}

fn try_fetch(client: &Client, url: &str) -> Result<String, AppError> {
    let resp = client
        .get(url)
        .send()
        .map_err(|e| AppError::runtime(format!("CSV fetch failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(AppError::runtime(format!(
            "CSV fetch failed with status {}.",
            resp.status()
        )));
    }

    resp.text()
        .map_err(|e| AppError::runtime(format!("Failed to read CSV body: {e}")))
}
