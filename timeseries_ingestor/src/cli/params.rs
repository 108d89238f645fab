use std::{fs, path::Path};

use crate::{
    config::{ChartConfig, ConfigError},
    decode::{decode, parse_envelope},
    errors::SeriesError,
    models::series::Point,
    requests::BatchOutcome,
};

/// Splits a comma-separated endpoint list, dropping blanks.
pub fn parse_endpoint_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with('/') {
                s.to_string()
            } else {
                format!("/{s}")
            }
        })
        .collect()
}

/// Replaces the configured endpoints with `list` and revalidates the config.
pub fn override_endpoints(config: &mut ChartConfig, list: &str) -> Result<(), ConfigError> {
    config.endpoints = parse_endpoint_list(list);
    config.validate()
}

/// Lines reported on stderr once a batch has settled: one `ERROR:` line per
/// failed endpoint, the `SUMMARY:` line, and the rendered series in order.
pub fn report_lines(outcome: &BatchOutcome) -> Vec<String> {
    let mut lines: Vec<String> = outcome
        .failures
        .iter()
        .map(|failure| format!("ERROR: {failure}"))
        .collect();
    lines.push(format!(
        "SUMMARY: {} succeeded, {} failed",
        outcome.succeeded(),
        outcome.failures.len()
    ));
    if let Ok(result) = &outcome.result {
        lines.push(format!("SERIES: {}", result.names().collect::<Vec<_>>().join(", ")));
    }
    lines
}

/// Reads a saved response envelope and decodes its payload.
pub fn decode_envelope_file(path: &Path) -> Result<Vec<Point>, DecodeFileError> {
    let body = fs::read(path)?;
    let payload = parse_envelope(&body)?
        .into_payload()
        .ok_or(DecodeFileError::Unsuccessful)?;
    Ok(decode(&payload)?)
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error("Response envelope reports failure")]
    Unsuccessful,
}
