//! Dense series decoding.
//!
//! A [`DensePayload`] carries no per-point timestamps. The timestamp of the
//! sample at index `i` is `start_time + i * period`, converted from UNIX
//! seconds to milliseconds. The value array is authoritative: exactly
//! `data.len()` points are produced regardless of what `end_time` implies.

use tracing::debug;

use crate::{
    errors::SeriesError,
    models::{
        dense::{DensePayload, Envelope},
        series::Point,
    },
};

const MILLIS_PER_SEC: i64 = 1_000;

/// Converts a dense payload into explicitly timestamped points.
///
/// Gaps (`null` values) are kept as `None` so that indices and timestamps
/// stay aligned.
///
/// # Errors
///
/// [`SeriesError::MalformedPayload`] when `period <= 0`, the `data` array is
/// missing, or a timestamp does not fit in `i64` milliseconds.
pub fn decode(payload: &DensePayload) -> Result<Vec<Point>, SeriesError> {
    if payload.period <= 0 {
        return Err(SeriesError::malformed(format!(
            "period must be > 0, got {}",
            payload.period
        )));
    }
    let data = payload
        .data
        .as_ref()
        .ok_or_else(|| SeriesError::malformed("missing data array"))?;

    let overflow = || SeriesError::malformed("timestamp out of range");
    let start_ms = payload.start_time.checked_mul(MILLIS_PER_SEC).ok_or_else(overflow)?;
    let period_ms = payload.period.checked_mul(MILLIS_PER_SEC).ok_or_else(overflow)?;

    if let Some(implied) = implied_len(payload) {
        if implied != data.len() {
            debug!(
                start_time = payload.start_time,
                end_time = payload.end_time,
                period = payload.period,
                implied,
                actual = data.len(),
                "dense payload length disagrees with end_time"
            );
        }
    }

    data.iter()
        .enumerate()
        .map(|(i, value)| -> Result<Point, SeriesError> {
            let time = i64::try_from(i)
                .ok()
                .and_then(|i| i.checked_mul(period_ms))
                .and_then(|offset| start_ms.checked_add(offset))
                .ok_or_else(overflow)?;
            Ok(Point::new(time, *value))
        })
        .collect()
}

/// Number of samples `end_time` implies, when it is not before `start_time`.
fn implied_len(payload: &DensePayload) -> Option<usize> {
    let span = payload.end_time.checked_sub(payload.start_time)?;
    if span < 0 {
        return None;
    }
    let samples = (span / payload.period).checked_add(1)?;
    usize::try_from(samples).ok()
}

/// Parses a raw API response body into its envelope.
pub fn parse_envelope(body: &[u8]) -> Result<Envelope, SeriesError> {
    serde_json::from_slice(body).map_err(|e| SeriesError::malformed(e.to_string()))
}
