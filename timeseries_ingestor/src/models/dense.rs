//! Wire shapes of the dense time-series API.
//!
//! A dense series is transmitted as a start time, an end time, a sampling
//! period (all UNIX seconds) and a flat array of values. Timestamps are not
//! sent per point; see [`crate::decode`] for how they are reconstructed.

use serde::{Deserialize, Serialize};

/// One dense series as returned in the `response` field of an [`Envelope`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensePayload {
    /// First sample, UNIX seconds.
    pub start_time: i64,
    /// Last sample as reported by the API, UNIX seconds. Informational only.
    pub end_time: i64,
    /// Sampling period in seconds.
    pub period: i64,
    /// Sample values in chronological order; `null` marks a gap.
    ///
    /// Kept optional so a payload without the array can reach the decoder
    /// and be rejected there as malformed.
    #[serde(default)]
    pub data: Option<Vec<Option<f64>>>,
}

impl DensePayload {
    pub fn new(start_time: i64, end_time: i64, period: i64, data: Vec<Option<f64>>) -> Self {
        Self {
            start_time,
            end_time,
            period,
            data: Some(data),
        }
    }
}

/// The success/failure wrapper around every API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub response: Option<DensePayload>,
}

impl Envelope {
    /// Unwraps the payload, or `None` when the API reported failure or sent no body.
    pub fn into_payload(self) -> Option<DensePayload> {
        if self.success { self.response } else { None }
    }
}
