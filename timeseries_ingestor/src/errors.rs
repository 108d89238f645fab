use thiserror::Error;

/// The error type for decoding and aggregating dense series.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SeriesError {
    /// The payload is structurally invalid (non-positive period, missing data array, overflow).
    #[error("Malformed payload: {reason}")]
    MalformedPayload { reason: String },

    /// A single request failed. Absorbed by the aggregator as an absent series.
    #[error("Request for {key} failed: {reason}")]
    RequestFailed { key: String, reason: String },

    /// Every request settled without producing a series.
    #[error("No data available: all {requested} requests failed")]
    NoDataAvailable { requested: usize },

    /// The canonical key list named the same key twice.
    #[error("Duplicate key in canonical order: {key}")]
    DuplicateKey { key: String },

    /// A completion arrived for a key that was never requested.
    #[error("Unknown key: {key}")]
    UnknownKey { key: String },

    /// A completion arrived for a key that has already settled.
    #[error("Key {key} has already settled")]
    AlreadySettled { key: String },

    /// Finalize was called while requests were still outstanding.
    #[error("{outstanding} requests have not settled yet")]
    NotSettled { outstanding: usize },
}

impl SeriesError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        SeriesError::MalformedPayload {
            reason: reason.into(),
        }
    }
}
