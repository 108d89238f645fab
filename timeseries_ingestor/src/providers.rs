//! Provider abstraction for dense series sources.
//!
//! This module defines the [`SeriesProvider`] trait, the single seam between
//! the aggregation pipeline and the network. A provider turns an endpoint
//! path (e.g. `/fans/facebook`) into the [`DensePayload`] the API returned
//! for it; decoding and ordering happen downstream.
//!
//! The trait is async and object safe, so providers can be selected at
//! runtime behind a `Box<dyn SeriesProvider>`.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use timeseries_ingestor::models::dense::DensePayload;
//! use timeseries_ingestor::providers::{ProviderError, SeriesProvider};
//!
//! struct FlatProvider;
//!
//! #[async_trait]
//! impl SeriesProvider for FlatProvider {
//!     async fn fetch_series(&self, _endpoint: &str) -> Result<DensePayload, ProviderError> {
//!         Ok(DensePayload::new(0, 86_400, 86_400, vec![Some(1.0), Some(1.0)]))
//!     }
//! }
//! ```

pub mod semetric_rest;

use async_trait::async_trait;
use shared_utils::env::EnvError;
use snafu::{Backtrace, Snafu};

use crate::{errors::SeriesError, models::dense::DensePayload};

/// Fetches one dense series per endpoint.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Fetches the dense payload behind `endpoint`.
    ///
    /// # Returns
    ///
    /// * `Ok(DensePayload)` - The payload of a successful API envelope.
    /// * `Err(ProviderError)` - Transport failure, non-2xx status, an
    ///   unsuccessful envelope or an unparseable body.
    async fn fetch_series(&self, endpoint: &str) -> Result<DensePayload, ProviderError>;
}

#[async_trait]
impl<P: SeriesProvider + ?Sized> SeriesProvider for Box<P> {
    async fn fetch_series(&self, endpoint: &str) -> Result<DensePayload, ProviderError> {
        (**self).fetch_series(endpoint).await
    }
}

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// missed environment variable.
    #[snafu(display("Missing API token: {source}"))]
    MissingToken {
        source: EnvError,
        backtrace: Backtrace,
    },

    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The configured base URL does not parse.
    #[snafu(display("Invalid base URL: {url}"))]
    InvalidBaseUrl { url: String, backtrace: Backtrace },
}

/// Errors that can occur within a `SeriesProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The API answered with a non-success HTTP status.
    #[snafu(display("API error ({status}): {message}"))]
    Api {
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// The envelope carried `success: false` or no response.
    #[snafu(display("API reported an unsuccessful response for {endpoint}: {message}"))]
    Unsuccessful {
        endpoint: String,
        message: String,
        backtrace: Backtrace,
    },

    /// The response body is not a valid dense envelope.
    #[snafu(display("Invalid response body: {source}"))]
    Decode {
        source: SeriesError,
        backtrace: Backtrace,
    },
}
