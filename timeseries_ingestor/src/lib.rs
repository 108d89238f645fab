//! Fetches dense-encoded metric time series and prepares them for line charts.
//!
//! The pipeline, leaf first:
//!
//! 1. [`providers::SeriesProvider`] fetches one [`models::dense::DensePayload`] per endpoint.
//! 2. [`decode::decode`] turns a payload into timestamped [`models::series::Point`]s.
//! 3. [`aggregate::Aggregator`] collects the series as they complete and
//!    finalizes them into a canonically ordered [`aggregate::ResultSet`] with
//!    shared extents; [`requests::fetch_all`] drives the whole batch.
//! 4. [`layout::ChartLayout`] projects the result set into pixel space and
//!    [`io::sink::DataSink`] hands it to a renderer.

pub mod aggregate;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod decode;
pub mod errors;
pub mod io;
pub mod layout;
pub mod models;
pub mod providers;
pub mod requests;

pub use aggregate::{Aggregator, Progress, ResultSet};
pub use errors::SeriesError;
