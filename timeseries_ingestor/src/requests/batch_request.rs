use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{info, instrument};

use crate::{
    aggregate::{Aggregator, Progress, ResultSet},
    errors::SeriesError,
    providers::SeriesProvider,
};

/// Everything a caller needs after a batch of requests has settled.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Number of endpoints requested.
    pub requested: usize,
    /// One [`SeriesError::RequestFailed`] per endpoint that produced no series.
    pub failures: Vec<SeriesError>,
    /// The finalized series, or [`SeriesError::NoDataAvailable`].
    pub result: Result<ResultSet, SeriesError>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.requested - self.failures.len()
    }
}

/// Fetches every endpoint concurrently and aggregates the results.
///
/// All requests are started up front and polled on the calling task; each
/// completion is settled into a fresh [`Aggregator`] as soon as it arrives.
/// The call returns once every request has settled, successfully or not.
/// Nothing is retried.
///
/// # Errors
///
/// [`SeriesError::DuplicateKey`] if `endpoints` names the same endpoint twice.
#[instrument(skip_all, fields(requested = tracing::field::Empty))]
pub async fn fetch_all<P, I, S>(provider: &P, endpoints: I) -> Result<BatchOutcome, SeriesError>
where
    P: SeriesProvider + ?Sized,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let endpoints: Vec<String> = endpoints.into_iter().map(Into::into).collect();
    let mut aggregator = Aggregator::new(endpoints.iter().cloned())?;
    tracing::Span::current().record("requested", endpoints.len());

    let mut in_flight: FuturesUnordered<_> = endpoints
        .iter()
        .map(|endpoint| async move {
            let outcome = provider.fetch_series(endpoint).await;
            (endpoint.as_str(), outcome)
        })
        .collect();

    while let Some((endpoint, outcome)) = in_flight.next().await {
        if aggregator.settle(endpoint, outcome)? == Progress::Settled {
            break;
        }
    }

    let failures = aggregator.failures().to_vec();
    info!(
        succeeded = endpoints.len() - failures.len(),
        failed = failures.len(),
        "all requests settled"
    );

    Ok(BatchOutcome {
        requested: endpoints.len(),
        failures,
        result: aggregator.finalize(),
    })
}
