use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use timeseries_ingestor::{
    SeriesError,
    models::{dense::DensePayload, extent::Extent, series::Point},
    providers::{ApiSnafu, ProviderError, SeriesProvider},
    requests::fetch_all,
};

const WEEK: i64 = 604_800;

/// Answers each endpoint after a fixed delay, with a canned outcome.
struct ScriptedProvider {
    script: HashMap<String, (Duration, Option<Vec<Option<f64>>>)>,
}

impl ScriptedProvider {
    fn new() -> Self {
        Self {
            script: HashMap::new(),
        }
    }

    fn ok(mut self, endpoint: &str, delay_ms: u64, data: &[Option<f64>]) -> Self {
        self.script.insert(
            endpoint.to_string(),
            (Duration::from_millis(delay_ms), Some(data.to_vec())),
        );
        self
    }

    fn failing(mut self, endpoint: &str, delay_ms: u64) -> Self {
        self.script
            .insert(endpoint.to_string(), (Duration::from_millis(delay_ms), None));
        self
    }
}

#[async_trait]
impl SeriesProvider for ScriptedProvider {
    async fn fetch_series(&self, endpoint: &str) -> Result<DensePayload, ProviderError> {
        let Some((delay, data)) = self.script.get(endpoint) else {
            return ApiSnafu {
                status: 404u16,
                message: format!("no such endpoint {endpoint}"),
            }
            .fail();
        };
        tokio::time::sleep(*delay).await;
        match data {
            Some(data) => Ok(DensePayload::new(0, 2 * WEEK, WEEK, data.clone())),
            None => ApiSnafu {
                status: 503u16,
                message: "Service Unavailable",
            }
            .fail(),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn later_declared_endpoint_finishing_first_keeps_canonical_order() {
    let provider = ScriptedProvider::new()
        .ok("/fans/total", 200, &[Some(100.0), Some(200.0)])
        .ok("/fans/facebook", 10, &[Some(10.0), Some(20.0), Some(30.0)]);

    let outcome = fetch_all(&provider, ["/fans/total", "/fans/facebook"])
        .await
        .unwrap();
    assert_eq!(outcome.requested, 2);
    assert_eq!(outcome.succeeded(), 2);

    let result = outcome.result.unwrap();
    assert_eq!(
        result.names().collect::<Vec<_>>(),
        vec!["/fans/total", "/fans/facebook"]
    );
    assert_eq!(
        result.series()[0].points,
        vec![
            Point::new(0, Some(100.0)),
            Point::new(604_800_000, Some(200.0))
        ]
    );
    assert_eq!(result.time_extent(), Some(Extent::new(0, 1_209_600_000)));
    assert_eq!(result.value_extent(), Some(Extent::new(10.0, 200.0)));
}

#[tokio::test(start_paused = true)]
async fn slow_failure_does_not_block_and_is_omitted() {
    let provider = ScriptedProvider::new()
        .ok("/fans/total", 5, &[Some(1.0)])
        .failing("/fans/twitter", 1_000)
        .ok("/fans/youtube", 50, &[Some(2.0), None]);

    let outcome = fetch_all(&provider, ["/fans/total", "/fans/twitter", "/fans/youtube"])
        .await
        .unwrap();
    assert_eq!(outcome.failures.len(), 1);
    assert!(matches!(
        &outcome.failures[0],
        SeriesError::RequestFailed { key, reason } if key == "/fans/twitter" && reason.contains("503")
    ));

    let result = outcome.result.unwrap();
    assert_eq!(
        result.names().collect::<Vec<_>>(),
        vec!["/fans/total", "/fans/youtube"]
    );
    assert_eq!(result.value_extent(), Some(Extent::new(1.0, 2.0)));
}

#[tokio::test(start_paused = true)]
async fn every_request_failing_reports_no_data() {
    let provider = ScriptedProvider::new()
        .failing("/fans/total", 5)
        .failing("/fans/facebook", 1);

    let outcome = fetch_all(&provider, ["/fans/total", "/fans/facebook", "/fans/unknown"])
        .await
        .unwrap();
    assert_eq!(outcome.succeeded(), 0);
    assert_eq!(
        outcome.result.unwrap_err(),
        SeriesError::NoDataAvailable { requested: 3 }
    );
}

#[tokio::test(start_paused = true)]
async fn order_is_stable_across_timing_permutations() {
    let endpoints = ["/a", "/b", "/c", "/d"];
    let delays: [[u64; 4]; 4] = [[1, 2, 3, 4], [4, 3, 2, 1], [2, 4, 1, 3], [3, 1, 4, 2]];

    for delay in delays {
        let provider = endpoints
            .iter()
            .zip(delay)
            .fold(ScriptedProvider::new(), |p, (e, d)| p.ok(e, d, &[Some(d as f64)]));
        let result = fetch_all(&provider, endpoints).await.unwrap().result.unwrap();
        assert_eq!(result.names().collect::<Vec<_>>(), endpoints.to_vec());
    }
}

#[tokio::test]
async fn duplicate_endpoints_are_rejected_up_front() {
    let provider = ScriptedProvider::new();
    let err = fetch_all(&provider, ["/a", "/a"]).await.unwrap_err();
    assert!(matches!(err, SeriesError::DuplicateKey { .. }));
}

#[tokio::test]
async fn boxed_providers_are_accepted() {
    let provider: Box<dyn SeriesProvider> =
        Box::new(ScriptedProvider::new().ok("/a", 0, &[Some(1.0)]));
    let outcome = fetch_all(&provider, ["/a"]).await.unwrap();
    assert_eq!(outcome.result.unwrap().series().len(), 1);
}
