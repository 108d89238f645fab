//! Multi-series aggregation.
//!
//! An [`Aggregator`] is created per render cycle with the canonical key
//! order (usually the endpoints in the order they were declared). Each
//! request completion is handed to [`Aggregator::settle`] as it arrives, in
//! whatever order the network delivers it. Once every key has settled,
//! successfully or not, [`Aggregator::finalize`] consumes the aggregator and
//! yields an immutable [`ResultSet`] ordered by the canonical keys.
//!
//! The join is a plain countdown: `outstanding` starts at the number of
//! keys and drops by one per settle. A failed request settles just like a
//! successful one, so one bad endpoint never holds back the others.

use std::fmt::Display;

use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;

use crate::{
    decode::decode,
    errors::SeriesError,
    models::{
        dense::DensePayload,
        extent::{Extent, time_extent, value_extent},
        series::Series,
    },
};

/// Countdown state reported after each settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Some requests are still in flight.
    Pending { outstanding: usize },
    /// Every request has settled; the aggregator can be finalized.
    Settled,
}

/// Collects decoded series while requests complete.
#[derive(Debug)]
pub struct Aggregator {
    keys: IndexSet<String>,
    settled: Vec<bool>,
    outstanding: usize,
    collected: Vec<(usize, Series)>,
    failures: Vec<SeriesError>,
}

impl Aggregator {
    /// Creates an aggregator expecting one completion per key.
    ///
    /// # Errors
    ///
    /// [`SeriesError::DuplicateKey`] if a key appears twice.
    pub fn new<I, S>(canonical_keys: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keys = IndexSet::new();
        for key in canonical_keys {
            let key = key.into();
            if keys.contains(&key) {
                return Err(SeriesError::DuplicateKey { key });
            }
            keys.insert(key);
        }
        let n = keys.len();
        Ok(Self {
            keys,
            settled: vec![false; n],
            outstanding: n,
            collected: Vec::with_capacity(n),
            failures: Vec::new(),
        })
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn is_settled(&self) -> bool {
        self.outstanding == 0
    }

    /// Requests that settled without producing a series, in settle order.
    pub fn failures(&self) -> &[SeriesError] {
        &self.failures
    }

    /// Records the completion of the request for `key`.
    ///
    /// A successful outcome is decoded immediately. Both a failed request and
    /// a payload that fails to decode leave the key without a series and are
    /// recorded as [`SeriesError::RequestFailed`].
    ///
    /// # Errors
    ///
    /// [`SeriesError::UnknownKey`] for a key that was not declared and
    /// [`SeriesError::AlreadySettled`] for a second completion of the same key.
    /// Neither changes the countdown.
    pub fn settle<E: Display>(
        &mut self,
        key: &str,
        outcome: Result<DensePayload, E>,
    ) -> Result<Progress, SeriesError> {
        let index = self
            .keys
            .get_index_of(key)
            .ok_or_else(|| SeriesError::UnknownKey {
                key: key.to_string(),
            })?;
        if self.settled[index] {
            return Err(SeriesError::AlreadySettled {
                key: key.to_string(),
            });
        }
        self.settled[index] = true;
        self.outstanding -= 1;

        let decoded = outcome
            .map_err(|e| e.to_string())
            .and_then(|payload| decode(&payload).map_err(|e| e.to_string()));
        match decoded {
            Ok(points) => {
                debug!(key, points = points.len(), "series settled");
                self.collected.push((index, Series::new(key, points)));
            }
            Err(reason) => {
                debug!(key, %reason, "request failed; series omitted");
                self.failures.push(SeriesError::RequestFailed {
                    key: key.to_string(),
                    reason,
                });
            }
        }

        Ok(if self.is_settled() {
            Progress::Settled
        } else {
            Progress::Pending {
                outstanding: self.outstanding,
            }
        })
    }

    /// Orders the collected series canonically and computes their extents.
    ///
    /// # Errors
    ///
    /// [`SeriesError::NotSettled`] while requests are outstanding and
    /// [`SeriesError::NoDataAvailable`] when no request produced a series.
    pub fn finalize(self) -> Result<ResultSet, SeriesError> {
        if !self.is_settled() {
            return Err(SeriesError::NotSettled {
                outstanding: self.outstanding,
            });
        }
        if self.collected.is_empty() {
            return Err(SeriesError::NoDataAvailable {
                requested: self.keys.len(),
            });
        }

        let mut collected = self.collected;
        collected.sort_by_key(|(index, _)| *index);
        let series: Vec<Series> = collected.into_iter().map(|(_, s)| s).collect();

        Ok(ResultSet::new(series))
    }
}

/// Finalized, canonically ordered series with their combined extents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    series: Vec<Series>,
    time_extent: Option<Extent<i64>>,
    value_extent: Option<Extent<f64>>,
}

impl ResultSet {
    fn new(series: Vec<Series>) -> Self {
        let time_extent = time_extent(&series);
        let value_extent = value_extent(&series);
        Self {
            series,
            time_extent,
            value_extent,
        }
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.name.as_str())
    }

    /// Bounds of every timestamp; `None` only if no series has any points.
    pub fn time_extent(&self) -> Option<Extent<i64>> {
        self.time_extent
    }

    /// Bounds of every non-null value; `None` if every value is a gap.
    pub fn value_extent(&self) -> Option<Extent<f64>> {
        self.value_extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::series::Point;
    use proptest::prelude::*;

    const WEEK: i64 = 604_800;
    const TOTAL: &str = "/fans/total";
    const FACEBOOK: &str = "/fans/facebook";

    fn payload(data: &[Option<f64>]) -> DensePayload {
        DensePayload::new(0, 1_209_600, WEEK, data.to_vec())
    }

    fn ok(data: &[Option<f64>]) -> Result<DensePayload, String> {
        Ok(payload(data))
    }

    fn failed() -> Result<DensePayload, String> {
        Err("503 Service Unavailable".to_string())
    }

    #[test]
    fn canonical_order_wins_over_arrival_order() {
        let mut agg = Aggregator::new([TOTAL, FACEBOOK]).unwrap();
        assert_eq!(
            agg.settle(FACEBOOK, ok(&[Some(10.0), Some(20.0), Some(30.0)])).unwrap(),
            Progress::Pending { outstanding: 1 }
        );
        assert_eq!(
            agg.settle(TOTAL, ok(&[Some(100.0), Some(200.0)])).unwrap(),
            Progress::Settled
        );

        let result = agg.finalize().unwrap();
        assert_eq!(result.names().collect::<Vec<_>>(), vec![TOTAL, FACEBOOK]);
        assert_eq!(
            result.series()[0].points,
            vec![Point::new(0, Some(100.0)), Point::new(604_800_000, Some(200.0))]
        );
        assert_eq!(
            result.series()[1].points,
            vec![
                Point::new(0, Some(10.0)),
                Point::new(604_800_000, Some(20.0)),
                Point::new(1_209_600_000, Some(30.0)),
            ]
        );
        assert_eq!(result.time_extent(), Some(Extent::new(0, 1_209_600_000)));
        assert_eq!(result.value_extent(), Some(Extent::new(10.0, 200.0)));
    }

    #[test]
    fn failed_request_is_absent_and_others_unaffected() {
        let mut agg = Aggregator::new(["/a", "/b", "/c"]).unwrap();
        agg.settle("/c", ok(&[Some(3.0)])).unwrap();
        agg.settle("/b", failed()).unwrap();
        agg.settle("/a", ok(&[Some(1.0)])).unwrap();

        assert_eq!(agg.failures().len(), 1);
        assert!(matches!(
            &agg.failures()[0],
            SeriesError::RequestFailed { key, .. } if key == "/b"
        ));

        let result = agg.finalize().unwrap();
        assert_eq!(result.names().collect::<Vec<_>>(), vec!["/a", "/c"]);
        assert_eq!(result.value_extent(), Some(Extent::new(1.0, 3.0)));
    }

    #[test]
    fn malformed_payload_counts_as_failed_request() {
        let mut agg = Aggregator::new(["/a", "/b"]).unwrap();
        agg.settle("/a", Ok::<_, String>(DensePayload::new(0, 0, 0, vec![Some(1.0)])))
            .unwrap();
        agg.settle("/b", ok(&[Some(2.0)])).unwrap();
        let result = agg.finalize().unwrap();
        assert_eq!(result.names().collect::<Vec<_>>(), vec!["/b"]);
    }

    #[test]
    fn all_failed_yields_no_data() {
        let mut agg = Aggregator::new(["/a", "/b"]).unwrap();
        agg.settle("/a", failed()).unwrap();
        agg.settle("/b", failed()).unwrap();
        assert_eq!(
            agg.finalize(),
            Err(SeriesError::NoDataAvailable { requested: 2 })
        );
    }

    #[test]
    fn no_keys_yields_no_data() {
        let agg = Aggregator::new(Vec::<String>::new()).unwrap();
        assert!(agg.is_settled());
        assert_eq!(
            agg.finalize(),
            Err(SeriesError::NoDataAvailable { requested: 0 })
        );
    }

    #[test]
    fn finalize_before_settle_is_rejected() {
        let mut agg = Aggregator::new(["/a", "/b"]).unwrap();
        agg.settle("/a", ok(&[Some(1.0)])).unwrap();
        assert_eq!(
            agg.finalize(),
            Err(SeriesError::NotSettled { outstanding: 1 })
        );
    }

    #[test]
    fn unknown_and_repeated_keys_do_not_move_the_countdown() {
        let mut agg = Aggregator::new(["/a", "/b"]).unwrap();
        assert!(matches!(
            agg.settle("/zzz", ok(&[])),
            Err(SeriesError::UnknownKey { .. })
        ));
        agg.settle("/a", ok(&[Some(1.0)])).unwrap();
        assert!(matches!(
            agg.settle("/a", ok(&[Some(1.0)])),
            Err(SeriesError::AlreadySettled { .. })
        ));
        assert_eq!(agg.outstanding(), 1);
    }

    #[test]
    fn duplicate_canonical_key_is_rejected() {
        assert!(matches!(
            Aggregator::new(["/a", "/a"]),
            Err(SeriesError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn all_null_series_has_no_value_extent() {
        let mut agg = Aggregator::new(["/a"]).unwrap();
        agg.settle("/a", ok(&[None, None])).unwrap();
        let result = agg.finalize().unwrap();
        assert_eq!(result.value_extent(), None);
        assert_eq!(result.time_extent(), Some(Extent::new(0, 604_800_000)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]
        #[test]
        fn order_is_independent_of_completion_order(
            arrival in Just((0..8usize).collect::<Vec<_>>()).prop_shuffle(),
            failing in proptest::collection::hash_set(0..8usize, 0..4),
        ) {
            let keys: Vec<String> = (0..8).map(|i| format!("/series/{i}")).collect();
            let mut agg = Aggregator::new(keys.clone()).unwrap();
            for i in &arrival {
                let outcome = if failing.contains(i) { failed() } else { ok(&[Some(*i as f64)]) };
                agg.settle(&keys[*i], outcome).unwrap();
            }
            let result = agg.finalize().unwrap();
            let expected: Vec<&str> = keys
                .iter()
                .enumerate()
                .filter(|(i, _)| !failing.contains(i))
                .map(|(_, k)| k.as_str())
                .collect();
            prop_assert_eq!(result.names().collect::<Vec<_>>(), expected);
        }
    }
}
