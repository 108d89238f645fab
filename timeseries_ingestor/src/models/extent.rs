//! Min/max bounds used to size shared chart scales.

use serde::{Deserialize, Serialize};

use crate::models::series::Series;

/// Inclusive bounds of one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent<T> {
    pub min: T,
    pub max: T,
}

impl<T: Copy + PartialOrd> Extent<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Bounds of `items`, or `None` for an empty iterator.
    ///
    /// Incomparable items (NaN) never replace a bound.
    pub fn spanning<I: IntoIterator<Item = T>>(items: I) -> Option<Self> {
        items.into_iter().fold(None, |acc, item| match acc {
            None => Some(Self::new(item, item)),
            Some(e) => Some(e.include(item)),
        })
    }

    fn include(self, item: T) -> Self {
        Self {
            min: if item < self.min { item } else { self.min },
            max: if item > self.max { item } else { self.max },
        }
    }
}

impl Extent<f64> {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Time bounds over every point of every series.
pub fn time_extent<'a, I>(series: I) -> Option<Extent<i64>>
where
    I: IntoIterator<Item = &'a Series>,
{
    Extent::spanning(series.into_iter().flat_map(|s| s.points.iter().map(|p| p.time)))
}

/// Value bounds over every non-null value of every series.
pub fn value_extent<'a, I>(series: I) -> Option<Extent<f64>>
where
    I: IntoIterator<Item = &'a Series>,
{
    Extent::spanning(series.into_iter().flat_map(|s| s.values()).filter(|v| !v.is_nan()))
}

impl From<Extent<i64>> for Extent<f64> {
    fn from(e: Extent<i64>) -> Self {
        Extent::new(e.min as f64, e.max as f64)
    }
}
