//! Encoding finalized series into chart coordinates.
//!
//! The chart follows the usual margin convention: the drawable area is the
//! outer size minus the margins, x grows to the right from `0` to the inner
//! width, y grows downwards so values map onto `[inner_height, 0]`.
//!
//! Lines are broken at gaps. A run of consecutive non-null points becomes
//! one segment; a `null` value ends the current segment and is never
//! interpolated across.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    aggregate::ResultSet,
    models::{
        extent::{Extent, time_extent, value_extent},
        series::Series,
    },
};

/// Space reserved around the plot for axes and labels, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 40.0,
            right: 20.0,
            bottom: 40.0,
            left: 70.0,
        }
    }
}

/// Whether all series share one pair of axes or each gets its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AxisMode {
    #[default]
    Shared,
    PerSeries,
}

impl fmt::Display for AxisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AxisMode::Shared => "shared",
            AxisMode::PerSeries => "per-series",
        })
    }
}

impl FromStr for AxisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shared" => Ok(AxisMode::Shared),
            "per-series" | "per_series" | "separate" => Ok(AxisMode::PerSeries),
            other => Err(format!("Invalid axis mode: {other} (expected shared or per-series)")),
        }
    }
}

/// Maps a numeric domain linearly onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: Extent<f64>,
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: Extent<f64>, range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Projects `x`. A single-valued domain maps to the middle of the range.
    pub fn apply(&self, x: f64) -> f64 {
        let (r0, r1) = self.range;
        let span = self.domain.span();
        if span == 0.0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (x - self.domain.min) / span * (r1 - r0)
    }
}

/// A series projected into chart coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedSeries {
    pub name: String,
    /// Time domain of the x axis this series was drawn against.
    pub x_domain: Option<Extent<i64>>,
    /// Value domain of the y axis this series was drawn against.
    pub y_domain: Option<Extent<f64>>,
    /// Polylines of `(x, y)` pixel coordinates, split at gaps.
    pub segments: Vec<Vec<(f64, f64)>>,
}

/// Outer chart size and margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub margin: Margin,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 500.0,
            margin: Margin::default(),
        }
    }
}

impl ChartLayout {
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// Projects every series of `result` onto the plot area.
    ///
    /// With [`AxisMode::Shared`] every series uses the extents of the whole
    /// result set, so lines are directly comparable. With
    /// [`AxisMode::PerSeries`] each series is scaled to its own extents.
    pub fn encode(&self, result: &ResultSet, mode: AxisMode) -> Vec<EncodedSeries> {
        result
            .series()
            .iter()
            .map(|series| match mode {
                AxisMode::Shared => {
                    self.encode_series(series, result.time_extent(), result.value_extent())
                }
                AxisMode::PerSeries => self.encode_series(
                    series,
                    time_extent([series]),
                    value_extent([series]),
                ),
            })
            .collect()
    }

    fn encode_series(
        &self,
        series: &Series,
        x_domain: Option<Extent<i64>>,
        y_domain: Option<Extent<f64>>,
    ) -> EncodedSeries {
        let segments = match (x_domain, y_domain) {
            (Some(x), Some(y)) => {
                let x_scale = LinearScale::new(x.into(), (0.0, self.inner_width()));
                let y_scale = LinearScale::new(y, (self.inner_height(), 0.0));
                split_at_gaps(series, &x_scale, &y_scale)
            }
            _ => Vec::new(),
        };
        EncodedSeries {
            name: series.name.clone(),
            x_domain,
            y_domain,
            segments,
        }
    }
}

fn split_at_gaps(series: &Series, x: &LinearScale, y: &LinearScale) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for point in &series.points {
        match point.value {
            Some(value) if !value.is_nan() => {
                current.push((x.apply(point.time as f64), y.apply(value)));
            }
            _ => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}
