use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use snafu::{Backtrace, ResultExt, Snafu};
use tokio::io::AsyncWriteExt;

use crate::{
    aggregate::ResultSet,
    layout::{AxisMode, ChartLayout, EncodedSeries},
    models::{extent::Extent, series::Series},
};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// An error occurred while converting the result set into the destination format.
    #[snafu(display("Data conversion error: {source}"))]
    Conversion {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// A generic I/O error.
    #[snafu(display("I/O error writing {target}: {source}"))]
    Io {
        target: String,
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

/// Everything a renderer needs to draw the chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartDocument {
    pub title: String,
    pub axis: AxisMode,
    pub layout: ChartLayout,
    pub time_extent: Option<Extent<i64>>,
    pub value_extent: Option<Extent<f64>>,
    pub series: Vec<Series>,
    pub encoded: Vec<EncodedSeries>,
}

impl ChartDocument {
    pub fn new(title: impl Into<String>, result: &ResultSet, layout: ChartLayout, axis: AxisMode) -> Self {
        Self {
            title: title.into(),
            axis,
            layout,
            time_extent: result.time_extent(),
            value_extent: result.value_extent(),
            series: result.series().to_vec(),
            encoded: layout.encode(result, axis),
        }
    }
}

#[async_trait]
pub trait DataSink {
    /// The type of output returned after a successful write operation.
    ///
    /// A file sink returns the path it wrote, a stdout sink returns the
    /// number of bytes written.
    type Output;

    /// Writes a finalized chart document to the destination.
    async fn write(&self, document: &ChartDocument) -> Result<Self::Output, SinkError>;
}

/// Writes chart documents as pretty-printed JSON.
#[derive(Debug, Clone)]
pub enum JsonSink {
    Stdout,
    File(PathBuf),
}

#[async_trait]
impl DataSink for JsonSink {
    type Output = Option<PathBuf>;

    async fn write(&self, document: &ChartDocument) -> Result<Self::Output, SinkError> {
        let mut json = serde_json::to_vec_pretty(document).context(ConversionSnafu)?;
        json.push(b'\n');

        match self {
            JsonSink::Stdout => {
                let mut stdout = tokio::io::stdout();
                stdout
                    .write_all(&json)
                    .await
                    .context(IoSnafu { target: "stdout" })?;
                stdout.flush().await.context(IoSnafu { target: "stdout" })?;
                Ok(None)
            }
            JsonSink::File(path) => {
                let target = path.display().to_string();
                tokio::fs::write(path, &json)
                    .await
                    .context(IoSnafu { target })?;
                Ok(Some(path.clone()))
            }
        }
    }
}
