use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use timeseries_ingestor::{
    cli::{
        commands::{Cli, Commands},
        init_tracing,
        params::{decode_envelope_file, override_endpoints, report_lines},
    },
    config::load_config,
    errors::SeriesError,
    io::sink::{ChartDocument, DataSink, JsonSink},
    layout::AxisMode,
    providers::semetric_rest::SemetricProvider,
    requests::fetch_all,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            config,
            endpoints,
            axis,
            output,
        } => run_fetch(config, endpoints, axis, output).await,
        Commands::Decode { input } => {
            let points = decode_envelope_file(&input)
                .with_context(|| format!("Failed to decode {}", input.display()))?;
            println!("{}", serde_json::to_string_pretty(&points)?);
            Ok(())
        }
    }
}

async fn run_fetch(
    config_path: PathBuf,
    endpoints: Option<String>,
    axis: Option<AxisMode>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = load_config(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    if let Some(list) = endpoints {
        override_endpoints(&mut config, &list).context("Invalid --endpoints override")?;
    }
    let axis = axis.unwrap_or(config.chart.axis);

    let provider =
        SemetricProvider::new(config.api.clone()).context("Failed to create Semetric provider")?;
    let outcome = fetch_all(&provider, config.endpoints.iter().cloned()).await?;

    // Report goes to stderr so stdout stays machine readable.
    for line in report_lines(&outcome) {
        eprintln!("{line}");
    }

    let result = match outcome.result {
        Ok(result) => result,
        Err(SeriesError::NoDataAvailable { requested }) => {
            bail!("No data available: all {requested} requests failed, nothing to render")
        }
        Err(e) => return Err(e.into()),
    };

    let document = ChartDocument::new(config.title, &result, config.chart.layout(), axis);
    let sink = match output {
        Some(path) => JsonSink::File(path),
        None => JsonSink::Stdout,
    };
    if let Some(path) = sink.write(&document).await? {
        eprintln!("{}", path.display());
    }
    Ok(())
}
