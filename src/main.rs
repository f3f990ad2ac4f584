use anyhow::{Context, Result};
use clap::Parser;
use downtime::cli::{Cli, OutputFormat};
use downtime::config::DowntimeConfig;
use downtime::csv_output::{pivot_to_csv, CsvOutput};
use downtime::html_output::HtmlOutput;
use downtime::ingest::EventTable;
use downtime::json_output::JsonOutput;
use downtime::text_output::TextOutput;
use downtime::DowntimeAggregator;
use std::fs;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Load the config file (if any) and apply CLI overrides
fn load_config(args: &Cli) -> Result<DowntimeConfig> {
    let mut config = match &args.config {
        Some(path) => DowntimeConfig::from_toml(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => DowntimeConfig::default(),
    };

    if let Some(mapping) = args.mapping {
        config.mapping = mapping;
    }
    if let Some(precision) = args.precision {
        config.precision = precision;
    }
    if let Some(preview_rows) = args.preview_rows {
        config.preview_rows = preview_rows;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(&args)?;
    tracing::debug!("Using config: {:?}", config);

    let events = EventTable::from_path(&args.input, args.input_format)
        .with_context(|| format!("Failed to read events from {}", args.input.display()))?;

    let aggregator = DowntimeAggregator::new(&config)?;
    let agg = aggregator
        .aggregate(&events.events)
        .context("Failed to aggregate downtime")?;

    if let Some(path) = &args.export_pivot {
        fs::write(path, pivot_to_csv(&agg.table))
            .with_context(|| format!("Failed to write pivot table: {}", path.display()))?;
    }

    let rendered = match args.format {
        OutputFormat::Text => TextOutput::new(config.precision).render(&agg),
        OutputFormat::Json => JsonOutput::new(&agg, &events).to_json()? + "\n",
        OutputFormat::Csv => CsvOutput::new(config.precision).to_csv(&agg),
        OutputFormat::Html => {
            HtmlOutput::new(config.precision, config.preview_rows).to_html(&agg, &events)
        }
    };

    match &args.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write report: {}", path.display()))?,
        None => print!("{}", rendered),
    }

    Ok(())
}
