//! Command-line renderer for the audit-history pipeline.
//!
//! Runs one pipeline execution against the configured backend and prints
//! the resulting table, the "no data" state, or the load failure.

use anyhow::{bail, Context, Result};
use servicedesk_history::{HistoryConfig, HistoryPipeline, HistoryView, RenderModel};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(endpoint) = args.next() else {
        bail!("usage: history_cli <endpoint> [config.yaml]");
    };

    let config = match args.next() {
        Some(path) => HistoryConfig::load(&path)
            .with_context(|| format!("failed to load config from '{path}'"))?,
        None => HistoryConfig::from_env(),
    };

    let pipeline = HistoryPipeline::from_config(&config)?;

    let view = pipeline
        .run(&endpoint)
        .await
        .context("failed to load history")?;

    match view {
        HistoryView::NoData => println!("No history entries."),
        HistoryView::Table(model) => print_table(&model),
    }

    Ok(())
}

fn print_table(model: &RenderModel) {
    let mut widths: Vec<usize> = model.headers.iter().map(|h| h.label.len()).collect();
    for row in &model.rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.len());
            }
        }
    }

    let header_line = model
        .headers
        .iter()
        .zip(widths.iter().copied())
        .map(|(header, width)| format!("{:<width$}", header.label))
        .collect::<Vec<String>>()
        .join("  ");
    println!("{header_line}");
    println!("{}", "-".repeat(header_line.len()));

    for row in &model.rows {
        let line = row
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<String>>()
            .join("  ");
        println!("{line}");
    }
}
