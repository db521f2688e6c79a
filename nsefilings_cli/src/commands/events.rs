use anyhow::Result;
use clap::Args;
use nsefilings_lib::Retriever;

use crate::output::{print_events_table, print_json, OutputFormat};

#[derive(Args)]
pub struct EventsArgs {
    /// Ticker symbol of the listing (e.g. TCS)
    pub symbol: String,
}

pub async fn run(
    args: &EventsArgs,
    retriever: &Retriever,
    headless: bool,
    format: &OutputFormat,
) -> Result<()> {
    let rows = retriever.event_calendar(&args.symbol, headless).await?;
    eprintln!("{} event calendar record(s)", rows.len());
    match format {
        OutputFormat::Table => print_events_table(&rows),
        OutputFormat::Json => print_json(&rows)?,
    }
    Ok(())
}
