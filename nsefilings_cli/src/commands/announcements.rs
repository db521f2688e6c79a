use anyhow::Result;
use clap::Args;
use nsefilings_lib::Retriever;

use crate::output::{print_announcements_table, print_json, OutputFormat};

#[derive(Args)]
pub struct AnnouncementsArgs {
    /// Ticker symbol of the listing (e.g. TCS)
    pub symbol: String,
}

pub async fn run(
    args: &AnnouncementsArgs,
    retriever: &Retriever,
    headless: bool,
    format: &OutputFormat,
) -> Result<()> {
    let rows = retriever.announcements(&args.symbol, headless).await?;
    eprintln!("{} announcement record(s)", rows.len());
    match format {
        OutputFormat::Table => print_announcements_table(&rows),
        OutputFormat::Json => print_json(&rows)?,
    }
    Ok(())
}
