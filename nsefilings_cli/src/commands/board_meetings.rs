use anyhow::Result;
use clap::Args;
use nsefilings_lib::Retriever;

use crate::output::{print_board_meetings_table, print_json, OutputFormat};

#[derive(Args)]
pub struct BoardMeetingsArgs {
    /// Ticker symbol of the listing (e.g. TCS)
    pub symbol: String,
}

pub async fn run(
    args: &BoardMeetingsArgs,
    retriever: &Retriever,
    headless: bool,
    format: &OutputFormat,
) -> Result<()> {
    let rows = retriever.board_meetings(&args.symbol, headless).await?;
    eprintln!("{} board meeting record(s)", rows.len());
    match format {
        OutputFormat::Table => print_board_meetings_table(&rows),
        OutputFormat::Json => print_json(&rows)?,
    }
    Ok(())
}
