use anyhow::Result;
use clap::Args;
use nsefilings_lib::Retriever;

use crate::output::{print_actions_table, print_json, OutputFormat};

#[derive(Args)]
pub struct ActionsArgs {
    /// Ticker symbol of the listing (e.g. TCS)
    pub symbol: String,
}

pub async fn run(
    args: &ActionsArgs,
    retriever: &Retriever,
    headless: bool,
    format: &OutputFormat,
) -> Result<()> {
    let rows = retriever.corporate_actions(&args.symbol, headless).await?;
    eprintln!("{} corporate action record(s)", rows.len());
    match format {
        OutputFormat::Table => print_actions_table(&rows),
        OutputFormat::Json => print_json(&rows)?,
    }
    Ok(())
}
