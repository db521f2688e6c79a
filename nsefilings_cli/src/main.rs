mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nsefilings_lib::{Retriever, Settings};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "nsefilings")]
#[command(about = "Fetch corporate disclosures for NSE listings")]
struct Cli {
    /// Output format: table or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Run the browser fallback with a visible window
    #[arg(long, global = true)]
    headful: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Event calendar for a symbol
    Events(commands::events::EventsArgs),
    /// Board meetings for a symbol
    BoardMeetings(commands::board_meetings::BoardMeetingsArgs),
    /// Corporate actions for a symbol
    Actions(commands::actions::ActionsArgs),
    /// Corporate announcements for a symbol
    Announcements(commands::announcements::AnnouncementsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nsefilings_lib=info".parse().unwrap())
                .add_directive("nsefilings_api=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    let retriever = Retriever::new(Settings::from_env());
    let headless = !cli.headful;

    match &cli.command {
        Commands::Events(args) => {
            commands::events::run(args, &retriever, headless, &format).await?
        }
        Commands::BoardMeetings(args) => {
            commands::board_meetings::run(args, &retriever, headless, &format).await?
        }
        Commands::Actions(args) => {
            commands::actions::run(args, &retriever, headless, &format).await?
        }
        Commands::Announcements(args) => {
            commands::announcements::run(args, &retriever, headless, &format).await?
        }
    }

    Ok(())
}
