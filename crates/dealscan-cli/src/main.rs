mod cli;
mod config;
mod error;

use std::process::ExitCode;

use clap::Parser;
use dealscan_core::{run_scan, BseAdapter, DateRange, DealSource, NseAdapter, TelegramNotifier};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::Settings;
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli)?;

    let range = DateRange::lookback(DateRange::today(), settings.lookback_days)?;
    info!(%range, max_rows = settings.max_rows, "starting SME deal scan");

    let nse = NseAdapter::new();
    let bse = BseAdapter::new();
    let sources: [&dyn DealSource; 2] = [&nse, &bse];
    let report = run_scan(&sources, &range).await;

    let message = report.message(settings.max_rows);
    TelegramNotifier::new(settings.bot_token.as_str())
        .send(&settings.chat_id, &message)
        .await?;

    println!("Telegram update sent successfully.");
    Ok(ExitCode::SUCCESS)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dealscan=info,dealscan_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
