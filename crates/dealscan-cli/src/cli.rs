//! Command-line definition for `dealscan`.
//!
//! Every option can also be supplied through its environment variable, which
//! is how the scanner is normally run from cron or CI.
//!
//! | Option | Environment | Default |
//! |--------|-------------|---------|
//! | `--bot-token` | `TELEGRAM_BOT_TOKEN` | required |
//! | `--chat-id` | `TELEGRAM_CHAT_ID` | required |
//! | `--lookback-days` | `LOOKBACK_DAYS` | `1` |
//! | `--max-rows` | `MAX_ROWS_PER_SECTION` | `20` |
//!
//! A numeric option set to a blank value takes its default.
//!
//! Log verbosity follows `RUST_LOG`.

use std::num::ParseIntError;

use clap::Parser;

const DEFAULT_LOOKBACK_DAYS: i64 = 1;
const DEFAULT_MAX_ROWS: usize = 20;

/// Scan NSE/BSE block and bulk deals for SME stocks and post them to Telegram.
#[derive(Debug, Parser)]
#[command(name = "dealscan", author, version, about)]
pub struct Cli {
    /// Bot token from BotFather.
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    /// Target chat or channel id. Channel ids are negative.
    #[arg(long, env = "TELEGRAM_CHAT_ID", allow_hyphen_values = true)]
    pub chat_id: Option<String>,

    /// Calendar days to scan, ending today (UTC). Values below 1 mean 1.
    #[arg(
        long,
        env = "LOOKBACK_DAYS",
        default_value_t = DEFAULT_LOOKBACK_DAYS,
        value_parser = parse_lookback_days,
        allow_negative_numbers = true
    )]
    pub lookback_days: i64,

    /// Maximum deals listed per exchange section.
    #[arg(
        long,
        env = "MAX_ROWS_PER_SECTION",
        default_value_t = DEFAULT_MAX_ROWS,
        value_parser = parse_max_rows
    )]
    pub max_rows: usize,
}

fn parse_lookback_days(raw: &str) -> Result<i64, ParseIntError> {
    match raw.trim() {
        "" => Ok(DEFAULT_LOOKBACK_DAYS),
        value => value.parse(),
    }
}

fn parse_max_rows(raw: &str) -> Result<usize, ParseIntError> {
    match raw.trim() {
        "" => Ok(DEFAULT_MAX_ROWS),
        value => value.parse(),
    }
}
