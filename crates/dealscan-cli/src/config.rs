use crate::cli::Cli;
use crate::error::CliError;

/// Validated run settings.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub bot_token: String,
    pub chat_id: String,
    pub lookback_days: u32,
    pub max_rows: usize,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("lookback_days", &self.lookback_days)
            .field("max_rows", &self.max_rows)
            .finish()
    }
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let bot_token = required(cli.bot_token.as_deref())?;
        let chat_id = required(cli.chat_id.as_deref())?;
        let lookback_days = u32::try_from(cli.lookback_days.max(1)).unwrap_or(u32::MAX);

        Ok(Self {
            bot_token,
            chat_id,
            lookback_days,
            max_rows: cli.max_rows,
        })
    }
}

fn required(value: Option<&str>) -> Result<String, CliError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or(CliError::MissingCredentials)
}
