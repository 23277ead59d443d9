use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID first.")]
    MissingCredentials,

    #[error(transparent)]
    Validation(#[from] dealscan_core::ValidationError),

    #[error(transparent)]
    Notify(#[from] dealscan_core::NotifyError),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::MissingCredentials => 2,
            Self::Validation(_) => 2,
            Self::Notify(_) => 1,
        }
    }
}
