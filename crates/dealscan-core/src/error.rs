use thiserror::Error;

/// Validation errors for operator-supplied date windows.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("date range start {from} is after end {to}")]
    InvertedDateRange { from: String, to: String },

    #[error("date arithmetic overflowed for lookback of {days} days")]
    LookbackOutOfRange { days: u32 },
}

/// Failure of a single upstream query. Always recovered by the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned status {status}")]
    Status { status: u16 },

    #[error("malformed payload: {0}")]
    Payload(String),
}

impl From<crate::http_client::HttpError> for FetchError {
    fn from(error: crate::http_client::HttpError) -> Self {
        Self::Transport(error.message().to_owned())
    }
}

/// Delivery failure of the outgoing chat message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("telegram request failed: {0}")]
    Transport(String),

    #[error("telegram returned an unreadable response (status {status}): {body}")]
    InvalidResponse { status: u16, body: String },

    #[error("Telegram API error: {payload}")]
    Rejected { payload: String },
}
