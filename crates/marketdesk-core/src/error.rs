use thiserror::Error;

pub use marketdesk_util::FetchError;

/// The page was retrieved but does not have the expected shape.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{url} holds {found} table(s); table #{index} was requested")]
    TableNotFound {
        url: String,
        index: usize,
        found: usize,
    },

    #[error("column `{0}` is missing from the table")]
    MissingColumn(String),

    #[error("unexpected payload from {url}: {reason}")]
    Payload { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl Error {
    /// Errors caused by the caller's input rather than by the upstream page.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// HTTP status a caller should answer with.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
