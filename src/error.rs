use thiserror::Error;

/// Why a single page could not be turned into HTML.
///
/// Always absorbed by the orchestrator: a page that fails is counted and
/// skipped, never fatal to the run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("origin returned HTTP {0}")]
    HttpStatus(u16),

    #[error("page did not load within the timeout")]
    Timeout,

    #[error("page content too short ({len} bytes, expected at least {min})")]
    ContentTooShort { len: usize, min: usize },

    #[error("page contains not-found marker {0:?}")]
    NotFoundMarker(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("browser session error: {0}")]
    Session(String),
}

impl From<reqwest::Error> for RetrievalError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RetrievalError::Timeout
        } else {
            RetrievalError::Transport(err.to_string())
        }
    }
}

impl From<fantoccini::error::CmdError> for RetrievalError {
    fn from(err: fantoccini::error::CmdError) -> Self {
        RetrievalError::Session(err.to_string())
    }
}

/// Rejections raised before any page is requested.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid {site} URL provided")]
    InvalidDomain { site: String },

    #[error("Invalid page range provided")]
    InvalidRange,

    #[error("Maximum {max} pages allowed per request")]
    RangeTooLarge { max: u32 },
}

/// Failures that abort a whole run and yield the zeroed failure envelope.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("could not open browser session: {0}")]
    Session(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("malformed request: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
