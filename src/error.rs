// src/error.rs
use thiserror::Error;

use crate::records::ScrapeError;

/// Transport-level failures. The message is what the user sees.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("invalid server URL: {0}")]
    BadServer(String),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("request aborted before a response arrived")]
    Aborted,
}

/// Why a single extract/export action ended without success.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("{}", crate::config::consts::MSG_INVALID_COURSE_URL)]
    InvalidCourseUrl,

    /// Non-2xx response; `message` is the server's `error` field or a fallback.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error(transparent)]
    Net(#[from] NetError),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error("could not encode export payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not save download: {0}")]
    Download(#[from] std::io::Error),
}

/// Frontend-level errors (config, CLI outcome).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error(transparent)]
    Net(#[from] NetError),

    #[error("{0}")]
    Flow(String),
}
