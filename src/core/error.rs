//! Error types for the course-dl library
//!
//! Distinguishes per-item failures (one lesson, one series page) from the
//! setup failures (authentication, discovery, manifest) that end the run.

use std::fmt;

/// Main error type for course-dl operations
#[derive(Debug)]
pub enum Error {
    /// Network connectivity failure reaching an endpoint
    Network(String),

    /// HTTP-layer failure that is not a status-code mismatch
    Http(String),

    /// Endpoint answered with something other than 200
    UnexpectedStatus { url: String, status: u16 },

    /// Landing page carried no login token attribute
    TokenNotFound,

    /// Lesson page carried no binary download anchor
    MissingDownloadLink(String),

    /// Expected response header absent or unparseable
    HeaderMissing(String),

    /// Transfer interrupted mid-stream; the lesson is skipped, not the run
    DownloadFailed(String),

    /// Local filesystem failure
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Network(msg) => {
                write!(f, "Network error: {}", msg)
            }
            Error::Http(msg) => {
                write!(f, "HTTP error: {}", msg)
            }
            Error::UnexpectedStatus { url, status } => {
                write!(f, "{} returned wrong status code: {}, expected 200", url, status)
            }
            Error::TokenNotFound => {
                write!(f, "Can't find login token on landing page")
            }
            Error::MissingDownloadLink(url) => {
                write!(f, "No download link found on lesson page {}", url)
            }
            Error::HeaderMissing(name) => {
                write!(f, "Response is missing a usable {} header", name)
            }
            Error::DownloadFailed(msg) => {
                write!(f, "Download failed: {}", msg)
            }
            Error::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Error::Network(err.to_string())
        } else {
            Error::Http(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Http(format!("invalid URL: {}", err))
    }
}

/// Convenience result type for course-dl operations
pub type Result<T> = std::result::Result<T, Error>;
