//! Central error type for the scanner.
//!
//! Why have our own error enum?
//! - It keeps public function signatures simple: `Result<T, ScanError>`.
//! - It lets us print friendly messages (`Display`) while still keeping debug info (`Debug`).
//! - It allows the `?` operator to convert common error types into `ScanError` via `From`.
//! - `kind()` gives one source of truth for the error-kind strings the CLI exit code
//!   and the HTTP API's `{error, message}` body both need.

use std::{error::Error, fmt};

/// Top-level error type for the application.
#[derive(Debug)]
pub enum ScanError {
    /// Syntactic rejection of the host string (grammar, port range, empty/whitespace).
    InvalidHostname,
    /// Host grammar is fine but DNS resolution produced no A/AAAA answer.
    InvalidHostnameLookup,
    /// Port present but outside `1..65535`.
    InvalidPort,

    /// DNS resolved but the HTTPS probe could not connect (refused, reset, etc.).
    ConnectionError,
    /// TLS handshake failed on the HTTPS probe.
    TlsError,
    /// Redirect chain exceeded the configured maximum without settling.
    RedirectionLoop,
    /// The scan's overall wall-clock cap elapsed.
    ScanTimeout,
    /// Caller's context was cancelled mid-scan.
    ScanCancelled,
    /// Unexpected internal condition; `message` is logged but not surfaced publicly.
    ScanFailed(String),

    /// Wrapper for file/stream I/O errors (config file reads, etc.).
    Io(std::io::Error),
    /// Wrapper for HTTP client errors (DNS/TLS/connect/timeouts/protocol) from `reqwest`.
    Http(reqwest::Error),
    /// Header value could not be interpreted as UTF-8 text (`to_str()` failed).
    HeaderToStr(reqwest::header::ToStrError),
    /// An async task failed to join (panic/cancellation surfaced as `JoinError`).
    Join(tokio::task::JoinError),
    /// JSON (de)serialization failure.
    Json(serde_json::Error),
    /// URL parsing failure.
    UrlParse(url::ParseError),
}

impl ScanError {
    /// The exact error-kind string used by §7: CLI JSON, API error bodies, persisted rows.
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::InvalidHostname => "invalid-hostname",
            ScanError::InvalidHostnameLookup => "invalid-hostname-lookup",
            ScanError::InvalidPort => "invalid-port",
            ScanError::ConnectionError => "connection-error",
            ScanError::TlsError => "tls-error",
            ScanError::RedirectionLoop => "redirection-loop",
            ScanError::ScanTimeout => "scan-timeout",
            ScanError::ScanCancelled => "scan-cancelled",
            ScanError::ScanFailed(_) => "scan-failed",
            ScanError::Io(_) => "scan-failed",
            ScanError::Http(_) => "connection-error",
            ScanError::HeaderToStr(_) => "scan-failed",
            ScanError::Join(_) => "scan-failed",
            ScanError::Json(_) => "scan-failed",
            ScanError::UrlParse(_) => "invalid-hostname",
        }
    }

    /// True for the validation category (§7): syntactic rejection, never persisted,
    /// surfaced as HTTP 422 / CLI exit code 1.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ScanError::InvalidHostname | ScanError::InvalidHostnameLookup | ScanError::InvalidPort
        )
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::InvalidHostname => write!(f, "invalid hostname"),
            ScanError::InvalidHostnameLookup => write!(f, "hostname did not resolve"),
            ScanError::InvalidPort => write!(f, "port must be in 1..65535"),
            ScanError::ConnectionError => write!(f, "connection error"),
            ScanError::TlsError => write!(f, "tls error"),
            ScanError::RedirectionLoop => write!(f, "redirection loop"),
            ScanError::ScanTimeout => write!(f, "scan timed out"),
            ScanError::ScanCancelled => write!(f, "scan cancelled"),
            ScanError::ScanFailed(msg) => write!(f, "scan failed: {msg}"),
            ScanError::Io(e) => write!(f, "io error: {e}"),
            ScanError::Http(e) => write!(f, "http error: {e}"),
            ScanError::HeaderToStr(e) => write!(f, "header to_str error: {e}"),
            ScanError::Join(e) => write!(f, "task join error: {e}"),
            ScanError::Json(e) => write!(f, "json error: {e}"),
            ScanError::UrlParse(e) => write!(f, "url parse error: {e}"),
        }
    }
}

impl Error for ScanError {}

impl From<std::io::Error> for ScanError {
    fn from(e: std::io::Error) -> Self {
        ScanError::Io(e)
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ScanError::ScanTimeout
        } else if e.is_connect() {
            ScanError::ConnectionError
        } else {
            ScanError::Http(e)
        }
    }
}

impl From<reqwest::header::ToStrError> for ScanError {
    fn from(e: reqwest::header::ToStrError) -> Self {
        ScanError::HeaderToStr(e)
    }
}

impl From<tokio::task::JoinError> for ScanError {
    fn from(e: tokio::task::JoinError) -> Self {
        ScanError::Join(e)
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(e: serde_json::Error) -> Self {
        ScanError::Json(e)
    }
}

impl From<url::ParseError> for ScanError {
    fn from(e: url::ParseError) -> Self {
        ScanError::UrlParse(e)
    }
}
