/******************************************************************************
   Author: Hub Sync Contributors
   Date: 19/10/26
******************************************************************************/

//! Error types shared by every client in the crate
//!
//! Failed HTTP responses are classified into one family,
//! [`AppError::Response`], distinguished only by [`ResponseErrorKind`].
//! Callers can match the whole family or a single kind:
//!
//! ```ignore
//! match client.get("/api/rest/users", RequestOptions::new()).await {
//!     Err(AppError::Response(e)) if e.kind == ResponseErrorKind::Auth => { /* re-login */ }
//!     Err(AppError::Response(e)) => warn!("hub refused the call: {e}"),
//!     Err(e) => return Err(e),
//!     Ok(resp) => { /* ... */ }
//! }
//! ```

use reqwest::StatusCode;
use std::fmt;

/// Result alias used across the crate
pub type AppResult<T> = Result<T, AppError>;

/// Classification of a failed response by its status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseErrorKind {
    /// 400: malformed request payload
    Validation,
    /// 401 and 403: missing or invalid credentials, or insufficient permission
    Auth,
    /// Any other status below 500
    Client,
    /// 500 and above
    Server,
}

impl ResponseErrorKind {
    /// Maps a status code to its failure kind, `None` for 1xx/2xx/3xx
    #[must_use]
    pub fn from_status(status: StatusCode) -> Option<Self> {
        let code = status.as_u16();
        match code {
            c if c < 400 => None,
            400 => Some(Self::Validation),
            401 | 403 => Some(Self::Auth),
            c if c < 500 => Some(Self::Client),
            _ => Some(Self::Server),
        }
    }
}

impl fmt::Display for ResponseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation error",
            Self::Auth => "auth error",
            Self::Client => "client error",
            Self::Server => "server error",
        };
        f.write_str(name)
    }
}

/// A response that came back with a failing status code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseError {
    /// Failure kind derived from `status`
    pub kind: ResponseErrorKind,
    /// Status code returned by the server
    pub status: StatusCode,
    /// Reason phrase for `status`, empty when the code has none
    pub reason: String,
}

impl ResponseError {
    /// Builds the error for `status`, or `None` when the status is not a failure
    #[must_use]
    pub fn from_status(status: StatusCode) -> Option<Self> {
        ResponseErrorKind::from_status(status).map(|kind| Self {
            kind,
            status,
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        })
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Response: {} {}",
            self.kind,
            self.status.as_u16(),
            self.reason
        )
    }
}

impl std::error::Error for ResponseError {}

/// Main error type for the library
#[derive(Debug)]
pub enum AppError {
    /// The server answered with a failing status
    Response(ResponseError),
    /// The request never produced a response
    Network(reqwest::Error),
    /// JSON encoding or decoding failed
    Json(serde_json::Error),
    /// Local I/O failed
    Io(std::io::Error),
    /// A response body did not have the expected shape
    Deserialization(String),
    /// A caller supplied an unusable value
    InvalidInput(String),
}

impl AppError {
    /// Failure kind when this error came from a response status
    #[must_use]
    pub fn kind(&self) -> Option<ResponseErrorKind> {
        match self {
            AppError::Response(e) => Some(e.kind),
            _ => None,
        }
    }

    /// Status code when this error came from a response status
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::Response(e) => Some(e.status),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Response(e) => write!(f, "{e}"),
            AppError::Network(e) => write!(f, "network error: {e}"),
            AppError::Json(e) => write!(f, "json error: {e}"),
            AppError::Io(e) => write!(f, "io error: {e}"),
            AppError::Deserialization(msg) => write!(f, "deserialization error: {msg}"),
            AppError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Response(e) => Some(e),
            AppError::Network(e) => Some(e),
            AppError::Json(e) => Some(e),
            AppError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ResponseError> for AppError {
    fn from(e: ResponseError) -> Self {
        AppError::Response(e)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Network(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e)
    }
}

impl From<reqwest::header::InvalidHeaderName> for AppError {
    fn from(e: reqwest::header::InvalidHeaderName) -> Self {
        AppError::InvalidInput(format!("header name: {e}"))
    }
}

impl From<reqwest::header::InvalidHeaderValue> for AppError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        AppError::InvalidInput(format!("header value: {e}"))
    }
}
