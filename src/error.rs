//! Errors.

use crate::api::RequestContext;
use crate::enums::ChallengeKind;
use crate::types::{Coins, TradeId};
use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;

/// Crate-wide result type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Any error that can occur while talking to the transfer market.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A parameter failed validation. No request was sent.
    #[error("Invalid parameter: {}", .0)]
    Parameter(#[from] ParameterError),
    /// A connection, DNS or TLS failure.
    #[error("Request error: {}", .0)]
    Reqwest(#[from] reqwest::Error),
    #[error("Request middleware error: {}", .0)]
    ReqwestMiddleware(anyhow::Error),
    /// The session is no longer valid. Log in again.
    #[error("Unauthorized: {}", .0)]
    Unauthorized(String),
    #[error("Not found: {}", .0)]
    NotFound(String),
    /// The service rejected the request with its own error body.
    #[error("{}", .0)]
    Api(Box<ApiError>),
    #[error("Error {}", .0)]
    Http(StatusCode),
    #[error("Error parsing response: {}", .0)]
    Parse(#[from] serde_json::Error),
    #[error("Invalid URL: {}", .0)]
    Url(#[from] url::ParseError),
    /// A request was attempted before logging in.
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Login failed: {}", .0)]
    Login(#[from] LoginError),
    #[error("Cookie file error: {}", .0)]
    File(#[from] FileError),
}

impl Error {
    /// The numeric code from the service's error body, if this is an API error.
    pub fn api_code(&self) -> Option<u32> {
        match self {
            Self::Api(error) => Some(error.code),
            _ => None,
        }
    }
}

impl From<reqwest_middleware::Error> for Error {
    fn from(error: reqwest_middleware::Error) -> Error {
        match error {
            reqwest_middleware::Error::Reqwest(e) => Error::Reqwest(e),
            reqwest_middleware::Error::Middleware(e) => Error::ReqwestMiddleware(e),
        }
    }
}

impl From<ApiError> for Error {
    fn from(error: ApiError) -> Error {
        Error::Api(Box::new(error))
    }
}

/// A local precondition failed.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum ParameterError {
    #[error("Price {} is not a valid price", .0)]
    InvalidPrice(Coins),
    #[error("Starting bid or buy now price is invalid")]
    InvalidListingPrice,
    #[error("Duration {} is not an allowed listing duration", .0)]
    InvalidDuration(u32),
    #[error("Trade ID {} is not allowed", .0)]
    InvalidTradeId(TradeId),
    #[error("No trade IDs given")]
    NoTradeIds,
}

/// Error reading or writing the cookie file.
#[derive(thiserror::Error, Debug)]
pub enum FileError {
    #[error("Filesystem error: {}", .0)]
    FileSystem(#[from] std::io::Error),
    #[error("Error parsing file contents: {}", .0)]
    Parse(#[from] serde_json::Error),
}

/// Login could not be completed.
#[derive(thiserror::Error, Debug)]
pub enum LoginError {
    /// The identity provider rejected the credentials.
    #[error("{}", .0)]
    Rejected(String),
    /// A two-factor code or captcha solution was demanded but none was supplied.
    #[error("No resolution supplied for {} challenge", .0)]
    ChallengeUnresolved(ChallengeKind),
    #[error("A login is already in progress")]
    InProgress,
    #[error("Unexpected response: {}", .0)]
    Response(String),
    #[error("Request error: {}", .0)]
    Reqwest(#[from] reqwest::Error),
    #[error("Request middleware error: {}", .0)]
    ReqwestMiddleware(anyhow::Error),
}

impl From<reqwest_middleware::Error> for LoginError {
    fn from(error: reqwest_middleware::Error) -> LoginError {
        match error {
            reqwest_middleware::Error::Reqwest(e) => LoginError::Reqwest(e),
            reqwest_middleware::Error::Middleware(e) => LoginError::ReqwestMiddleware(e),
        }
    }
}

/// An error reported inside a response body by the service itself.
#[derive(Debug)]
pub struct ApiError {
    /// The service's own status code. This is not the HTTP status.
    pub code: u32,
    pub reason: String,
    pub message: Option<String>,
    /// The full error body as received.
    pub body: Value,
    /// The request which produced this error.
    pub request: RequestContext,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "API error {} ({}) for {} {}", self.code, self.reason, self.request.method, self.request.url)?;

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ApiError {}
