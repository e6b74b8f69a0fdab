use reqwest::StatusCode;
use thiserror::Error;

/// Status reported for requests that never produced an HTTP response.
const NO_RESPONSE_STATUS: u16 = 0;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request timed out")]
    Timeout,

    #[error("Status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unable to process authentication response")]
    UnprocessableResponse,

    #[error("Unable to process logout response")]
    UnprocessableLogoutResponse,

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Invalid client configuration: {0}")]
    Client(String),
}

impl ApiError {
    /// Error for a response that completed with a non-success status.
    /// The full body becomes the message.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        ApiError::Status {
            status: status.as_u16(),
            message: body,
        }
    }

    /// Numeric status for this failure. Transport and client errors that
    /// never reached the server report 0.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT.as_u16(),
            ApiError::Status { status, .. } => *status,
            ApiError::UnprocessableResponse | ApiError::UnprocessableLogoutResponse => {
                StatusCode::INTERNAL_SERVER_ERROR.as_u16()
            }
            ApiError::Network(_) | ApiError::Client(_) => NO_RESPONSE_STATUS,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err)
        }
    }
}
