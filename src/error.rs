use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Main error type for the gossiper service
#[derive(Debug, thiserror::Error)]
pub enum GossiperError {
    /// Configuration or CLI argument errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed requests rejected at the HTTP boundary
    #[error("Invalid request: {0}")]
    Api(String),

    /// Peer delivery and server transport errors
    #[error("Transport error: {0}")]
    Transport(String),

    /// System I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenient type alias for Results using our error type
pub type Result<T> = std::result::Result<T, GossiperError>;

impl GossiperError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GossiperError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GossiperError::Api(_) => StatusCode::BAD_REQUEST,
            GossiperError::Transport(_) => StatusCode::BAD_GATEWAY,
            GossiperError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            GossiperError::Config(_) => "configuration_error",
            GossiperError::Api(_) => "api_error",
            GossiperError::Transport(_) => "transport_error",
            GossiperError::Io(_) => "io_error",
        }
    }
}

impl IntoResponse for GossiperError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = json!({
            "error": {
                "code": status_code.as_u16(),
                "message": self.to_string(),
                "type": self.error_type(),
            }
        });

        (status_code, Json(error_response)).into_response()
    }
}

impl From<reqwest::Error> for GossiperError {
    fn from(err: reqwest::Error) -> Self {
        GossiperError::Transport(err.to_string())
    }
}

// Helper macros for common error construction patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::GossiperError::Config($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::GossiperError::Config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! api_error {
    ($msg:expr) => {
        $crate::error::GossiperError::Api($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::GossiperError::Api(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! transport_error {
    ($msg:expr) => {
        $crate::error::GossiperError::Transport($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::GossiperError::Transport(format!($fmt, $($arg)*))
    };
}
