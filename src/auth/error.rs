use thiserror::Error;

use crate::error::LiminalError;

/// Failures raised by the device flow, the token store and token resolution.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not authenticated. Run \"liminaldb login\" or set LIMINALDB_API_KEY.")]
    NotAuthenticated,
    #[error("No WorkOS client ID. Set WORKOS_CLIENT_ID or pass --client-id.")]
    MissingClientId,
    #[error("Device authorization failed ({status}): {body}")]
    DeviceAuthorization { status: u16, body: String },
    #[error("Authentication failed: {}", description.as_deref().unwrap_or(code))]
    AuthorizationFailed {
        code: String,
        description: Option<String>,
    },
    #[error("Device authorization timed out. Please try again.")]
    TimedOut,
    #[error("Device authorization cancelled")]
    Cancelled,
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<AuthError> for LiminalError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::NotAuthenticated => LiminalError::NotAuthenticated,
            AuthError::DeviceAuthorization { status, body } => {
                LiminalError::DeviceAuthorization { status, body }
            }
            AuthError::TimedOut => LiminalError::AuthorizationTimedOut,
            other @ AuthError::MissingClientId => LiminalError::Configuration(other.to_string()),
            AuthError::Network(message) => LiminalError::Network(message),
            other => LiminalError::Authentication(other.to_string()),
        }
    }
}
