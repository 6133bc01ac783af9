//! Error types for LiminalDB.

use thiserror::Error;

/// Primary error type for all LiminalDB operations.
#[derive(Error, Debug)]
pub enum LiminalError {
    #[error("Not authenticated. Run \"liminaldb login\" or set LIMINALDB_API_KEY.")]
    NotAuthenticated,

    #[error("{0}")]
    Authentication(String),

    #[error("Device authorization failed ({status}): {body}")]
    DeviceAuthorization { status: u16, body: String },

    #[error("Device authorization timed out. Please try again.")]
    AuthorizationTimedOut,

    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        server_code: Option<String>,
    },

    #[error("Prompt not found: {0}")]
    PromptNotFound(String),

    #[error("Slug already exists: {0}")]
    DuplicateSlug(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LiminalError {
    /// Stable machine-readable code, used in JSON error output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::Authentication(_) | Self::DeviceAuthorization { .. } => "AUTH_FAILED",
            Self::AuthorizationTimedOut => "AUTH_TIMEOUT",
            Self::Api { .. } => "API_ERROR",
            Self::PromptNotFound(_) => "PROMPT_NOT_FOUND",
            Self::DuplicateSlug(_) => "DUPLICATE_SLUG",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Error class name, as reported in JSON error output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "NotAuthenticatedError",
            Self::Authentication(_) => "AuthenticationError",
            Self::DeviceAuthorization { .. } => "DeviceAuthorizationError",
            Self::AuthorizationTimedOut => "AuthorizationTimedOutError",
            Self::Api { .. } => "ApiRequestError",
            Self::PromptNotFound(_) => "PromptNotFoundError",
            Self::DuplicateSlug(_) => "DuplicateSlugError",
            Self::Validation(_) => "ValidationError",
            Self::Configuration(_) => "ConfigurationError",
            Self::Network(_) => "NetworkError",
            Self::Io(_) => "IoError",
            Self::Serialization(_) => "SerializationError",
        }
    }

    /// HTTP status attached to the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::DeviceAuthorization { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// One-line follow-up action for the user.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NotAuthenticated => {
                Some("Run \"liminaldb login\" or set LIMINALDB_API_KEY environment variable.")
            }
            Self::AuthorizationTimedOut => Some("Run \"liminaldb login\" again."),
            Self::PromptNotFound(_) => {
                Some("Use \"liminaldb prompts list\" to see available prompts.")
            }
            Self::DuplicateSlug(_) => Some(
                "Use \"liminaldb prompts update <slug>\" to modify an existing prompt.",
            ),
            Self::Network(_) => Some("Check your internet connection and LIMINALDB_URL setting."),
            Self::Configuration(_) => Some(
                "Check your config file or environment variables. Run \"liminaldb --help\" for details.",
            ),
            _ => None,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, LiminalError>;
