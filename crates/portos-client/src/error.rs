//! # Client Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Server              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Transport      │  │  Unauthorized (401)     │ │
//! │  │  InvalidUrl     │  │  Decode         │  │  NotFound (404)         │ │
//! │  │  ConfigLoad/Save│  │                 │  │  Api { status, msg }    │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │   Local rules   │  │    Session      │                              │
//! │  │                 │  │                 │                              │
//! │  │  Validation     │  │  Session        │                              │
//! │  │  Checkout       │  │  (token file)   │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every wrapper returns `ClientResult<T>`; nothing panics into the caller.
//! [`ClientError::user_message`] is the text a front end shows inline.

use portos_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Shown for failures the user cannot act on.
pub const GENERIC_ERROR: &str = "An unexpected error occurred";

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Transport(String),

    /// The server answered 2xx with a body we could not decode.
    #[error("Unexpected response: {0}")]
    Decode(String),

    // =========================================================================
    // Server Errors
    // =========================================================================
    /// 401, or a protected call with no stored token.
    #[error("Please log in to continue")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    /// Any other non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// Rejected before sending.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Checkout(#[from] CoreError),

    /// Reading or writing the session file failed.
    #[error("Session error: {0}")]
    Session(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// True when trying the same call again later might succeed. The client
    /// itself never retries; front ends use this to offer a retry button.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(_) => true,
            ClientError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// True when the front end should route to login.
    pub fn requires_login(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }

    /// True when the input was rejected locally and no request was made.
    pub fn is_client_side(&self) -> bool {
        matches!(self, ClientError::Validation(_) | ClientError::Checkout(_))
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }

    /// HTTP status for the response envelope. Local failures report none;
    /// transport failures report 500.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized => Some(401),
            ClientError::NotFound(_) => Some(404),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(_) | ClientError::Decode(_) => Some(500),
            _ => None,
        }
    }

    /// Inline form message. Transport details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(_) | ClientError::Decode(_) => GENERIC_ERROR.to_string(),
            other => other.to_string(),
        }
    }
}
