//! # CLI Error Type
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  command fn ──► Result<(), CliError>                                    │
//! │                      │                                                  │
//! │                      ├── Client(ClientError) ── from every API wrapper  │
//! │                      ├── Input(String) ──────── bad argument / prompt   │
//! │                      └── Io / Output ────────── terminal I/O            │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │  run() ──► "error: <message>" on stderr, exit status from code()        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use portos_client::ClientError;
use serde::Serialize;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Something the user typed that no request was made for.
    #[error("{0}")]
    Input(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Machine-readable category, also used for the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// 401 or no session
    LoginRequired,
    /// 404
    NotFound,
    /// Rejected locally before sending
    ValidationError,
    /// Any other non-2xx status
    ServerError,
    /// No response at all
    NetworkError,
    ConfigError,
    Internal,
}

impl ErrorCode {
    pub const fn exit_status(self) -> u8 {
        match self {
            ErrorCode::ValidationError => 2,
            ErrorCode::LoginRequired => 3,
            ErrorCode::NotFound => 4,
            ErrorCode::NetworkError => 5,
            ErrorCode::ConfigError => 6,
            ErrorCode::ServerError | ErrorCode::Internal => 1,
        }
    }
}

impl CliError {
    pub fn input(message: impl Into<String>) -> Self {
        CliError::Input(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CliError::Client(e) if e.requires_login() => ErrorCode::LoginRequired,
            CliError::Client(ClientError::NotFound(_)) => ErrorCode::NotFound,
            CliError::Client(e) if e.is_client_side() => ErrorCode::ValidationError,
            CliError::Client(e) if e.is_config_error() => ErrorCode::ConfigError,
            CliError::Client(ClientError::Transport(_)) => ErrorCode::NetworkError,
            CliError::Client(ClientError::Api { .. }) => ErrorCode::ServerError,
            CliError::Client(_) => ErrorCode::Internal,
            CliError::Input(_) => ErrorCode::ValidationError,
            CliError::Io(_) | CliError::Output(_) => ErrorCode::Internal,
        }
    }

    /// What goes on stderr. Transport details stay in the debug log.
    pub fn user_message(&self) -> String {
        match self {
            CliError::Client(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    /// Extra line pointing the user at the fix, when there is an obvious one.
    pub fn hint(&self) -> Option<&'static str> {
        match self.code() {
            ErrorCode::LoginRequired => Some("run `portos login` first"),
            ErrorCode::NetworkError => Some("check PORTOS_API_URL or `portos config show`"),
            ErrorCode::ConfigError => Some("run `portos config show` to see the active settings"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portos_core::{CoreError, ValidationError};

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CliError::from(ClientError::Unauthorized).code(),
            ErrorCode::LoginRequired
        );
        assert_eq!(
            CliError::from(ClientError::NotFound("Product not found".into())).code(),
            ErrorCode::NotFound
        );
        assert_eq!(
            CliError::from(ClientError::Checkout(CoreError::EmptyOrder)).code(),
            ErrorCode::ValidationError
        );
        assert_eq!(
            CliError::from(ClientError::Api {
                status: 500,
                message: "boom".into()
            })
            .code(),
            ErrorCode::ServerError
        );
        assert_eq!(CliError::input("bad id").code(), ErrorCode::ValidationError);
    }

    #[test]
    fn test_messages_and_hints() {
        let err = CliError::from(ClientError::Transport("connection refused".into()));
        assert_eq!(err.user_message(), portos_client::error::GENERIC_ERROR);
        assert!(err.hint().is_some());
        assert_eq!(err.code().exit_status(), 5);

        let err = CliError::from(ClientError::from(ValidationError::Required {
            field: "city".into(),
        }));
        assert_eq!(err.user_message(), "city is required");
        assert_eq!(err.hint(), None);
    }

    #[test]
    fn test_code_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_value(ErrorCode::LoginRequired).unwrap(),
            serde_json::json!("LOGIN_REQUIRED")
        );
    }
}
