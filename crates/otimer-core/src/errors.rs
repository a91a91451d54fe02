//! Error types for the remote session client
//!
//! Every failure a caller can observe is one `SessionError` variant. Row-level
//! decode problems while listing tasks are not errors at all: those rows are
//! dropped and only show up in the logs (see `RecordSkip`).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid server URL: {0}")]
    MalformedEndpoint(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("Not logged in")]
    NotAuthenticated,
    #[error("Login failed")]
    LoginFailed,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SessionError {
    /// True when the failure happened before anything was sent to the server.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            SessionError::MalformedEndpoint(_) | SessionError::NotAuthenticated
        )
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        SessionError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Protocol(err.to_string())
    }
}

/// Why a single task row was left out of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSkip {
    NotAnObject,
    MissingId,
    MissingName,
    MissingProject,
}

impl std::fmt::Display for RecordSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            RecordSkip::NotAnObject => "row is not an object",
            RecordSkip::MissingId => "no integer id",
            RecordSkip::MissingName => "no string name",
            RecordSkip::MissingProject => "project_id has no display name",
        };
        f.write_str(reason)
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {message}")]
    Io { path: String, message: String },
    #[error("Failed to parse settings file {path}: {message}")]
    Parse { path: String, message: String },
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_classification() {
        assert!(SessionError::NotAuthenticated.is_precondition());
        assert!(SessionError::MalformedEndpoint("::".to_string()).is_precondition());
        assert!(!SessionError::LoginFailed.is_precondition());
        assert!(!SessionError::Transport("refused".to_string()).is_precondition());
    }

    #[test]
    fn test_login_failed_message_is_generic() {
        assert_eq!(SessionError::LoginFailed.to_string(), "Login failed");
    }

    #[test]
    fn test_json_error_maps_to_protocol() {
        let err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        assert!(matches!(SessionError::from(err), SessionError::Protocol(_)));
    }
}
