//! Error types for gluster-block-rest

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Exit status reported when the external command never produced one
/// (spawn failure, killed by a signal).
pub const UNSET_EXIT_STATUS: i32 = -1;

/// How an external command failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecErrorKind {
    /// The binary could not be started (missing, not executable, ...)
    Spawn,
    /// The binary ran and reported failure
    NonzeroExit,
}

/// A failed invocation of the external CLI
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ExecError {
    pub kind: ExecErrorKind,
    pub exit_status: i32,
    pub message: String,
}

impl ExecError {
    pub fn spawn(message: impl Into<String>) -> Self {
        Self {
            kind: ExecErrorKind::Spawn,
            exit_status: UNSET_EXIT_STATUS,
            message: message.into(),
        }
    }

    pub fn nonzero_exit(exit_status: Option<i32>, message: impl Into<String>) -> Self {
        Self {
            kind: ExecErrorKind::NonzeroExit,
            exit_status: exit_status.unwrap_or(UNSET_EXIT_STATUS),
            message: message.into(),
        }
    }
}

/// Coarse classification of an [`Error`], used when shaping error responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Spawn,
    NonzeroExit,
    Other,
}

#[derive(Error, Debug)]
pub enum Error {
    // === Command Errors ===
    #[error(transparent)]
    Exec(#[from] ExecError),

    // === Request Errors ===
    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Client Errors ===
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {message} (code {code})")]
    Api {
        status: u16,
        code: i32,
        message: String,
    },

    // === Generic ===
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Exec(e) => match e.kind {
                ExecErrorKind::Spawn => ErrorKind::Spawn,
                ExecErrorKind::NonzeroExit => ErrorKind::NonzeroExit,
            },
            _ => ErrorKind::Other,
        }
    }

    /// Exit status of the external command behind this error, or the
    /// unset sentinel when the error did not come from a command.
    pub fn exit_status(&self) -> i32 {
        match self {
            Error::Exec(e) => e.exit_status,
            _ => UNSET_EXIT_STATUS,
        }
    }

    /// Convert to HTTP status code
    pub fn to_http_status(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Error::Decode(_) | Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_exec_error_kinds() {
        let err: Error = ExecError::nonzero_exit(Some(2), "volume not found").into();
        assert_eq!(err.kind(), ErrorKind::NonzeroExit);
        assert_eq!(err.exit_status(), 2);
        assert_eq!(err.to_string(), "volume not found");

        let err: Error = ExecError::spawn("No such file or directory").into();
        assert_eq!(err.kind(), ErrorKind::Spawn);
        assert_eq!(err.exit_status(), UNSET_EXIT_STATUS);
    }

    #[test]
    fn test_signal_has_no_exit_status() {
        let err = ExecError::nonzero_exit(None, "terminated by signal");
        assert_eq!(err.kind, ExecErrorKind::NonzeroExit);
        assert_eq!(err.exit_status, UNSET_EXIT_STATUS);
    }

    #[test]
    fn test_other_errors_use_sentinel() {
        let err = Error::Other("boom".into());
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(err.exit_status(), -1);
        assert_eq!(err.to_http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_http_status_mapping() {
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(Error::from(decode).to_http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::Unauthorized("nope".into()).to_http_status(),
            StatusCode::UNAUTHORIZED
        );
        let exec: Error = ExecError::nonzero_exit(Some(1), "fail").into();
        assert_eq!(exec.to_http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
