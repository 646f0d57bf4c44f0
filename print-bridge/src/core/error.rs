//! Error handling
//!
//! - [`AppError`] - request-time errors, rendered as `{ok:false, error, message}`
//! - [`StartupError`] - fatal bootstrap errors, each with its own exit status
//!
//! | Variant | HTTP status | `error` code |
//! |---------|-------------|--------------|
//! | InvalidArgument | 400 | invalid_argument |
//! | Unauthorized | 401 | unauthorized |
//! | NotFound | 404 | not_found |
//! | Configuration | 500 | configuration_error |
//! | Internal | 500 | internal_error |
//! | PlatformUnsupported | 501 | platform_unsupported |
//! | TransportFailure | 502 | transport_failure |

use std::path::PathBuf;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bridge_printer::PrintError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Raw printing is not supported on this platform")]
    PlatformUnsupported,

    #[error("Transport failure: {0}")]
    TransportFailure(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl AppError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PlatformUnsupported => StatusCode::NOT_IMPLEMENTED,
            AppError::TransportFailure(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidArgument(_) => "invalid_argument",
            AppError::Unauthorized => "unauthorized",
            AppError::NotFound(_) => "not_found",
            AppError::PlatformUnsupported => "platform_unsupported",
            AppError::TransportFailure(_) => "transport_failure",
            AppError::Configuration(_) => "configuration_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Unauthorized => None,
            AppError::Internal(msg) => {
                // 记录内部错误但不暴露详细信息
                tracing::error!(target: "internal", error = %msg, "Internal error occurred");
                Some("An internal error occurred".to_string())
            }
            AppError::InvalidArgument(msg)
            | AppError::NotFound(msg)
            | AppError::TransportFailure(msg)
            | AppError::Configuration(msg) => Some(msg.clone()),
            AppError::PlatformUnsupported => Some(self.to_string()),
        };

        let body = ErrorBody {
            ok: false,
            error: self.code(),
            message,
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<PrintError> for AppError {
    fn from(e: PrintError) -> Self {
        match e {
            PrintError::InvalidArgument(msg) => AppError::InvalidArgument(msg),
            PrintError::PlatformUnsupported => AppError::PlatformUnsupported,
            PrintError::NoPrinterConfigured => AppError::Configuration(e.to_string()),
            PrintError::PrinterNotFound(name) => {
                AppError::NotFound(format!("Printer not found: {name}"))
            }
            PrintError::TransportFailure(msg) => AppError::TransportFailure(msg),
            PrintError::DirectoryQueryFailed(msg) => AppError::Internal(msg),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::InvalidArgument(e.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Blocking task failed: {e}"))
    }
}

/// Handler result alias
pub type AppResult<T> = Result<T, AppError>;

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fatal startup failures
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("No TLS certificate found. Tried: {}", join_paths(.attempted))]
    CertificateNotFound { attempted: Vec<PathBuf> },

    #[error("TLS certificate {} could not be loaded: {reason}", .path.display())]
    CertificateInvalid { path: PathBuf, reason: String },

    #[error("No free port between {start} and {end}")]
    NoFreePort { start: u16, end: u16 },

    #[error("Port {port} is already in use by another process")]
    PortInUse { port: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StartupError {
    /// Process exit status for this failure class
    pub fn exit_code(&self) -> u8 {
        match self {
            StartupError::Io(_) => 1,
            StartupError::Configuration(_) | StartupError::CertificateInvalid { .. } => 2,
            StartupError::CertificateNotFound { .. } => 3,
            StartupError::NoFreePort { .. } => 4,
            StartupError::PortInUse { .. } => 5,
        }
    }

    /// Map a listener bind failure, singling out "address in use"
    pub fn from_bind(port: u16, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            StartupError::PortInUse { port }
        } else {
            StartupError::Io(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_errors_map_to_statuses() {
        let cases = [
            (PrintError::InvalidArgument("x".into()), StatusCode::BAD_REQUEST),
            (PrintError::PlatformUnsupported, StatusCode::NOT_IMPLEMENTED),
            (PrintError::TransportFailure("x".into()), StatusCode::BAD_GATEWAY),
            (PrintError::PrinterNotFound("x".into()), StatusCode::NOT_FOUND),
            (PrintError::NoPrinterConfigured, StatusCode::INTERNAL_SERVER_ERROR),
            (
                PrintError::DirectoryQueryFailed("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            StartupError::Configuration("x".into()),
            StartupError::CertificateNotFound { attempted: vec![] },
            StartupError::NoFreePort { start: 1, end: 2 },
            StartupError::PortInUse { port: 1 },
            StartupError::Io(std::io::Error::other("x")),
        ];
        let mut codes: Vec<u8> = errors.iter().map(StartupError::exit_code).collect();
        assert!(codes.iter().all(|c| *c != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_certificate_not_found_lists_paths() {
        let err = StartupError::CertificateNotFound {
            attempted: vec![PathBuf::from("/a/cert.pem"), PathBuf::from("/b/cert.pem")],
        };
        let msg = err.to_string();
        assert!(msg.contains("/a/cert.pem"));
        assert!(msg.contains("/b/cert.pem"));
    }

    #[test]
    fn test_bind_error_classification() {
        let in_use = std::io::Error::from(std::io::ErrorKind::AddrInUse);
        assert!(matches!(
            StartupError::from_bind(49001, in_use),
            StartupError::PortInUse { port: 49001 }
        ));
        let other = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(matches!(StartupError::from_bind(80, other), StartupError::Io(_)));
    }
}
