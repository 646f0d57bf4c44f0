//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Malformed or out-of-range command argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Native printing is not available on this platform
    #[error("Raw printing is not supported on this platform")]
    PlatformUnsupported,

    /// The OS printer enumeration failed
    #[error("Printer directory query failed: {0}")]
    DirectoryQueryFailed(String),

    /// No explicit, configured or OS default printer
    #[error("No printer configured")]
    NoPrinterConfigured,

    /// Named printer is not installed
    #[error("Printer not found: {0}")]
    PrinterNotFound(String),

    /// A native spooler call failed
    #[error("Transport failure: {0}")]
    TransportFailure(String),
}

impl PrintError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
