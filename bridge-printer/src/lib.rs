//! # bridge-printer
//!
//! ESC/POS printing primitives for the print bridge - low-level only.
//!
//! ## Scope
//!
//! This crate handles HOW bytes reach a receipt printer:
//! - ESC/POS command encoding and receipt composition
//! - Printer directory (installed printers, OS default)
//! - Target printer resolution
//! - RAW spool jobs with guaranteed handle cleanup
//! - Per-printer job serialization
//!
//! HTTP concerns (auth, request validation, status codes) live in `print-bridge`.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_printer::{DrawerCommand, PrintJob, ReceiptOptions, build_receipt_with, native_backend};
//!
//! let options = ReceiptOptions::default().with_drawer(DrawerCommand::with_pin(0)?);
//! let data = build_receipt_with("Ticket de test", &options);
//!
//! let backend = native_backend();
//! let sent = backend.send_raw_job(&PrintJob::new("Receipt Printer", "Receipt", data));
//! ```

mod backend;
mod directory;
mod error;
pub mod escpos;
mod resolver;
mod spooler;
mod transport;

// Re-exports
pub use backend::{PrinterBackend, SpoolerBackend, UnsupportedBackend, dispatch, native_backend};
pub use directory::{PrinterDescriptor, PrinterDirectory, describe};
pub use error::{PrintError, PrintResult};
pub use escpos::{
    Alignment, DrawerCommand, EscPosBuilder, ReceiptOptions, build_receipt, build_receipt_with,
};
pub use resolver::resolve_printer_name;
pub use spooler::{RAW_DATATYPE, SpoolApi};
pub use transport::{PrintJob, PrinterLocks, RawTransport, SpoolStep};

#[cfg(windows)]
pub use spooler::WindowsSpooler;
