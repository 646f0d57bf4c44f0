//! Platform capability selection
//!
//! The rest of the system talks to printers only through [`PrinterBackend`].
//! A real spooler-backed implementation or an unsupported stand-in is chosen
//! once at startup by [`native_backend`].

use std::sync::Arc;

use tracing::{error, info};

use crate::directory::{PrinterDescriptor, PrinterDirectory, describe};
use crate::error::PrintResult;
use crate::spooler::SpoolApi;
use crate::transport::{PrintJob, RawTransport};

/// Directory + raw transport capability of the host
pub trait PrinterBackend: PrinterDirectory + Send + Sync {
    /// Whether native raw printing is available at all
    fn is_supported(&self) -> bool;

    /// Blocking delivery of one job; `false` on any transport failure
    fn send_raw_job(&self, job: &PrintJob) -> bool;
}

/// Spooler-backed implementation
pub struct SpoolerBackend<S: SpoolApi> {
    transport: RawTransport<S>,
}

impl<S: SpoolApi> SpoolerBackend<S> {
    pub fn new(api: S) -> Self {
        Self {
            transport: RawTransport::new(api),
        }
    }

    pub fn transport(&self) -> &RawTransport<S> {
        &self.transport
    }
}

impl<S: SpoolApi> PrinterDirectory for SpoolerBackend<S> {
    fn list_printers(&self) -> PrintResult<Vec<PrinterDescriptor>> {
        let api = self.transport.api();
        let names = api.enum_printers()?;
        let default = api.default_printer()?;
        Ok(describe(names, default.as_deref()))
    }

    fn default_printer_name(&self) -> PrintResult<Option<String>> {
        self.transport.api().default_printer()
    }
}

impl<S: SpoolApi> PrinterBackend for SpoolerBackend<S> {
    fn is_supported(&self) -> bool {
        true
    }

    fn send_raw_job(&self, job: &PrintJob) -> bool {
        self.transport.send(job)
    }
}

/// Host without native raw printing
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedBackend;

impl PrinterDirectory for UnsupportedBackend {
    fn list_printers(&self) -> PrintResult<Vec<PrinterDescriptor>> {
        Ok(Vec::new())
    }

    fn default_printer_name(&self) -> PrintResult<Option<String>> {
        Ok(None)
    }
}

impl PrinterBackend for UnsupportedBackend {
    fn is_supported(&self) -> bool {
        false
    }

    fn send_raw_job(&self, _job: &PrintJob) -> bool {
        false
    }
}

/// Select the backend for the current platform
pub fn native_backend() -> Arc<dyn PrinterBackend> {
    #[cfg(windows)]
    {
        info!("Using Windows spooler backend");
        Arc::new(SpoolerBackend::new(crate::spooler::WindowsSpooler))
    }

    #[cfg(not(windows))]
    {
        info!("Raw printing unavailable on this platform, using unsupported backend");
        Arc::new(UnsupportedBackend)
    }
}

/// Run a job on the blocking pool so async workers are not stalled by the
/// spooler.
pub async fn dispatch(backend: Arc<dyn PrinterBackend>, job: PrintJob) -> bool {
    match tokio::task::spawn_blocking(move || backend.send_raw_job(&job)).await {
        Ok(sent) => sent,
        Err(e) => {
            error!(error = %e, "Print task join failed");
            false
        }
    }
}
