//! Shared steps of every printing request: platform check, target
//! resolution and delivery.

use bridge_printer::{PrintError, PrintJob, dispatch, resolve_printer_name};

use crate::core::{AppError, AppResult, ServerState};

/// Resolve the printer a request targets and confirm it is installed.
///
/// Returns the name as the OS reports it. Directory calls run on the
/// blocking pool.
pub async fn resolve_target(state: &ServerState, requested: Option<String>) -> AppResult<String> {
    if !state.backend.is_supported() {
        return Err(AppError::PlatformUnsupported);
    }

    let backend = state.backend.clone();
    let configured = state.config.default_printer.clone();

    let printer = tokio::task::spawn_blocking(move || -> Result<String, PrintError> {
        let name = resolve_printer_name(requested.as_deref(), configured.as_deref(), &*backend)?;
        backend
            .find_printer(&name)?
            .map(|found| found.name)
            .ok_or(PrintError::PrinterNotFound(name))
    })
    .await??;

    Ok(printer)
}

/// Hand a job to the transport; `false` from the spooler becomes 502
pub async fn deliver(state: &ServerState, job: PrintJob) -> AppResult<()> {
    let printer = job.printer_name().to_string();
    let bytes = job.payload().len();

    if dispatch(state.backend.clone(), job).await {
        tracing::info!(printer = %printer, bytes, "Job delivered");
        Ok(())
    } else {
        Err(AppError::TransportFailure(format!(
            "Printer '{printer}' did not accept the job"
        )))
    }
}
