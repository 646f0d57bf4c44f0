//! Raw spool transport
//!
//! Delivers one [`PrintJob`] to a named printer as a single RAW spool job:
//!
//! ```text
//! Open -> StartDoc -> StartPage -> Write -> EndPage -> EndDoc -> Close
//! ```
//!
//! Each successful start step yields a guard whose `Drop` runs the matching
//! end step, so a handle that was opened is always closed and a document or
//! page that was started is always ended, exactly once, whichever step fails.
//! Jobs for the same printer are serialized through [`PrinterLocks`].

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{info, instrument, warn};

use crate::error::{PrintError, PrintResult};
use crate::spooler::{RAW_DATATYPE, SpoolApi};

/// Bytes bound for one printer, with the label shown in the OS queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    printer_name: String,
    label: String,
    payload: Vec<u8>,
}

impl PrintJob {
    pub fn new(printer_name: impl Into<String>, label: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            printer_name: printer_name.into(),
            label: label.into(),
            payload,
        }
    }

    pub fn printer_name(&self) -> &str {
        &self.printer_name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Native step of the spool sequence, used to report where a job failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpoolStep {
    Open,
    StartDoc,
    StartPage,
    Write,
    EndPage,
    EndDoc,
    Close,
}

impl fmt::Display for SpoolStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpoolStep::Open => "OpenPrinter",
            SpoolStep::StartDoc => "StartDocPrinter",
            SpoolStep::StartPage => "StartPagePrinter",
            SpoolStep::Write => "WritePrinter",
            SpoolStep::EndPage => "EndPagePrinter",
            SpoolStep::EndDoc => "EndDocPrinter",
            SpoolStep::Close => "ClosePrinter",
        };
        f.write_str(name)
    }
}

fn step_failed(step: SpoolStep) -> PrintError {
    PrintError::TransportFailure(format!("{step} failed"))
}

// ============================================================================
// Scoped handles
// ============================================================================

/// Open printer handle; closed on drop
struct OpenPrinter<'a, S: SpoolApi> {
    api: &'a S,
    handle: S::Handle,
}

impl<'a, S: SpoolApi> OpenPrinter<'a, S> {
    fn open(api: &'a S, printer: &str) -> PrintResult<Self> {
        let handle = api.open(printer).ok_or_else(|| step_failed(SpoolStep::Open))?;
        Ok(Self { api, handle })
    }

    fn start_doc(&self, doc_name: &str) -> PrintResult<StartedDoc<'_, 'a, S>> {
        if !self.api.start_doc(self.handle, doc_name, RAW_DATATYPE) {
            return Err(step_failed(SpoolStep::StartDoc));
        }
        Ok(StartedDoc { printer: self })
    }
}

impl<S: SpoolApi> Drop for OpenPrinter<'_, S> {
    fn drop(&mut self) {
        if !self.api.close(self.handle) {
            warn!(step = %SpoolStep::Close, "Spool cleanup step failed");
        }
    }
}

/// Started document; ended on drop
struct StartedDoc<'p, 'a, S: SpoolApi> {
    printer: &'p OpenPrinter<'a, S>,
}

impl<'p, 'a, S: SpoolApi> StartedDoc<'p, 'a, S> {
    fn start_page(&self) -> PrintResult<StartedPage<'_, 'p, 'a, S>> {
        let printer = self.printer;
        if !printer.api.start_page(printer.handle) {
            return Err(step_failed(SpoolStep::StartPage));
        }
        Ok(StartedPage { doc: self })
    }
}

impl<S: SpoolApi> Drop for StartedDoc<'_, '_, S> {
    fn drop(&mut self) {
        if !self.printer.api.end_doc(self.printer.handle) {
            warn!(step = %SpoolStep::EndDoc, "Spool cleanup step failed");
        }
    }
}

/// Started page; ended on drop
struct StartedPage<'d, 'p, 'a, S: SpoolApi> {
    doc: &'d StartedDoc<'p, 'a, S>,
}

impl<S: SpoolApi> StartedPage<'_, '_, '_, S> {
    /// Short writes count as failures
    fn write(&self, data: &[u8]) -> PrintResult<usize> {
        let printer = self.doc.printer;
        let written = printer
            .api
            .write(printer.handle, data)
            .ok_or_else(|| step_failed(SpoolStep::Write))?;

        if written != data.len() {
            return Err(PrintError::TransportFailure(format!(
                "Incomplete write: {written} of {} bytes",
                data.len()
            )));
        }
        Ok(written)
    }
}

impl<S: SpoolApi> Drop for StartedPage<'_, '_, '_, S> {
    fn drop(&mut self) {
        let printer = self.doc.printer;
        if !printer.api.end_page(printer.handle) {
            warn!(step = %SpoolStep::EndPage, "Spool cleanup step failed");
        }
    }
}

// ============================================================================
// Per-printer locks
// ============================================================================

/// Keyed mutual exclusion: one lock per printer name (case-insensitive).
///
/// Held for the whole Open..Close sequence so two jobs never interleave on
/// the same device. Different printers never contend.
#[derive(Debug, Default)]
pub struct PrinterLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl PrinterLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock_for(&self, printer: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(printer.trim().to_lowercase())
            .or_default()
            .clone()
    }
}

// ============================================================================
// Transport
// ============================================================================

/// RAW job sender over a [`SpoolApi`]
pub struct RawTransport<S: SpoolApi> {
    api: S,
    locks: PrinterLocks,
}

impl<S: SpoolApi> RawTransport<S> {
    pub fn new(api: S) -> Self {
        Self {
            api,
            locks: PrinterLocks::new(),
        }
    }

    pub fn api(&self) -> &S {
        &self.api
    }

    /// Deliver the job. Blocking; at most one attempt, no retries.
    ///
    /// Returns `false` when any native step fails; the reason is logged.
    #[instrument(skip(self, job), fields(printer = %job.printer_name(), job = %job.label(), data_len = job.payload().len()))]
    pub fn send(&self, job: &PrintJob) -> bool {
        let lock = self.locks.lock_for(job.printer_name());
        let _serialized = lock.lock();

        match self.deliver(job) {
            Ok(written) => {
                info!(bytes = written, "Print job spooled");
                true
            }
            Err(e) => {
                warn!(error = %e, "Print job failed");
                false
            }
        }
    }

    fn deliver(&self, job: &PrintJob) -> PrintResult<usize> {
        let printer = OpenPrinter::open(&self.api, job.printer_name())?;
        let doc = printer.start_doc(job.label())?;
        let page = doc.start_page()?;
        page.write(job.payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Script {
        fail: Option<SpoolStep>,
        short_write: bool,
    }

    /// Records every native call in order
    #[derive(Default)]
    struct RecordingSpooler {
        script: Script,
        calls: parking_lot::Mutex<Vec<SpoolStep>>,
        written: parking_lot::Mutex<Vec<u8>>,
    }

    impl RecordingSpooler {
        fn failing_at(step: SpoolStep) -> Self {
            Self {
                script: Script {
                    fail: Some(step),
                    short_write: false,
                },
                ..Default::default()
            }
        }

        fn record(&self, step: SpoolStep) -> bool {
            self.calls.lock().push(step);
            self.script.fail != Some(step)
        }

        fn calls(&self) -> Vec<SpoolStep> {
            self.calls.lock().clone()
        }

        fn count(&self, step: SpoolStep) -> usize {
            self.calls().iter().filter(|s| **s == step).count()
        }
    }

    impl SpoolApi for RecordingSpooler {
        type Handle = u32;

        fn enum_printers(&self) -> PrintResult<Vec<String>> {
            Ok(vec!["Receipt".into()])
        }

        fn default_printer(&self) -> PrintResult<Option<String>> {
            Ok(Some("Receipt".into()))
        }

        fn open(&self, _printer: &str) -> Option<u32> {
            self.record(SpoolStep::Open).then_some(7)
        }

        fn start_doc(&self, handle: u32, _doc_name: &str, data_type: &str) -> bool {
            assert_eq!(handle, 7);
            assert_eq!(data_type, "RAW");
            self.record(SpoolStep::StartDoc)
        }

        fn start_page(&self, _handle: u32) -> bool {
            self.record(SpoolStep::StartPage)
        }

        fn write(&self, _handle: u32, data: &[u8]) -> Option<usize> {
            if !self.record(SpoolStep::Write) {
                return None;
            }
            self.written.lock().extend_from_slice(data);
            if self.script.short_write {
                Some(data.len().saturating_sub(1))
            } else {
                Some(data.len())
            }
        }

        fn end_page(&self, _handle: u32) -> bool {
            self.record(SpoolStep::EndPage)
        }

        fn end_doc(&self, _handle: u32) -> bool {
            self.record(SpoolStep::EndDoc)
        }

        fn close(&self, _handle: u32) -> bool {
            self.record(SpoolStep::Close)
        }
    }

    fn job() -> PrintJob {
        PrintJob::new("Receipt", "test job", b"\x1b@hello".to_vec())
    }

    #[test]
    fn test_successful_job_runs_full_sequence() {
        let transport = RawTransport::new(RecordingSpooler::default());
        assert!(transport.send(&job()));
        assert_eq!(
            transport.api().calls(),
            vec![
                SpoolStep::Open,
                SpoolStep::StartDoc,
                SpoolStep::StartPage,
                SpoolStep::Write,
                SpoolStep::EndPage,
                SpoolStep::EndDoc,
                SpoolStep::Close,
            ]
        );
        assert_eq!(*transport.api().written.lock(), b"\x1b@hello".to_vec());
    }

    #[test]
    fn test_write_failure_still_ends_page_doc_and_closes() {
        let transport = RawTransport::new(RecordingSpooler::failing_at(SpoolStep::Write));
        assert!(!transport.send(&job()));

        let api = transport.api();
        assert_eq!(api.count(SpoolStep::EndPage), 1);
        assert_eq!(api.count(SpoolStep::EndDoc), 1);
        assert_eq!(api.count(SpoolStep::Close), 1);
        assert_eq!(
            api.calls(),
            vec![
                SpoolStep::Open,
                SpoolStep::StartDoc,
                SpoolStep::StartPage,
                SpoolStep::Write,
                SpoolStep::EndPage,
                SpoolStep::EndDoc,
                SpoolStep::Close,
            ]
        );
    }

    #[test]
    fn test_open_failure_runs_no_cleanup() {
        let transport = RawTransport::new(RecordingSpooler::failing_at(SpoolStep::Open));
        assert!(!transport.send(&job()));
        assert_eq!(transport.api().calls(), vec![SpoolStep::Open]);
    }

    #[test]
    fn test_start_doc_failure_only_closes() {
        let transport = RawTransport::new(RecordingSpooler::failing_at(SpoolStep::StartDoc));
        assert!(!transport.send(&job()));
        assert_eq!(
            transport.api().calls(),
            vec![SpoolStep::Open, SpoolStep::StartDoc, SpoolStep::Close]
        );
    }

    #[test]
    fn test_start_page_failure_ends_doc_and_closes() {
        let transport = RawTransport::new(RecordingSpooler::failing_at(SpoolStep::StartPage));
        assert!(!transport.send(&job()));
        assert_eq!(
            transport.api().calls(),
            vec![
                SpoolStep::Open,
                SpoolStep::StartDoc,
                SpoolStep::StartPage,
                SpoolStep::EndDoc,
                SpoolStep::Close,
            ]
        );
    }

    #[test]
    fn test_cleanup_failure_does_not_fail_delivered_job() {
        let transport = RawTransport::new(RecordingSpooler::failing_at(SpoolStep::Close));
        assert!(transport.send(&job()));
        assert_eq!(transport.api().count(SpoolStep::Close), 1);
    }

    #[test]
    fn test_short_write_is_failure() {
        let api = RecordingSpooler {
            script: Script {
                fail: None,
                short_write: true,
            },
            ..Default::default()
        };
        let transport = RawTransport::new(api);
        assert!(!transport.send(&job()));
        assert_eq!(transport.api().count(SpoolStep::Close), 1);
    }

    #[test]
    fn test_locks_are_keyed_case_insensitively() {
        let locks = PrinterLocks::new();
        let a = locks.lock_for("Kitchen");
        let b = locks.lock_for("kitchen ");
        let c = locks.lock_for("Front");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    /// Spooler that detects two jobs inside the Open..Close window at once
    #[derive(Default)]
    struct OverlapSpooler {
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    impl SpoolApi for OverlapSpooler {
        type Handle = ();

        fn enum_printers(&self) -> PrintResult<Vec<String>> {
            Ok(Vec::new())
        }

        fn default_printer(&self) -> PrintResult<Option<String>> {
            Ok(None)
        }

        fn open(&self, _printer: &str) -> Option<()> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            Some(())
        }

        fn start_doc(&self, _: (), _: &str, _: &str) -> bool {
            true
        }

        fn start_page(&self, _: ()) -> bool {
            true
        }

        fn write(&self, _: (), data: &[u8]) -> Option<usize> {
            std::thread::sleep(Duration::from_millis(5));
            Some(data.len())
        }

        fn end_page(&self, _: ()) -> bool {
            true
        }

        fn end_doc(&self, _: ()) -> bool {
            true
        }

        fn close(&self, _: ()) -> bool {
            self.active.fetch_sub(1, Ordering::SeqCst);
            true
        }
    }

    #[test]
    fn test_same_printer_jobs_never_interleave() {
        let transport = Arc::new(RawTransport::new(OverlapSpooler::default()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let transport = Arc::clone(&transport);
                std::thread::spawn(move || {
                    transport.send(&PrintJob::new("Kitchen", format!("job {i}"), vec![0u8; 4]))
                })
            })
            .collect();

        for h in handles {
            assert!(h.join().unwrap());
        }
        assert_eq!(transport.api().max_active.load(Ordering::SeqCst), 1);
    }
}
