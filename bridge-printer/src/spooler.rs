//! Native spooler primitives
//!
//! [`SpoolApi`] is the thin seam over the OS print spooler: enumeration plus
//! the seven raw job calls. The state machine that sequences them lives in
//! [`crate::transport`]; implementations here only translate single calls.

use crate::error::PrintResult;

/// Spool data type that tells the OS to pass bytes through untouched
pub const RAW_DATATYPE: &str = "RAW";

/// Single-call wrappers around the OS spooler.
///
/// Every job call reports plain success/failure; the caller decides what a
/// failure means for the job. `write` returns the number of bytes the spooler
/// accepted.
pub trait SpoolApi: Send + Sync {
    type Handle: Copy;

    fn enum_printers(&self) -> PrintResult<Vec<String>>;
    fn default_printer(&self) -> PrintResult<Option<String>>;

    fn open(&self, printer: &str) -> Option<Self::Handle>;
    fn start_doc(&self, handle: Self::Handle, doc_name: &str, data_type: &str) -> bool;
    fn start_page(&self, handle: Self::Handle) -> bool;
    fn write(&self, handle: Self::Handle, data: &[u8]) -> Option<usize>;
    fn end_page(&self, handle: Self::Handle) -> bool;
    fn end_doc(&self, handle: Self::Handle) -> bool;
    fn close(&self, handle: Self::Handle) -> bool;
}

/// Windows print spooler (winspool)
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsSpooler;

#[cfg(windows)]
fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

#[cfg(windows)]
impl SpoolApi for WindowsSpooler {
    type Handle = windows::Win32::Graphics::Printing::PRINTER_HANDLE;

    fn enum_printers(&self) -> PrintResult<Vec<String>> {
        use crate::error::PrintError;
        use windows::Win32::Graphics::Printing::{
            EnumPrintersW, PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL, PRINTER_INFO_4W,
        };
        use windows::core::PWSTR;

        unsafe {
            let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
            let mut needed: u32 = 0;
            let mut returned: u32 = 0;

            let _ = EnumPrintersW(flags, None, 4, None, &mut needed, &mut returned);

            if needed == 0 {
                return Ok(Vec::new());
            }

            let mut buf: Vec<u8> = vec![0; needed as usize];
            EnumPrintersW(
                flags,
                None,
                4,
                Some(buf.as_mut_slice()),
                &mut needed,
                &mut returned,
            )
            .map_err(|e| PrintError::DirectoryQueryFailed(format!("EnumPrintersW: {e}")))?;

            let ptr = buf.as_ptr() as *const PRINTER_INFO_4W;
            let slice = std::slice::from_raw_parts(ptr, returned as usize);

            let mut names = Vec::with_capacity(slice.len());
            for info in slice {
                if info.pPrinterName.is_null() {
                    continue;
                }
                let name = PWSTR(info.pPrinterName.0).to_string().unwrap_or_default();
                if !name.trim().is_empty() {
                    names.push(name);
                }
            }

            Ok(names)
        }
    }

    fn default_printer(&self) -> PrintResult<Option<String>> {
        use crate::error::PrintError;
        use windows::Win32::Foundation::{
            ERROR_FILE_NOT_FOUND, ERROR_INVALID_PRINTER_NAME, GetLastError,
        };
        use windows::Win32::Graphics::Printing::GetDefaultPrinterW;
        use windows::core::PWSTR;

        unsafe {
            let mut needed: u32 = 0;
            let _ = GetDefaultPrinterW(None, &mut needed);

            if needed == 0 {
                return Ok(None);
            }

            let mut buf: Vec<u16> = vec![0; needed as usize];
            if !GetDefaultPrinterW(Some(PWSTR(buf.as_mut_ptr())), &mut needed).as_bool() {
                let err = GetLastError();
                if err == ERROR_FILE_NOT_FOUND || err == ERROR_INVALID_PRINTER_NAME {
                    return Ok(None);
                }
                return Err(PrintError::DirectoryQueryFailed(format!(
                    "GetDefaultPrinterW: error {}",
                    err.0
                )));
            }

            let name = PWSTR(buf.as_mut_ptr()).to_string().map_err(|e| {
                PrintError::DirectoryQueryFailed(format!("UTF-16 decode failed: {e}"))
            })?;

            Ok(Some(name).filter(|n| !n.trim().is_empty()))
        }
    }

    fn open(&self, printer: &str) -> Option<Self::Handle> {
        use windows::Win32::Graphics::Printing::{OpenPrinterW, PRINTER_HANDLE};
        use windows::core::PCWSTR;

        let name_w = to_wide(printer);
        let mut handle = PRINTER_HANDLE::default();
        unsafe {
            OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None)
                .ok()
                .map(|_| handle)
        }
    }

    fn start_doc(&self, handle: Self::Handle, doc_name: &str, data_type: &str) -> bool {
        use windows::Win32::Graphics::Printing::{DOC_INFO_1W, StartDocPrinterW};
        use windows::core::PWSTR;

        let doc_name_w = to_wide(doc_name);
        let datatype_w = to_wide(data_type);
        let doc_info = DOC_INFO_1W {
            pDocName: PWSTR(doc_name_w.as_ptr() as *mut _),
            pOutputFile: PWSTR::null(),
            pDatatype: PWSTR(datatype_w.as_ptr() as *mut _),
        };

        unsafe { StartDocPrinterW(handle, 1, &doc_info as *const DOC_INFO_1W) != 0 }
    }

    fn start_page(&self, handle: Self::Handle) -> bool {
        use windows::Win32::Graphics::Printing::StartPagePrinter;
        unsafe { StartPagePrinter(handle).as_bool() }
    }

    fn write(&self, handle: Self::Handle, data: &[u8]) -> Option<usize> {
        use core::ffi::c_void;
        use windows::Win32::Graphics::Printing::WritePrinter;

        let len = u32::try_from(data.len()).ok()?;
        let mut written: u32 = 0;
        let ok = unsafe { WritePrinter(handle, data.as_ptr() as *const c_void, len, &mut written) };
        ok.as_bool().then_some(written as usize)
    }

    fn end_page(&self, handle: Self::Handle) -> bool {
        use windows::Win32::Graphics::Printing::EndPagePrinter;
        unsafe { EndPagePrinter(handle).as_bool() }
    }

    fn end_doc(&self, handle: Self::Handle) -> bool {
        use windows::Win32::Graphics::Printing::EndDocPrinter;
        unsafe { EndDocPrinter(handle).as_bool() }
    }

    fn close(&self, handle: Self::Handle) -> bool {
        use windows::Win32::Graphics::Printing::ClosePrinter;
        unsafe { ClosePrinter(handle).is_ok() }
    }
}
