//! Target printer resolution

use crate::directory::PrinterDirectory;
use crate::error::{PrintError, PrintResult};

fn non_blank(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|n| !n.is_empty())
}

/// Pick the printer a request targets.
///
/// Precedence: explicit request name, then the configured default, then the
/// OS default printer. The OS is only queried when the first two are blank.
/// Existence of the returned name is not checked here.
pub fn resolve_printer_name<D>(
    requested: Option<&str>,
    configured_default: Option<&str>,
    directory: &D,
) -> PrintResult<String>
where
    D: PrinterDirectory + ?Sized,
{
    if let Some(name) = non_blank(requested).or_else(|| non_blank(configured_default)) {
        return Ok(name.to_string());
    }

    directory
        .default_printer_name()?
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or(PrintError::NoPrinterConfigured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::PrinterDescriptor;
    use std::cell::Cell;

    struct OsDefault {
        name: Option<&'static str>,
        queried: Cell<bool>,
    }

    impl OsDefault {
        fn new(name: Option<&'static str>) -> Self {
            Self {
                name,
                queried: Cell::new(false),
            }
        }
    }

    impl PrinterDirectory for OsDefault {
        fn list_printers(&self) -> PrintResult<Vec<PrinterDescriptor>> {
            Ok(Vec::new())
        }

        fn default_printer_name(&self) -> PrintResult<Option<String>> {
            self.queried.set(true);
            Ok(self.name.map(String::from))
        }
    }

    #[test]
    fn test_explicit_request_wins() {
        let os = OsDefault::new(Some("Office"));
        assert_eq!(
            resolve_printer_name(Some("Kitchen"), Some("Front"), &os).unwrap(),
            "Kitchen"
        );
        assert!(!os.queried.get());
    }

    #[test]
    fn test_configured_default_second() {
        let os = OsDefault::new(Some("Office"));
        assert_eq!(resolve_printer_name(None, Some("Front"), &os).unwrap(), "Front");
        assert_eq!(
            resolve_printer_name(Some("   "), Some("Front"), &os).unwrap(),
            "Front"
        );
    }

    #[test]
    fn test_os_default_last() {
        let os = OsDefault::new(Some("Office"));
        assert_eq!(resolve_printer_name(None, None, &os).unwrap(), "Office");
        assert_eq!(resolve_printer_name(Some(""), Some(" "), &os).unwrap(), "Office");
        assert!(os.queried.get());
    }

    #[test]
    fn test_nothing_configured() {
        let os = OsDefault::new(None);
        assert!(matches!(
            resolve_printer_name(None, None, &os),
            Err(PrintError::NoPrinterConfigured)
        ));
    }
}
