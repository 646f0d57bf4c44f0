//! Printer directory - installed printers and the OS default

use serde::Serialize;

use crate::error::PrintResult;

/// One installed printer, as seen by a single directory query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterDescriptor {
    pub name: String,
    pub is_default: bool,
}

/// Read access to the set of installed printers.
///
/// Results are never cached: printers can be added or removed at any time,
/// so every call reflects a fresh OS query.
pub trait PrinterDirectory {
    /// Installed printers. Platforms without native printing return an empty list.
    fn list_printers(&self) -> PrintResult<Vec<PrinterDescriptor>>;

    /// OS default printer, `None` when no default is configured
    fn default_printer_name(&self) -> PrintResult<Option<String>>;

    /// Look a printer up by name (case-insensitive) in a fresh snapshot
    fn find_printer(&self, name: &str) -> PrintResult<Option<PrinterDescriptor>> {
        let name = name.trim();
        Ok(self
            .list_printers()?
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name)))
    }
}

/// Pair enumerated names with the default printer from the same query
pub fn describe(names: Vec<String>, default: Option<&str>) -> Vec<PrinterDescriptor> {
    names
        .into_iter()
        .filter(|name| !name.trim().is_empty())
        .map(|name| {
            let is_default = default.is_some_and(|d| d.eq_ignore_ascii_case(&name));
            PrinterDescriptor { name, is_default }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_marks_default() {
        let printers = describe(
            vec!["Kitchen".into(), "Front".into(), "  ".into()],
            Some("front"),
        );
        assert_eq!(
            printers,
            vec![
                PrinterDescriptor {
                    name: "Kitchen".into(),
                    is_default: false
                },
                PrinterDescriptor {
                    name: "Front".into(),
                    is_default: true
                },
            ]
        );
    }

    #[test]
    fn test_descriptor_serializes_camel_case() {
        let json = serde_json::to_value(PrinterDescriptor {
            name: "Office".into(),
            is_default: true,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"name": "Office", "isDefault": true}));
    }
}
