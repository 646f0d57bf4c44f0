use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::core::error::StartupError;

/// Log file name inside `<data_dir>/logs`
pub const LOG_FILE_NAME: &str = "print-bridge.log";

/// Bridge configuration - loaded once at startup, read-only afterwards
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | BRIDGE_DATA_DIR | `%ProgramData%\PrintBridge` / `/var/lib/print-bridge` | Shared data directory (logs, certs) |
/// | BRIDGE_BIND_ADDR | 127.0.0.1 | Listener address |
/// | BRIDGE_PORT | 49001 | Preferred HTTPS port |
/// | BRIDGE_PORT_MAX_TRIES | 20 | Ports probed from the preferred one |
/// | BRIDGE_HTTPS_ENABLED | true | Serve HTTPS |
/// | BRIDGE_HTTP_ENABLED | false | Also serve plaintext HTTP |
/// | BRIDGE_HTTP_PORT | HTTPS port + 1 | Preferred plaintext port |
/// | BRIDGE_TOKEN | - | Shared secret; unset rejects every request |
/// | BRIDGE_DEFAULT_PRINTER | - | Printer used when a request names none |
/// | BRIDGE_DRAWER_PIN | 0 | Default drawer pin (0 or 1) |
/// | BRIDGE_CERT_PATH | - | Explicit TLS certificate bundle |
/// | BRIDGE_CERT_PASSWORD | - | Password for a PKCS#12 bundle |
/// | BRIDGE_ALLOWED_ORIGIN | - | Single CORS origin |
/// | LOG_LEVEL | info | Log filter (RUST_LOG wins) |
/// | LOG_JSON | false | JSON console output |
///
/// # Example
///
/// ```ignore
/// BRIDGE_TOKEN=secret BRIDGE_DEFAULT_PRINTER="Receipt Printer" print-bridge
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub bind_address: IpAddr,
    pub https_port: u16,
    pub port_max_tries: u16,
    pub https_enabled: bool,
    pub http_enabled: bool,
    pub http_port: Option<u16>,
    pub token: Option<String>,
    pub default_printer: Option<String>,
    pub default_drawer_pin: i64,
    /// `BRIDGE_DRAWER_PIN` as written, checked by [`Config::validate`]
    pub drawer_pin_setting: Option<String>,
    pub cert_path: Option<PathBuf>,
    pub cert_password: Option<String>,
    pub allowed_origin: Option<String>,
    pub log_level: String,
    pub log_json: bool,
}

fn default_data_dir() -> PathBuf {
    #[cfg(windows)]
    {
        let base = std::env::var_os("ProgramData").unwrap_or_else(|| "C:\\ProgramData".into());
        PathBuf::from(base).join("PrintBridge")
    }

    #[cfg(not(windows))]
    {
        PathBuf::from("/var/lib/print-bridge")
    }
}

impl Config {
    /// Load from process environment (after `.env`, if present)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let parse_or = |key: &str, default| get(key).and_then(|v| v.parse().ok()).unwrap_or(default);
        let drawer_pin_setting = get("BRIDGE_DRAWER_PIN");

        Self {
            data_dir: get("BRIDGE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
            bind_address: get("BRIDGE_BIND_ADDR")
                .and_then(|v| v.parse().ok())
                .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            https_port: get("BRIDGE_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(49001),
            port_max_tries: get("BRIDGE_PORT_MAX_TRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            https_enabled: parse_or("BRIDGE_HTTPS_ENABLED", true),
            http_enabled: parse_or("BRIDGE_HTTP_ENABLED", false),
            http_port: get("BRIDGE_HTTP_PORT").and_then(|v| v.parse().ok()),
            token: get("BRIDGE_TOKEN"),
            default_printer: get("BRIDGE_DEFAULT_PRINTER"),
            default_drawer_pin: drawer_pin_setting
                .as_deref()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            drawer_pin_setting,
            cert_path: get("BRIDGE_CERT_PATH").map(PathBuf::from),
            cert_password: get("BRIDGE_CERT_PASSWORD"),
            allowed_origin: get("BRIDGE_ALLOWED_ORIGIN"),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: parse_or("LOG_JSON", false),
        }
    }

    /// Reject settings that can never work
    pub fn validate(&self) -> Result<(), StartupError> {
        if let Some(raw) = &self.drawer_pin_setting
            && raw.parse::<i64>().is_err()
        {
            return Err(StartupError::Configuration(format!(
                "BRIDGE_DRAWER_PIN must be 0 or 1, got {raw:?}"
            )));
        }
        if !(0..=1).contains(&self.default_drawer_pin) {
            return Err(StartupError::Configuration(format!(
                "BRIDGE_DRAWER_PIN must be 0 or 1, got {}",
                self.default_drawer_pin
            )));
        }
        if self.port_max_tries == 0 {
            return Err(StartupError::Configuration(
                "BRIDGE_PORT_MAX_TRIES must be at least 1".into(),
            ));
        }
        if !self.https_enabled && !self.http_enabled {
            return Err(StartupError::Configuration(
                "Both HTTPS and HTTP listeners are disabled".into(),
            ));
        }
        if let Some(origin) = &self.allowed_origin
            && http::HeaderValue::from_str(origin).is_err()
        {
            return Err(StartupError::Configuration(format!(
                "BRIDGE_ALLOWED_ORIGIN is not a valid origin: {origin}"
            )));
        }
        Ok(())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// The single append-only operational log
    pub fn log_file_path(&self) -> PathBuf {
        self.log_dir().join(LOG_FILE_NAME)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
