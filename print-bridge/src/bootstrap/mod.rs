//! Listener bootstrap
//!
//! Picks the ports and the TLS material before anything is bound:
//!
//! - HTTPS on the first free port from `BRIDGE_PORT`, with a discovered certificate
//! - optional plaintext HTTP on its own port, never the HTTPS one
//!
//! The result is frozen into [`ListenerState`] and shared read-only with `/health`.

mod ports;
mod tls;

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;

use axum_server::tls_rustls::RustlsConfig;
use tracing::info;

use crate::core::{Config, StartupError};

pub use ports::{find_free_port, is_port_free};
pub use tls::{CERT_FILE_NAME, certificate_candidates, discover_certificate, load_rustls_config};

/// Chosen listeners, immutable after bootstrap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerState {
    pub bind_address: IpAddr,
    pub https_port: Option<u16>,
    pub http_port: Option<u16>,
    pub certificate_path: Option<PathBuf>,
}

impl ListenerState {
    pub fn https_enabled(&self) -> bool {
        self.https_port.is_some()
    }

    /// URLs a local client can reach, HTTPS first
    pub fn listening_urls(&self) -> Vec<String> {
        let host = match self.bind_address {
            IpAddr::V4(v4) if v4.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(v6) if v6.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
            other => other,
        };

        let https = self
            .https_port
            .map(|port| format!("https://{}", SocketAddr::new(host, port)));
        let http = self
            .http_port
            .map(|port| format!("http://{}", SocketAddr::new(host, port)));

        https.into_iter().chain(http).collect()
    }
}

/// Everything needed to start serving
pub struct Listeners {
    pub state: ListenerState,
    pub tls: Option<RustlsConfig>,
}

/// Resolve certificate and ports from configuration
pub fn prepare(config: &Config) -> Result<Listeners, StartupError> {
    let bind = config.bind_address;
    let tries = config.port_max_tries;

    if !config.https_enabled {
        let preferred = config.http_port.unwrap_or(config.https_port);
        let http_port = find_free_port(bind, preferred, tries, &[])?;
        info!(port = http_port, "HTTPS disabled, plaintext listener only");

        return Ok(Listeners {
            state: ListenerState {
                bind_address: bind,
                https_port: None,
                http_port: Some(http_port),
                certificate_path: None,
            },
            tls: None,
        });
    }

    let certificate_path = discover_certificate(config)?;
    let tls = load_rustls_config(&certificate_path, config.cert_password.as_deref())?;
    info!(path = %certificate_path.display(), "TLS certificate loaded");

    let https_port = find_free_port(bind, config.https_port, tries, &[])?;
    if https_port != config.https_port {
        info!(
            preferred = config.https_port,
            chosen = https_port,
            "Preferred HTTPS port busy"
        );
    }

    let http_port = if config.http_enabled {
        let preferred = config
            .http_port
            .unwrap_or_else(|| https_port.saturating_add(1));
        Some(find_free_port(bind, preferred, tries, &[https_port])?)
    } else {
        None
    };

    Ok(Listeners {
        state: ListenerState {
            bind_address: bind,
            https_port: Some(https_port),
            http_port,
            certificate_path: Some(certificate_path),
        },
        tls: Some(tls),
    })
}
