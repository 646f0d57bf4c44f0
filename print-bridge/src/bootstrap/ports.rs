//! Port probing

use std::net::{IpAddr, TcpListener};

use tracing::debug;

use crate::core::StartupError;

/// Whether a listener can currently be bound (and released) on `addr:port`
pub fn is_port_free(addr: IpAddr, port: u16) -> bool {
    TcpListener::bind((addr, port)).is_ok()
}

/// First bindable port in `[preferred, preferred + max_tries)`, clamped to 65535.
///
/// Ports listed in `exclude` are skipped without probing. The probe socket is
/// released immediately, so another process may still take the port before
/// the real listener binds it.
pub fn find_free_port(
    addr: IpAddr,
    preferred: u16,
    max_tries: u16,
    exclude: &[u16],
) -> Result<u16, StartupError> {
    let start = preferred;
    let last = u32::from(preferred) + u32::from(max_tries).saturating_sub(1);
    let end = last.min(u32::from(u16::MAX)) as u16;

    if max_tries > 0 && preferred != 0 {
        for port in start..=end {
            if exclude.contains(&port) {
                continue;
            }
            if is_port_free(addr, port) {
                return Ok(port);
            }
            debug!(port, "Port busy, trying next");
        }
    }

    Err(StartupError::NoFreePort { start, end })
}
