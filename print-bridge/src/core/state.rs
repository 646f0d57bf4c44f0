//! Shared handler state

use std::sync::Arc;

use bridge_printer::PrinterBackend;

use crate::bootstrap::ListenerState;
use crate::core::Config;

/// Everything a handler may read. Cheap to clone; nothing in here changes
/// after bootstrap.
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub listeners: Arc<ListenerState>,
    pub backend: Arc<dyn PrinterBackend>,
}

impl ServerState {
    pub fn new(config: Config, listeners: ListenerState, backend: Arc<dyn PrinterBackend>) -> Self {
        Self {
            config: Arc::new(config),
            listeners: Arc::new(listeners),
            backend,
        }
    }
}
