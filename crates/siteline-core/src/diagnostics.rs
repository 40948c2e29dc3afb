//! Debug-gated logging
//!
//! Lines are emitted as `tracing` events on the `siteline` target, and only
//! when the client was built with `debug` on. The host application decides
//! where they go by installing a subscriber.

/// Conditional log sink shared by construction and dispatch
#[derive(Debug, Clone, Copy)]
pub struct Diagnostics {
    enabled: bool,
}

impl Diagnostics {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Initialization and successful sends
    pub fn info(&self, message: &str) {
        if self.enabled {
            tracing::info!(target: "siteline", "[Siteline] {}", message);
        }
    }

    /// Failure statuses, transport failures and dispatch failures
    pub fn error(&self, message: &str) {
        if self.enabled {
            tracing::error!(target: "siteline", "[Siteline] {}", message);
        }
    }
}
