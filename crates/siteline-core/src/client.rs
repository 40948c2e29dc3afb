//! Main beacon client

use std::any::Any;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::config::{ClientConfig, SitelineOptions};
use crate::constants::TIMEOUT;
use crate::diagnostics::Diagnostics;
use crate::error::{ConfigError, TransportError};
use crate::events::{PageviewData, SanitizedPageview};
use crate::sanitize::sanitize;
use crate::transport::{BeaconRequest, HttpTransport, Transport};

/// Pageview beacon client
///
/// Cheap to clone; clones share the same immutable configuration and
/// transport.
///
/// Delivery needs a tokio runtime with timers enabled (`enable_time`, or
/// `enable_all` as `#[tokio::main]` does). On a runtime without timers every
/// delivery fails with [`TransportError::Panicked`].
#[derive(Clone)]
pub struct Siteline {
    inner: Arc<Inner>,
}

struct Inner {
    config: ClientConfig,
    diagnostics: Diagnostics,
    transport: Arc<dyn Transport>,
}

impl Siteline {
    /// Create a new client
    ///
    /// Fails if the website key is malformed or the endpoint is not HTTPS.
    /// Performs no network I/O.
    pub fn new(options: SitelineOptions) -> Result<Self, ConfigError> {
        let config = ClientConfig::validate(options)?;
        let transport = HttpTransport::new()?;
        Ok(Self::from_parts(config, Arc::new(transport)))
    }

    /// Create a client that delivers through a custom transport
    pub fn with_transport(
        options: SitelineOptions,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        let config = ClientConfig::validate(options)?;
        Ok(Self::from_parts(config, transport))
    }

    fn from_parts(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let diagnostics = Diagnostics::new(config.debug());
        diagnostics.info("Siteline initialized");

        Self {
            inner: Arc::new(Inner {
                config,
                diagnostics,
                transport,
            }),
        }
    }

    /// Track a pageview without waiting for delivery
    ///
    /// Returns immediately. Delivery runs on a detached tokio task; its
    /// outcome is only visible through debug logging.
    pub fn track(&self, data: PageviewData) {
        let event = sanitize(&data, &self.inner.config);
        let Ok(handle) = self.runtime() else {
            return;
        };

        let inner = Arc::clone(&self.inner);
        handle.clone().spawn(async move {
            // Outcome already reported through diagnostics
            let _ = inner.dispatch_isolated(&handle, event).await;
        });
    }

    /// Deliver a pageview and wait for the classified outcome
    pub async fn send(&self, data: PageviewData) -> Result<(), TransportError> {
        let event = sanitize(&data, &self.inner.config);
        let handle = self.runtime()?;
        Arc::clone(&self.inner).dispatch_isolated(&handle, event).await
    }

    fn runtime(&self) -> Result<Handle, TransportError> {
        Handle::try_current().map_err(|_| {
            let err = TransportError::NoRuntime;
            self.inner.diagnostics.error(&err.to_string());
            err
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Check if debug mode is enabled
    pub fn is_debug(&self) -> bool {
        self.inner.diagnostics.is_enabled()
    }
}

impl Inner {
    /// Run one dispatch on its own task so a panic inside it is reported
    /// like any other failure
    async fn dispatch_isolated(
        self: Arc<Self>,
        handle: &Handle,
        event: SanitizedPageview,
    ) -> Result<(), TransportError> {
        let inner = Arc::clone(&self);
        match handle.spawn(async move { inner.dispatch(event).await }).await {
            Ok(result) => result,
            Err(join_err) => {
                let err = if join_err.is_panic() {
                    TransportError::Panicked(panic_message(join_err.into_panic()))
                } else {
                    TransportError::Cancelled
                };
                self.diagnostics.error(&err.to_string());
                Err(err)
            }
        }
    }

    async fn dispatch(&self, event: SanitizedPageview) -> Result<(), TransportError> {
        let result = self.deliver(&event).await;

        match &result {
            Ok(()) => self.diagnostics.info(&format!("Tracked: {}", event.url)),
            Err(err) => self.diagnostics.error(&err.to_string()),
        }

        result
    }

    async fn deliver(&self, event: &SanitizedPageview) -> Result<(), TransportError> {
        let request = BeaconRequest {
            endpoint: self.config.endpoint().clone(),
            user_agent: self.config.user_agent(),
            body: serde_json::to_vec(event)?,
        };

        let cancel = CancellationToken::new();

        let status = tokio::select! {
            biased;
            result = self.transport.post(request, cancel.clone()) => result?,
            _ = tokio::time::sleep(TIMEOUT) => {
                cancel.cancel();
                return Err(TransportError::Timeout(TIMEOUT));
            }
        };

        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(TransportError::Http(status))
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "delivery task panicked".to_string()
    }
}
