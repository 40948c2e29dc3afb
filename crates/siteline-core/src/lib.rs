//! # Siteline
//!
//! Pageview beacon client for the Siteline intake API.
//!
//! ## Guarantees
//!
//! - **Fail Fast on Config**: a malformed website key or a non-HTTPS endpoint
//!   is rejected when the client is built
//! - **Bounded Payloads**: every field is truncated or clamped, never rejected
//! - **Fire and Forget**: [`Siteline::track`] returns immediately and never
//!   reports an error to the caller
//! - **Bounded Latency**: each beacon is cancelled after 5 seconds
//! - **Silent by Default**: diagnostics only with `debug` enabled
//!
//! ## Usage
//!
//! ```no_run
//! use siteline_core::{PageviewData, Siteline, SitelineOptions};
//!
//! # async fn run() -> Result<(), siteline_core::ConfigError> {
//! let client = Siteline::new(
//!     SitelineOptions::new("siteline_secret_0123456789abcdef0123456789abcdef").debug(true),
//! )?;
//!
//! client.track(
//!     PageviewData::new("https://example.com/pricing", "GET", 200, 42.0)
//!         .with_user_agent("Mozilla/5.0")
//!         .with_ip("203.0.113.7"),
//! );
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod env;
pub mod error;
pub mod events;
pub mod sanitize;
pub mod transport;

pub use client::Siteline;
pub use config::{is_valid_website_key, ClientConfig, SitelineOptions};
pub use env::{resolve_with_env, PartialOptions};
pub use error::{ConfigError, TransportError};
pub use events::{PageviewData, SanitizedPageview};
pub use transport::{BeaconRequest, HttpTransport, Transport};
