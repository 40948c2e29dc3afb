//! # Siteline for axum
//!
//! Middleware that reports every request handled by an axum [`Router`] to
//! Siteline as a pageview.
//!
//! ```no_run
//! use axum::{middleware, routing::get, Router};
//! use siteline_core::PartialOptions;
//!
//! siteline_axum::init(PartialOptions {
//!     website_key: Some("siteline_secret_0123456789abcdef0123456789abcdef".into()),
//!     ..Default::default()
//! });
//!
//! let app: Router = Router::new()
//!     .route("/", get(|| async { "hello" }))
//!     .layer(middleware::from_fn(siteline_axum::track_pageview));
//! ```
//!
//! Options not given explicitly fall back to `SITELINE_WEBSITE_KEY`,
//! `SITELINE_ENDPOINT` and `SITELINE_DEBUG`. Tracking never changes the
//! response and never fails a request.
//!
//! [`Router`]: axum::Router

pub mod config;
pub mod global;
pub mod ip;
pub mod middleware;

pub use global::{client, init, init_with, is_initialized, reset};
pub use ip::client_ip;
pub use middleware::{track_pageview, track_with, RequestMetadata};
