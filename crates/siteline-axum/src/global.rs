//! Process-wide client used by the middleware
//!
//! Lifecycle: the first call to [`init`] (or the first request through
//! [`track_pageview`](crate::track_pageview)) resolves options and settles the
//! state. Every later call is a no-op until [`reset`] is called.

use std::sync::{Mutex, MutexGuard};

use siteline_core::{PartialOptions, Siteline};

use crate::config::resolve_options;

enum State {
    Uninitialized,
    /// Initialization ran but produced no client
    Disabled,
    Ready(Siteline),
}

static STATE: Mutex<State> = Mutex::new(State::Uninitialized);

fn lock() -> MutexGuard<'static, State> {
    STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Initialize the shared client once
///
/// Explicit options take precedence over `SITELINE_*` environment variables.
/// A missing or invalid website key logs a warning and leaves tracking off;
/// it never fails the host application.
pub fn init(explicit: PartialOptions) -> Option<Siteline> {
    let mut state = lock();
    match &*state {
        State::Ready(client) => return Some(client.clone()),
        State::Disabled => return None,
        State::Uninitialized => {}
    }

    let client = build_client(explicit);
    *state = match &client {
        Some(client) => State::Ready(client.clone()),
        None => State::Disabled,
    };
    client
}

/// Install a prebuilt client, unless one is already set up
pub fn init_with(client: Siteline) -> Siteline {
    let mut state = lock();
    if let State::Ready(existing) = &*state {
        return existing.clone();
    }
    *state = State::Ready(client.clone());
    client
}

/// Shared client, if initialization produced one
pub fn client() -> Option<Siteline> {
    match &*lock() {
        State::Ready(client) => Some(client.clone()),
        _ => None,
    }
}

pub fn is_initialized() -> bool {
    !matches!(&*lock(), State::Uninitialized)
}

/// Drop the shared client and return to the uninitialized state
pub fn reset() {
    *lock() = State::Uninitialized;
}

fn build_client(explicit: PartialOptions) -> Option<Siteline> {
    let Some(options) = resolve_options(explicit) else {
        tracing::warn!(target: "siteline", "[Siteline] Missing websiteKey in config or environment");
        return None;
    };

    match Siteline::new(options) {
        Ok(client) => Some(client),
        Err(err) => {
            tracing::warn!(target: "siteline", "[Siteline] Failed to initialize: {}", err);
            None
        }
    }
}
