//! Tracing initialization and subscriber setup.
//!
//! This module configures the tracing subscriber used by embedding
//! applications, wiring span filtering to the environment and emitting
//! human-readable output.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the tracing subscriber for an embedding application.
///
/// Sets up a subscriber pipeline that filters spans via `RUST_LOG` when set,
/// falling back to the supplied default level, and formats events to
/// standard error.
///
/// # Trace Level Resolution
///
/// 1. `RUST_LOG` environment variable (highest priority)
/// 2. `default_level` argument
///
/// # Initialization Behavior
///
/// Idempotent: safe to call multiple times, only the first call takes
/// effect. Library code never calls this on its own; the embedding
/// process (desktop shell, server, tests) decides whether and how to
/// subscribe.
///
/// # Examples
///
/// ```
/// use context_forge_store::observability::init_tracing;
///
/// init_tracing("info");
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    let _ = subscriber.try_init();
}
