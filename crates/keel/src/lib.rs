//! Public surface for keel.
//!
//! Re-exports the building blocks and provides the [`Engine`] that wires the
//! store, the gateway, and the workflow together for frontends.

mod engine;

/// Re-export for convenience.
pub use keel_config as config;
pub use keel_core as core;
/// Re-export for convenience.
pub use keel_gateway as gateway;
/// Re-export for convenience.
pub use keel_store as store;

pub use engine::{Command, Engine};

#[inline]
/// Initialize logging via env_logger.
///
/// Binaries should call this early in startup so log output is wired up
/// before anything interesting happens.
pub fn init_logging() {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
}
