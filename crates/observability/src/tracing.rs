//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for a process embedding the close core, with `info`
/// as the default level.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with_default("info");
}

/// Initialize tracing with an explicit default directive, still overridable
/// via `RUST_LOG`. Useful for close batch jobs that want `closekit=debug`
/// without touching the environment.
pub fn init_with_default(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // JSON logs + timestamps; intent emissions log their type and
    // idempotency key at info level.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
