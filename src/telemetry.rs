//! Telemetry helpers for hosts embedding `linechart-rs`.
//!
//! The engine only emits `tracing` events; installing a subscriber is the
//! host's call. `init_default_tracing` is a convenience for demos and tests.

/// Installs a compact `tracing` subscriber filtered by `RUST_LOG`
/// (default `linechart_rs=info`) when the `telemetry` feature is enabled.
///
/// Returns `false` when the feature is disabled or a global subscriber was
/// already installed by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("linechart_rs=info"));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
