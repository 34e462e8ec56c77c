//! Integration test crate for Framecut.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It drives the timeline through framecut-media probes and checks the
//! editing model end to end.

#[cfg(test)]
mod timeline;

#[cfg(test)]
mod properties;

/// Install a `tracing` subscriber honoring `RUST_LOG`, once per process.
#[cfg(test)]
pub(crate) fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}
