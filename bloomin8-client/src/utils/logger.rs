//! Logging configuration using tracing.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crates whose chatter is held at `warn` unless `RUST_LOG` asks otherwise.
const NOISY_CRATES: &[&str] = &["reqwest", "hyper", "hyper_util", "btleplug", "bluez_async"];

/// The tool's own crates, raised to `debug` by [`verbose_level`].
const OWN_CRATES: &[&str] = &["bloomin8_client", "bloomin8_sync"];

/// Level for verbose runs: `debug` for the tool's crates, `info` elsewhere.
pub fn verbose_level() -> String {
    let mut parts = vec!["info".to_string()];
    parts.extend(OWN_CRATES.iter().map(|c| format!("{c}=debug")));
    parts.join(",")
}

/// Build the filter directive string for a base level.
fn directives(level: &str) -> String {
    let mut parts = vec![level.to_string()];
    parts.extend(NOISY_CRATES.iter().map(|c| format!("{c}=warn")));
    parts.join(",")
}

/// Initialize logging with the specified level.
///
/// Only binaries call this; library code just emits `tracing` events.
pub fn init(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives(level)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time(),
        )
        .try_init()?;

    Ok(())
}
