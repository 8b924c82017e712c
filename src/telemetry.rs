use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// Log level comes from `RUST_LOG`, falling back to `info`. Warm
/// invocations call this again; a subscriber that is already installed is
/// left in place.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().without_time())
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("telemetry initialized");
    }
}
