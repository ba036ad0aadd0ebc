use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "homestorage_identity=debug,sqlx=warn";

/// Installs the global tracing subscriber
///
/// The filter comes from `RUST_LOG` when set. Returns `false` if a
/// subscriber was already installed.
pub fn init_tracing() -> bool {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .try_init()
    .is_ok()
}
