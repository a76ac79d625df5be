use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset: the service's own crate at debug, sea-orm
/// and sqlx query chatter held back to warn, everything else at info.
pub fn default_filter(service: &str) -> String {
    format!("info,{service}=debug,sea_orm=warn,sqlx=warn")
}

/// Install the JSON stdout subscriber for `service`. Later calls are ignored.
pub fn init_tracing(service: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(service)));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .try_init();
}
