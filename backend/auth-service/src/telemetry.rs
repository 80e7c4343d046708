use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "auth_service=info,crypto_core=info,info";

/// Install the global JSON tracing subscriber, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .json()
        .init();
}
