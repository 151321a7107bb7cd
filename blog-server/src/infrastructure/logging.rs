use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "info,blog_server=debug,blog_client=debug";

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // try_init also routes actix's `log` records (the Logger middleware) into tracing.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .json()
        .try_init();
}
