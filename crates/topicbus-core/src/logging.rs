use tracing_subscriber::{fmt, EnvFilter};

/// Installs the fmt subscriber, filtered by `RUST_LOG` or `info`.
/// Later calls are ignored.
pub fn init_logging() {
    init_logging_with("info");
}

pub fn init_logging_with(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = fmt().with_env_filter(filter).try_init();
}
