//! Tracing setup shared by the server and the CLI

use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directives used when `RUST_LOG` is not set
pub fn default_directives(level: &str) -> String {
    format!("climate={},tower_http=debug", level)
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `logging.level`. `logging.format = "json"`
/// selects structured output, anything else the human-readable formatter.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(&config.level)))
        .unwrap_or_else(|_| EnvFilter::new(default_directives("info")));

    let registry = tracing_subscriber::registry().with(filter);

    match config.format.to_lowercase().as_str() {
        "json" => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
