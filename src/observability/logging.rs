//! Structured logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter directives used when `RUST_LOG` is not set.
pub fn default_directives(config: &ObservabilityConfig) -> String {
    let level = if config.logging {
        config.log_level.as_str()
    } else {
        "warn"
    };
    format!("archive_stream={level},tower_http={level}")
}

/// Install the global subscriber. Call once, at startup.
pub fn init_logging(config: &ObservabilityConfig) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(config).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_logging_keeps_warnings() {
        let config = ObservabilityConfig::default();
        assert_eq!(
            default_directives(&config),
            "archive_stream=warn,tower_http=warn"
        );
    }

    #[test]
    fn enabled_logging_uses_level() {
        let config = ObservabilityConfig {
            logging: true,
            log_level: "debug".into(),
            ..Default::default()
        };
        assert_eq!(
            default_directives(&config),
            "archive_stream=debug,tower_http=debug"
        );
    }
}
