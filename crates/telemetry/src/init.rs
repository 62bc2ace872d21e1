// Path: crates/telemetry/src/init.rs
use avlproof_types::config::{LogFormat, TelemetryConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Builds the level filter: `RUST_LOG` wins, then the configured default.
fn build_filter(config: &TelemetryConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.default_filter))
}

/// Initializes the global `tracing` subscriber and bridges `log` records into it.
///
/// Fails if a global subscriber or logger has already been installed.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), anyhow::Error> {
    let filter = build_filter(config);
    tracing_log::LogTracer::init()?;
    match config.log_format {
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339());
            let subscriber = Registry::default().with(filter).with(fmt_layer);
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_writer(std::io::stderr)
                .with_target(true);
            let subscriber = Registry::default().with(filter).with(fmt_layer);
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_installs_once() {
        let config = TelemetryConfig {
            log_format: LogFormat::Pretty,
            default_filter: "debug".into(),
        };
        assert!(init_tracing(&config).is_ok());
        tracing::debug!(target: "iavl_proof", "telemetry initialised");
        assert!(init_tracing(&TelemetryConfig::default()).is_err());
    }
}
