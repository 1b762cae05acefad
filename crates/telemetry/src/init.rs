// Path: crates/telemetry/src/init.rs
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};
use xchain_types::config::CoreConfig;

/// Parses an `EnvFilter` directive string such as `"info,xchain::tx=debug"`.
pub fn parse_filter(directives: &str) -> Result<EnvFilter, anyhow::Error> {
    Ok(EnvFilter::try_new(directives)?)
}

/// Initializes the global `tracing` subscriber for structured JSON logging.
///
/// `RUST_LOG` wins over `default_filter` when set. Records emitted through
/// the `log` facade are forwarded to the same subscriber. Fails if a global
/// subscriber or logger is already installed.
pub fn init_tracing(default_filter: &str) -> Result<(), anyhow::Error> {
    let fmt_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true);
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(default_filter)?,
    };
    let subscriber = Registry::default().with(filter).with(fmt_layer);
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;
    log::debug!("structured logging initialised");
    Ok(())
}

/// Initializes logging with the filter named in the node configuration.
pub fn init_from_config(config: &CoreConfig) -> Result<(), anyhow::Error> {
    init_tracing(&config.log_filter)
}
