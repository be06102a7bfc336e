use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use tradepost_core::config::{ClientConfig, DEFAULT_LOG_LEVEL};
use tradepost_infrastructure::TradepostPaths;

const LOG_FILE_PREFIX: &str = "tradepost.log";

/// Installs the global subscriber: stderr always, plus a daily file under
/// `logs/` when `log_to_file` is set. Keep the guard alive until exit.
pub fn init(config: &ClientConfig, paths: &TradepostPaths) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    if !config.log_to_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()?;
        return Ok(None);
    }

    let logs_dir = paths.logs_dir();
    std::fs::create_dir_all(&logs_dir)?;
    let appender = tracing_appender::rolling::daily(&logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()?;

    tracing::debug!("[Logging] Writing logs to {}", logs_dir.display());
    Ok(Some(guard))
}
