use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, Once};
use tracing_subscriber::EnvFilter;

pub(crate) const LOG_ENV: &str = "EXPENSETUI_LOG";

static TRACING_INIT: Once = Once::new();

/// Build the filter: `EXPENSETUI_LOG` wins, then the configured level, then `info`.
pub(crate) fn filter_for(env_value: Option<&str>, configured: &str) -> EnvFilter {
    env_value
        .and_then(|v| EnvFilter::try_new(v).ok())
        .or_else(|| EnvFilter::try_new(configured).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Route `tracing` output to `log_file`. The terminal belongs to the TUI, so
/// nothing is written to stdout or stderr.
pub(crate) fn init(log_file: &Path, configured_level: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file: {}", log_file.display()))?;

    let env_value = std::env::var(LOG_ENV).ok();
    let filter = filter_for(env_value.as_deref(), configured_level);

    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false)
            .try_init();
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_value_wins() {
        let filter = filter_for(Some("debug"), "warn");
        assert_eq!(filter.to_string(), EnvFilter::new("debug").to_string());
    }

    #[test]
    fn test_configured_level_used_without_env() {
        let filter = filter_for(None, "warn");
        assert_eq!(filter.to_string(), EnvFilter::new("warn").to_string());
    }

    #[test]
    fn test_garbage_falls_back() {
        let filter = filter_for(Some("expensetui=loud"), "db=verbose");
        assert_eq!(filter.to_string(), EnvFilter::new("info").to_string());
    }
}
