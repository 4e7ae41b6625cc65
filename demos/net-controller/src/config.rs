use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::Level;

/// Environment variable holding the max log level (`trace`, `debug`, `info`, `warn`, `error`)
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

pub fn log_level() -> Result<Level> { parse_log_level(std::env::var(LOG_LEVEL_VAR).ok().as_deref()) }

/// Unset means `INFO`. A value that is set but unparsable is an error rather than a silent default.
pub fn parse_log_level(value: Option<&str>) -> Result<Level> {
    match value {
        None => Ok(Level::INFO),
        Some(value) => Level::from_str(value.trim()).with_context(|| format!("invalid {LOG_LEVEL_VAR} value {value:?}")),
    }
}
