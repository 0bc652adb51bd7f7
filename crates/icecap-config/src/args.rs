//! Command-line and environment settings.

use std::str::FromStr;

use clap::Args;

use crate::defaults::{DEFAULT_LOG_FILTER, LOG_FILTER_ENV, LOG_FORMAT_ENV};
use crate::error::ConfigError;
use crate::logging::LogFormat;
use crate::Config;

/// Logging settings accepted on the command line, with environment
/// fallbacks. Flatten into a binary's parser with `#[command(flatten)]`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigArgs {
    /// Tracing filter directives, for example `info` or
    /// `icecap_client=debug`.
    #[arg(long = "log-filter", env = LOG_FILTER_ENV, value_name = "FILTER")]
    pub log_filter: Option<String>,
    /// Log output format: `json`, `compact` or `pretty`.
    #[arg(long = "log-format", env = LOG_FORMAT_ENV, value_name = "FORMAT")]
    pub log_format: Option<String>,
}

impl ConfigArgs {
    /// Validates the settings, filling defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyLogFilter`] for a blank filter and
    /// [`ConfigError::InvalidLogFormat`] for an unknown format.
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let log_filter = match self.log_filter {
            Some(filter) if filter.trim().is_empty() => return Err(ConfigError::EmptyLogFilter),
            Some(filter) => filter.trim().to_owned(),
            None => DEFAULT_LOG_FILTER.to_owned(),
        };
        let log_format = match self.log_format {
            Some(value) => LogFormat::from_str(value.trim())
                .map_err(|source| ConfigError::InvalidLogFormat { value, source })?,
            None => LogFormat::default(),
        };
        Ok(Config {
            log_filter,
            log_format,
        })
    }
}
