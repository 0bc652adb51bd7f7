//! Shared configuration for the Icecap binaries.
//!
//! Settings come from command-line flags, falling back to `ICECAP_*`
//! environment variables and then to built-in defaults:
//!
//! | Setting      | Flag           | Environment         | Default   |
//! |--------------|----------------|---------------------|-----------|
//! | log filter   | `--log-filter` | `ICECAP_LOG_FILTER` | `info`    |
//! | log format   | `--log-format` | `ICECAP_LOG_FORMAT` | `compact` |

mod args;
pub mod defaults;
mod error;
mod logging;

use serde::{Deserialize, Serialize};

pub use self::args::ConfigArgs;
pub use self::defaults::{DEFAULT_LOG_FILTER, default_log_filter_string, default_log_format};
pub use self::error::ConfigError;
pub use self::logging::{LogFormat, LogFormatParseError};

/// Validated settings shared by the binaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Tracing filter directives.
    #[serde(default = "default_log_filter_string")]
    pub(crate) log_filter: String,
    /// Log output format.
    #[serde(default = "default_log_format")]
    pub(crate) log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Returns the tracing filter directives.
    #[must_use]
    pub const fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
