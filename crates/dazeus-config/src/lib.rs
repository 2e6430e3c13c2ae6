//! Shared configuration for DaZeus core clients.
//!
//! [`Config`] is layered by `ortho_config`: built-in defaults, then an
//! optional configuration file, then `DAZEUS_*` environment variables, then
//! command-line flags. The library itself only needs the socket endpoint; the
//! logging settings drive [`tracing`](https://docs.rs/tracing) initialisation
//! in binaries.

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod logging;
mod socket;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_TCP_PORT, default_log_filter, default_log_filter_string,
    default_log_format, default_socket_endpoint,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use socket::{SocketEndpoint, SocketParseError};

/// Client configuration shared by the library and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "DAZEUS")]
pub struct Config {
    /// Socket on which the core accepts plugin connections.
    #[ortho_config(default = default_socket_endpoint())]
    pub core_socket: SocketEndpoint,
    /// `tracing` filter expression, for example `dazeus=debug`.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format of log records.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            core_socket: default_socket_endpoint(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Socket endpoint of the core.
    #[must_use]
    pub const fn core_socket(&self) -> &SocketEndpoint {
        &self.core_socket
    }

    /// Configured log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
