//! Logger configuration: output directory, naming function, host identifier.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::naming::{NamingFn, sanitize};

/// Directory used by [`LoggerConfig::from_env`] when `EXCHANGE_LOG_DIR` is unset.
pub const DEFAULT_LOG_DIR: &str = "http-logs";

/// Environment variable naming the log directory.
pub const LOG_DIR_ENV: &str = "EXCHANGE_LOG_DIR";

/// Environment variable overriding the host identifier.
pub const LOG_HOST_ENV: &str = "EXCHANGE_LOG_HOST";

const FALLBACK_HOST: &str = "localhost";

/// Options for an [`ExchangeLogger`](crate::ExchangeLogger).
#[derive(Clone)]
pub struct LoggerConfig {
    /// Base directory for every log artifact.
    pub dir: PathBuf,
    /// Naming function; [`default_filename`](crate::naming::default_filename) when `None`.
    pub naming: Option<Arc<dyn NamingFn>>,
    /// Host identifier used in file names; the machine host name when `None`.
    pub host: Option<String>,
}

impl LoggerConfig {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            naming: None,
            host: None,
        }
    }

    /// Reads `EXCHANGE_LOG_DIR` and `EXCHANGE_LOG_HOST`.
    #[must_use]
    pub fn from_env() -> Self {
        let dir = std::env::var_os(LOG_DIR_ENV)
            .filter(|value| !value.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_LOG_DIR), PathBuf::from);
        let host = std::env::var(LOG_HOST_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty());
        Self {
            dir,
            naming: None,
            host,
        }
    }

    #[must_use]
    pub fn with_naming(mut self, naming: impl NamingFn + 'static) -> Self {
        self.naming = Some(Arc::new(naming));
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("dir", &self.dir)
            .field("naming", &self.naming.as_ref().map(|_| "<custom>"))
            .field("host", &self.host)
            .finish()
    }
}

/// Resolves the sanitized host identifier used in file names.
///
/// Order: explicit override, `HOSTNAME`, `COMPUTERNAME`, `/etc/hostname`,
/// then `localhost`. Candidates that sanitize to an empty string are skipped.
#[must_use]
pub fn resolve_host(override_host: Option<&str>) -> String {
    let from_env = |key: &str| std::env::var(key).ok();
    let from_file = || std::fs::read_to_string("/etc/hostname").ok();

    override_host
        .map(sanitize)
        .filter(|host| !host.is_empty())
        .or_else(|| non_empty(from_env("HOSTNAME")))
        .or_else(|| non_empty(from_env("COMPUTERNAME")))
        .or_else(|| non_empty(from_file()))
        .unwrap_or_else(|| FALLBACK_HOST.to_string())
}

fn non_empty(candidate: Option<String>) -> Option<String> {
    candidate
        .map(|value| sanitize(value.trim()))
        .filter(|host| !host.is_empty())
}
