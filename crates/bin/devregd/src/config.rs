//! Daemon settings.
//!
//! Resolution order, later wins: built-in defaults, then `devreg.toml` in the
//! working directory (optional, unknown keys rejected), then `DEVREG_*`
//! variables, then `RUST_LOG` for the log filter alone.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File consulted by [`Config::load`].
pub const CONFIG_FILE: &str = "devreg.toml";

/// Port the registry has always listened on.
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub listen: Listen,
    pub log: Log,
}

/// Socket the HTTP server binds.
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Listen {
    pub host: String,
    pub port: u16,
}

impl Default for Listen {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: DEFAULT_PORT,
        }
    }
}

impl fmt::Display for Listen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// `tracing` filter directives.
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Log {
    pub filter: String,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            filter: "devregd=info,devreg=info,tower_http=debug".to_owned(),
        }
    }
}

impl Config {
    /// Resolve settings from [`CONFIG_FILE`] and the process environment.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed, or when the
    /// resolved port is zero.
    pub fn load() -> Result<Self, ConfigError> {
        Self::resolve(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
    }

    fn resolve(path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::read(path)?;
        config.override_from(env);
        if config.listen.port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        Ok(config)
    }

    /// A missing file means "all defaults".
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_owned(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    fn override_from(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(host) = env("DEVREG_HOST") {
            self.listen.host = host;
        }
        if let Some(port) = env("DEVREG_PORT").and_then(|raw| raw.parse().ok()) {
            self.listen.port = port;
        }
        // `host:port` in one variable; an unparseable port keeps the current one.
        if let Some((host, port)) = env("DEVREG_BIND")
            .as_deref()
            .and_then(|bind| bind.rsplit_once(':'))
        {
            self.listen.host = host.to_owned();
            self.listen.port = port.parse().unwrap_or(self.listen.port);
        }
        if let Some(filter) = env("DEVREG_LOG") {
            self.log.filter = filter;
        }
        if let Some(filter) = env("RUST_LOG") {
            self.log.filter = filter;
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings in {}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("listen port must be non-zero")]
    ZeroPort,
}
