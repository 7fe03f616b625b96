//! Runtime configuration loaded from environment variables and CLI flags.

use std::path::PathBuf;

/// CSV shipped alongside the dashboard.
pub const DEFAULT_DATA_FILE: &str = "Station_Agroclim_INRAE_11170004_daily_1989_2024.csv";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8501;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Path of the daily climate CSV (from AGROCLIM_DATA)
    pub data_path: PathBuf,
    /// Interface to listen on (from AGROCLIM_HOST)
    pub host: String,
    /// Port to listen on (from AGROCLIM_PORT)
    pub port: u16,
    /// Allowed CORS origins (from AGROCLIM_CORS_ORIGINS, comma-separated).
    /// `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: None,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = match lookup("AGROCLIM_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid AGROCLIM_PORT '{}'", raw);
                defaults.port
            }),
            None => defaults.port,
        };

        let cors_origins = lookup("AGROCLIM_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty());

        Self {
            data_path: lookup("AGROCLIM_DATA")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            host: lookup("AGROCLIM_HOST").unwrap_or(defaults.host),
            port,
            cors_origins,
        }
    }

    /// Apply explicit overrides, typically from the command line.
    pub fn with_overrides(
        mut self,
        data_path: Option<PathBuf>,
        host: Option<String>,
        port: Option<u16>,
    ) -> Self {
        if let Some(path) = data_path {
            self.data_path = path;
        }
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
