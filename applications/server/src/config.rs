/// Server configuration
use crate::error::{Result, ServerError};
use podshelf_core::ProgressPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_progress")]
    pub progress: ProgressSettings,

    #[serde(default = "default_api")]
    pub api: ApiSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

/// Session recorder tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProgressSettings {
    /// A position jump strictly greater than this records a session
    #[serde(default = "default_session_threshold_seconds")]
    pub session_threshold_seconds: f64,

    /// Rolling window of sessions kept per listening record
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_history_limit")]
    pub default_history_limit: i64,

    #[serde(default = "default_max_history_limit")]
    pub max_history_limit: i64,
}

impl ProgressSettings {
    pub fn policy(&self) -> ProgressPolicy {
        ProgressPolicy {
            session_threshold_seconds: self.session_threshold_seconds,
            max_sessions: self.max_sessions,
        }
    }
}

impl ServerConfig {
    /// Load configuration from an explicit file (or `config.toml` if present)
    /// and environment
    ///
    /// Environment variables are prefixed with `PODSHELF_` and use `__`
    /// between section and key, e.g. `PODSHELF_STORAGE__DATABASE_URL`.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from("config.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("PODSHELF")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.trim().is_empty() {
            return Err(ServerError::Config(
                "database URL is required (set PODSHELF_STORAGE__DATABASE_URL)".to_string(),
            ));
        }

        let threshold = self.progress.session_threshold_seconds;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ServerError::Config(format!(
                "progress.session_threshold_seconds must be positive, got {threshold}"
            )));
        }

        if self.progress.max_sessions == 0 {
            return Err(ServerError::Config(
                "progress.max_sessions must be at least 1".to_string(),
            ));
        }

        if self.api.max_history_limit < 1 {
            return Err(ServerError::Config(
                "api.max_history_limit must be at least 1".to_string(),
            ));
        }

        if !(1..=self.api.max_history_limit).contains(&self.api.default_history_limit) {
            return Err(ServerError::Config(format!(
                "api.default_history_limit must be between 1 and {}",
                self.api.max_history_limit
            )));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/podshelf.db".to_string()
}

fn default_progress() -> ProgressSettings {
    ProgressSettings {
        session_threshold_seconds: default_session_threshold_seconds(),
        max_sessions: default_max_sessions(),
    }
}

fn default_session_threshold_seconds() -> f64 {
    podshelf_core::progress::DEFAULT_SESSION_THRESHOLD_SECONDS
}

fn default_max_sessions() -> usize {
    podshelf_core::progress::DEFAULT_MAX_SESSIONS
}

fn default_api() -> ApiSettings {
    ApiSettings {
        default_history_limit: default_history_limit(),
        max_history_limit: default_max_history_limit(),
    }
}

fn default_history_limit() -> i64 {
    20
}

fn default_max_history_limit() -> i64 {
    100
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            progress: default_progress(),
            api: default_api(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ServerConfig::default();
        config.validate().unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.progress.policy(), ProgressPolicy::default());
    }

    #[test]
    fn rejects_bad_progress_settings() {
        let mut config = ServerConfig::default();
        config.progress.session_threshold_seconds = 0.0;
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));

        let mut config = ServerConfig::default();
        config.progress.max_sessions = 0;
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn rejects_history_default_above_max() {
        let mut config = ServerConfig::default();
        config.api.default_history_limit = 500;
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn loads_partial_file_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("podshelf.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9000\n\n[progress]\nmax_sessions = 50\n"
        )
        .unwrap();

        let config = ServerConfig::load_from(Some(&path)).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.progress.max_sessions, 50);
        assert_eq!(config.api.default_history_limit, 20);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ServerConfig::load_from(Some(&dir.path().join("absent.toml")));

        assert!(matches!(result, Err(ServerError::Config(_))));
    }
}
