use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default database file, looked up in the working directory
pub const DEFAULT_DB_FILE: &str = "bolsa_atleta.db";

/// Default bind address for the dashboard
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Local config file checked before the home-directory one
pub const LOCAL_CONFIG_FILE: &str = "bolsactl.toml";

pub const ENV_DB_PATH: &str = "BOLSACTL_DB_PATH";
pub const ENV_BIND: &str = "BOLSACTL_BIND";

/// Dashboard configuration (`bolsactl.toml` or `~/.bolsactl/config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_secs: u64,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_secs: default_busy_timeout(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub cors_permissive: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            timeout_secs: default_timeout(),
            cors_permissive: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_FILE)
}

fn default_busy_timeout() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    4
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl DashboardConfig {
    /// Load the first config file found, falling back to defaults, then
    /// apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => {
                info!("Loading config from {}", path.display());
                Self::load_from(&path)?
            }
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env();
        Ok(config)
    }

    /// Parse a specific TOML file (no env overrides)
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&content).context("Failed to parse config file (invalid TOML)")
    }

    /// `./bolsactl.toml` wins over `~/.bolsactl/config.toml`
    pub fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        let home = Self::config_path();
        home.exists().then_some(home)
    }

    /// Home config path: ~/.bolsactl/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bolsactl/config.toml")
    }

    /// Apply `BOLSACTL_DB_PATH` / `BOLSACTL_BIND`
    pub fn apply_env(&mut self) {
        if let Ok(path) = env::var(ENV_DB_PATH) {
            if !path.trim().is_empty() {
                self.database.path = PathBuf::from(path);
            }
        }
        if let Ok(bind) = env::var(ENV_BIND) {
            if !bind.trim().is_empty() {
                self.server.bind = bind;
            }
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Write to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .context(format!("Failed to create config directory: {:?}", parent))?;
            }
        }
        fs::write(path, self.to_toml_string()?)
            .context(format!("Failed to write config file: {:?}", path))
    }
}

/// Load environment variables from .env files
///
/// Priority order (highest to lowest):
/// 1. Current directory .env
/// 2. ~/.bolsactl/.env
/// 3. Environment variables already set
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
    }

    if let Some(home_dir) = dirs::home_dir() {
        let env_file = home_dir.join(".bolsactl").join(".env");
        if env_file.exists() {
            // dotenvy doesn't overwrite existing vars
            match dotenvy::from_path(&env_file) {
                Ok(_) => debug!("Loaded .env from {}", env_file.display()),
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.database.path, PathBuf::from("bolsa_atleta.db"));
        assert_eq!(config.database.busy_timeout_secs, 30);
        assert_eq!(config.server.bind, "127.0.0.1:8501");
        assert!(config.cache.enabled);
        assert!(!config.server.cors_permissive);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: DashboardConfig = toml::from_str(
            r#"
            [database]
            path = "/data/bolsa.db"

            [cache]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.database.path, PathBuf::from("/data/bolsa.db"));
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.server.timeout_secs, 30);
        assert!(!config.cache.enabled);
    }

    #[test]
    fn test_save_and_load_from() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = DashboardConfig::default();
        config.server.bind = "0.0.0.0:9000".to_string();
        config.save_to(&path).unwrap();

        let loaded = DashboardConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_toml_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[database\npath = 1").unwrap();

        let err = DashboardConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }
}
