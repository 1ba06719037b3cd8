//! Command implementations for the bolsactl CLI

pub mod config;
pub mod serve;
pub mod summary;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use bolsactl_core::DashboardConfig;
use bolsactl_server::{Database, OpenOptions};

pub use config::run_config;
pub use serve::run_serve;
pub use summary::run_summary;

/// Open the stipend database read-only; `--db-path` beats the config file.
///
/// Fails with the "Banco de dados não encontrado" message when the file is
/// absent, before anything else happens.
pub(crate) async fn open_database(
    config: &DashboardConfig,
    db_path: Option<PathBuf>,
    cache_enabled: bool,
) -> Result<Database> {
    let path = db_path.unwrap_or_else(|| config.database.path.clone());
    let options = OpenOptions {
        busy_timeout: Duration::from_secs(config.database.busy_timeout_secs),
        max_connections: config.database.max_connections,
        cache_enabled,
    };
    Ok(Database::open(&path, options).await?)
}
