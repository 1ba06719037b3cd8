//! Dashboard web server command

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bolsactl_core::DashboardConfig;
use bolsactl_server::http::{run_server, ServerConfig};
use clap::Parser;
use tracing::info;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to [default: 127.0.0.1:8501, or BOLSACTL_BIND]
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// SQLite database file [default: ./bolsa_atleta.db, or BOLSACTL_DB_PATH]
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Disable the query result cache
    #[arg(long)]
    pub no_cache: bool,
}

pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = DashboardConfig::load()?;

    let bind_addr = match args.bind {
        Some(addr) => addr,
        None => config
            .server
            .bind
            .parse()
            .with_context(|| format!("Invalid bind address: {}", config.server.bind))?,
    };

    let db = super::open_database(&config, args.db_path, config.cache.enabled && !args.no_cache)
        .await?;

    let server = ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive || config.server.cors_permissive,
        timeout_secs: args.timeout.unwrap_or(config.server.timeout_secs),
    };

    info!(
        database = %db.path().display(),
        cache = db.cache().is_enabled(),
        "Starting dashboard on http://{}",
        server.bind_addr
    );

    run_server(db, server).await.context("Server error")?;
    Ok(())
}
