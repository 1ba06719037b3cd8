//! `bolsactl config` - inspect and create the TOML configuration

use std::path::PathBuf;

use anyhow::{bail, Result};
use bolsactl_core::config::LOCAL_CONFIG_FILE;
use bolsactl_core::DashboardConfig;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show which config file is used
    Path,
    /// Print the effective configuration (file + environment)
    Show,
    /// Write a config file with default values
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,

    /// Write ./bolsactl.toml instead of ~/.bolsactl/config.toml
    #[arg(long)]
    pub local: bool,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(),
        ConfigCommands::Init(args) => run_init(args),
    }
}

fn run_path() -> Result<()> {
    match DashboardConfig::find_config_file() {
        Some(path) => println!("{}", path.display()),
        None => println!(
            "{} (not created; defaults in use)",
            DashboardConfig::config_path().display()
        ),
    }
    Ok(())
}

fn run_show() -> Result<()> {
    let config = DashboardConfig::load()?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

fn run_init(args: InitArgs) -> Result<()> {
    let path = if args.local {
        PathBuf::from(LOCAL_CONFIG_FILE)
    } else {
        DashboardConfig::config_path()
    };

    if path.exists() && !args.force {
        bail!(
            "Config already exists at {}\n\nUse --force to overwrite",
            path.display()
        );
    }

    DashboardConfig::default().save_to(&path)?;
    println!("✅ Created config at: {}", path.display());
    Ok(())
}
