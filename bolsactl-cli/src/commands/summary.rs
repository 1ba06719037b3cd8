//! One-shot headline metrics, no server

use std::path::PathBuf;

use anyhow::Result;
use bolsactl_core::{format_count, format_money, DashboardConfig, Predicate};
use bolsactl_server::queries;
use clap::Parser;
use serde::Serialize;

#[derive(Parser, Debug)]
pub struct SummaryArgs {
    /// SQLite database file [default: ./bolsa_atleta.db, or BOLSACTL_DB_PATH]
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SummaryReport {
    database: String,
    total_pagamentos: i64,
    total_atletas: i64,
    valor_total: f64,
    valor_medio: f64,
}

pub async fn run_summary(args: SummaryArgs) -> Result<()> {
    let config = DashboardConfig::load()?;
    let db = super::open_database(&config, args.db_path, false).await?;

    let rs = db.fetch(&queries::summary(&Predicate::new())).await?;
    let report = SummaryReport {
        database: db.path().display().to_string(),
        total_pagamentos: rs.scalar_i64("total_pagamentos"),
        total_atletas: rs.scalar_i64("total_atletas"),
        valor_total: rs.scalar_f64("valor_total"),
        valor_medio: rs.scalar_f64("valor_medio"),
    };
    db.close().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Bolsa Atleta - {}", report.database);
    println!("  Total de Pagamentos: {}", format_count(report.total_pagamentos));
    println!("  Total de Atletas:    {}", format_count(report.total_atletas));
    println!("  Valor Total Pago:    {}", format_money(report.valor_total));
    println!("  Valor Médio:         {}", format_money(report.valor_medio));
    Ok(())
}
