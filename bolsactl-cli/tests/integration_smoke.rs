//! Smoke tests for the bolsactl binary

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the caller's config files and environment
fn bolsactl(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bolsactl").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("BOLSACTL_DB_PATH")
        .env_remove("BOLSACTL_BIND")
        .env_remove("RUST_LOG");
    cmd
}

fn write_small_db(path: &Path) {
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    let sql = r#"
        CREATE TABLE categoria (id_categoria INTEGER PRIMARY KEY, categoria TEXT NOT NULL);
        CREATE TABLE modalidade (id_modalidade INTEGER PRIMARY KEY, modalidade TEXT NOT NULL);
        CREATE TABLE municipio (id_municipio INTEGER PRIMARY KEY, municipio TEXT NOT NULL, uf TEXT NOT NULL);
        CREATE TABLE situacao (id_situacao INTEGER PRIMARY KEY, situacao TEXT NOT NULL);
        CREATE TABLE edital (id_edital INTEGER PRIMARY KEY, ano INTEGER);
        CREATE TABLE atleta (cpf TEXT PRIMARY KEY, nome TEXT NOT NULL, id_municipio INTEGER);
        CREATE TABLE pagamento (
            id_pagamento INTEGER PRIMARY KEY, cpf TEXT NOT NULL,
            id_categoria INTEGER, id_modalidade INTEGER, id_situacao INTEGER, id_edital INTEGER,
            valor_pago REAL, data_pagamento TEXT, data_referencia TEXT
        );
        INSERT INTO categoria VALUES (1, 'Nacional');
        INSERT INTO modalidade VALUES (1, 'Atletismo');
        INSERT INTO municipio VALUES (1, 'São Paulo', 'SP');
        INSERT INTO atleta VALUES ('111', 'Ana Souza', 1), ('222', 'Bruno Lima', 1);
        INSERT INTO pagamento VALUES
            (1, '111', 1, 1, NULL, NULL, 1000.0, '2020-01-10', '2020-01'),
            (2, '111', 1, 1, NULL, NULL, 1000.0, '2020-02-10', '2020-02'),
            (3, '222', 1, 1, NULL, NULL, 2500.0, '2020-02-10', '2020-02');
    "#;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
            .unwrap()
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::raw_sql(sql).execute(&pool).await.unwrap();
        pool.close().await;
    });
}

// === Help ===

#[test]
fn test_top_level_help() {
    let dir = TempDir::new().unwrap();
    bolsactl(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("summary"));
}

#[test]
fn test_serve_help() {
    let dir = TempDir::new().unwrap();
    bolsactl(dir.path())
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--db-path"))
        .stdout(predicate::str::contains("--no-cache"));
}

// === Missing database ===

#[test]
fn test_serve_without_database_fails() {
    let dir = TempDir::new().unwrap();
    bolsactl(dir.path())
        .args(["serve", "--bind", "127.0.0.1:0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Banco de dados não encontrado"));
}

#[test]
fn test_summary_with_missing_db_path_fails() {
    let dir = TempDir::new().unwrap();
    bolsactl(dir.path())
        .args(["summary", "--db-path", "nao_existe.db"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nao_existe.db"));
}

#[test]
fn test_missing_db_from_env() {
    let dir = TempDir::new().unwrap();
    bolsactl(dir.path())
        .env("BOLSACTL_DB_PATH", dir.path().join("outro.db"))
        .arg("summary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("outro.db"));
}

// === Summary ===

#[test]
fn test_summary_text() {
    let dir = TempDir::new().unwrap();
    write_small_db(&dir.path().join("bolsa_atleta.db"));

    bolsactl(dir.path())
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total de Pagamentos: 3"))
        .stdout(predicate::str::contains("Total de Atletas:    2"))
        .stdout(predicate::str::contains("R$ 4,500.00"))
        .stdout(predicate::str::contains("R$ 1,500.00"));
}

#[test]
fn test_summary_json() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("dados.db");
    write_small_db(&db);

    let output = bolsactl(dir.path())
        .args(["summary", "--json", "--db-path"])
        .arg(&db)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["total_pagamentos"], 3);
    assert_eq!(json["total_atletas"], 2);
    assert_eq!(json["valor_total"], 4500.0);
}

// === Config ===

#[test]
fn test_config_show_defaults() {
    let dir = TempDir::new().unwrap();
    bolsactl(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bolsa_atleta.db"))
        .stdout(predicate::str::contains("127.0.0.1:8501"));
}

#[test]
fn test_config_init_local_then_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    bolsactl(dir.path())
        .args(["config", "init", "--local"])
        .assert()
        .success();
    assert!(dir.path().join("bolsactl.toml").exists());

    bolsactl(dir.path())
        .args(["config", "init", "--local"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    bolsactl(dir.path())
        .args(["config", "init", "--local", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_path_prefers_local_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bolsactl.toml"), "").unwrap();

    bolsactl(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bolsactl.toml"));
}

// === Completions ===

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    bolsactl(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bolsactl"));
}
