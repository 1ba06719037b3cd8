//! Fixture stipend database for unit tests
//!
//! Eight payments, four paid athletes (plus one without payments), three
//! categories, three disciplines, four municipalities in SP/RJ/MG. One
//! payment has no `data_pagamento`.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;

use crate::db::{Database, OpenOptions};

pub const FIXTURE_SQL: &str = r#"
CREATE TABLE categoria (id_categoria INTEGER PRIMARY KEY, categoria TEXT NOT NULL);
CREATE TABLE modalidade (id_modalidade INTEGER PRIMARY KEY, modalidade TEXT NOT NULL);
CREATE TABLE municipio (id_municipio INTEGER PRIMARY KEY, municipio TEXT NOT NULL, uf TEXT NOT NULL);
CREATE TABLE situacao (id_situacao INTEGER PRIMARY KEY, situacao TEXT NOT NULL);
CREATE TABLE edital (id_edital INTEGER PRIMARY KEY, ano INTEGER);
CREATE TABLE atleta (cpf TEXT PRIMARY KEY, nome TEXT NOT NULL, id_municipio INTEGER);
CREATE TABLE pagamento (
    id_pagamento INTEGER PRIMARY KEY,
    cpf TEXT NOT NULL,
    id_categoria INTEGER,
    id_modalidade INTEGER,
    id_situacao INTEGER,
    id_edital INTEGER,
    valor_pago REAL,
    data_pagamento TEXT,
    data_referencia TEXT
);

INSERT INTO categoria VALUES (1, 'Nacional'), (2, 'Internacional'), (3, 'Olímpico/Paralímpico');
INSERT INTO modalidade VALUES (1, 'Atletismo'), (2, 'Natação'), (3, 'Judô');
INSERT INTO municipio VALUES
    (1, 'São Paulo', 'SP'),
    (2, 'Campinas', 'SP'),
    (3, 'Rio de Janeiro', 'RJ'),
    (4, 'Belo Horizonte', 'MG');
INSERT INTO situacao VALUES (1, 'Pago');
INSERT INTO edital VALUES (1, 2019), (2, 2020);
INSERT INTO atleta VALUES
    ('111', 'Ana Souza', 1),
    ('222', 'Bruno Lima', 2),
    ('333', 'Carla Souza', 3),
    ('444', 'Diego Alves', 4),
    ('555', 'Eva Rocha', 1);
INSERT INTO pagamento VALUES
    (1, '111', 1, 1, 1, 1,  925.0, '2020-01-10', '2020-01'),
    (2, '111', 1, 1, 1, 1,  925.0, '2020-02-10', '2020-02'),
    (3, '222', 2, 2, 1, 1, 1850.0, '2020-02-10', '2020-02'),
    (4, '222', 2, 2, 1, 2, 1850.0, '2021-03-15', '2021-03'),
    (5, '333', 3, 3, 1, 2, 3100.0, '2021-03-15', '2021-03'),
    (6, '333', 3, 3, 1, 2, 3100.0, '2021-04-15', '2021-04'),
    (7, '444', 1, 1, 1, 2,  410.0, '2021-04-20', '2021-04'),
    (8, '444', 1, 2, 1, 2, 5500.0, NULL, '2021-05');
"#;

/// Sum of every `valor_pago` in the fixture
pub const FIXTURE_TOTAL: f64 = 17660.0;

/// Sum of `valor_pago` over payments with a date
pub const FIXTURE_DATED_TOTAL: f64 = 12160.0;

/// One payment whose category, discipline and municipality rows are all missing
pub const ORPHAN_PAYMENT_SQL: &str = "
INSERT INTO atleta VALUES ('666', 'Fabio Nunes', 99);
INSERT INTO pagamento VALUES (9, '666', 99, 99, 1, 2, 700.0, '2021-05-20', '2021-05');
";

/// Write the fixture to a temp file and open it read-only
pub async fn fixture_db() -> (TempDir, Database) {
    fixture_db_with("").await
}

/// The fixture plus `extra` statements, run before the read-only reopen
pub async fn fixture_db_with(extra: &str) -> (TempDir, Database) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bolsa_atleta.db");

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
        .expect("sqlite url")
        .create_if_missing(true);
    let writer = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("create fixture");
    sqlx::raw_sql(FIXTURE_SQL)
        .execute(&writer)
        .await
        .expect("load fixture");
    if !extra.is_empty() {
        sqlx::raw_sql(extra)
            .execute(&writer)
            .await
            .expect("load extra fixture rows");
    }
    writer.close().await;

    let db = Database::open(&path, OpenOptions::default())
        .await
        .expect("open fixture");
    (dir, db)
}
