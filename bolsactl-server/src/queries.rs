//! Parameterized SQL for each dashboard view
//!
//! Every query reads the payment table joined to its dimensions. LEFT JOINs
//! keep payments whose dimension rows are missing, so unfiltered totals
//! match `SELECT SUM(valor_pago) FROM pagamento`. Grouped views label the
//! missing dimension with `UNKNOWN_LABEL`.

use bolsactl_core::{Granularity, Predicate, RawTable, SqlQuery};

/// Label for a grouped dimension whose row is missing
pub const UNKNOWN_LABEL: &str = "Não informado";

/// Payment rows with category, discipline, athlete and municipality
pub const PAYMENT_VIEW: &str = "
    FROM pagamento p
    LEFT JOIN categoria c ON p.id_categoria = c.id_categoria
    LEFT JOIN modalidade m ON p.id_modalidade = m.id_modalidade
    LEFT JOIN atleta a ON p.cpf = a.cpf
    LEFT JOIN municipio mu ON a.id_municipio = mu.id_municipio";

/// Headline numbers for any predicate:
/// `total_pagamentos`, `total_atletas`, `valor_total`, `valor_medio`
pub fn summary(pred: &Predicate) -> SqlQuery {
    SqlQuery::new(
        "SELECT
            COUNT(*) AS total_pagamentos,
            COUNT(DISTINCT p.cpf) AS total_atletas,
            COALESCE(SUM(p.valor_pago), 0.0) AS valor_total,
            COALESCE(AVG(p.valor_pago), 0.0) AS valor_medio",
    )
    .push(PAYMENT_VIEW)
    .push_predicate(pred, false)
}

// ============================================================================
// Overview
// ============================================================================

pub fn value_bands(pred: &Predicate) -> SqlQuery {
    SqlQuery::new(
        "SELECT
            CASE
                WHEN p.valor_pago < 1000 THEN 'Até R$ 1.000'
                WHEN p.valor_pago < 2000 THEN 'R$ 1.000 - R$ 2.000'
                WHEN p.valor_pago < 3000 THEN 'R$ 2.000 - R$ 3.000'
                WHEN p.valor_pago < 5000 THEN 'R$ 3.000 - R$ 5.000'
                ELSE 'Acima de R$ 5.000'
            END AS faixa_valor,
            COUNT(*) AS quantidade",
    )
    .push(PAYMENT_VIEW)
    .push_predicate(pred, false)
    .push(" GROUP BY faixa_valor ORDER BY MIN(p.valor_pago)")
}

pub fn average_by_category(pred: &Predicate) -> SqlQuery {
    SqlQuery::new(
        "SELECT
            COALESCE(c.categoria, 'Não informado') AS categoria,
            AVG(p.valor_pago) AS valor_medio,
            COUNT(p.id_pagamento) AS num_pagamentos",
    )
    .push(PAYMENT_VIEW)
    .push_predicate(pred, false)
    .push(" GROUP BY c.categoria ORDER BY valor_medio DESC")
}

pub fn top_disciplines_by_total(pred: &Predicate) -> SqlQuery {
    SqlQuery::new(
        "SELECT
            COALESCE(m.modalidade, 'Não informado') AS modalidade,
            COUNT(p.id_pagamento) AS num_pagamentos,
            SUM(p.valor_pago) AS valor_total",
    )
    .push(PAYMENT_VIEW)
    .push_predicate(pred, false)
    .push(" GROUP BY m.modalidade ORDER BY valor_total DESC LIMIT 10")
}

pub fn category_distribution(pred: &Predicate) -> SqlQuery {
    SqlQuery::new(
        "SELECT
            COALESCE(c.categoria, 'Não informado') AS categoria,
            COUNT(p.id_pagamento) AS num_pagamentos,
            SUM(p.valor_pago) AS valor_total",
    )
    .push(PAYMENT_VIEW)
    .push_predicate(pred, false)
    .push(" GROUP BY c.categoria ORDER BY valor_total DESC")
}

pub fn top_states(pred: &Predicate) -> SqlQuery {
    SqlQuery::new(
        "SELECT
            COALESCE(mu.uf, 'Não informado') AS uf,
            COUNT(DISTINCT a.cpf) AS num_atletas,
            SUM(p.valor_pago) AS valor_total",
    )
    .push(PAYMENT_VIEW)
    .push_predicate(pred, false)
    .push(" GROUP BY mu.uf ORDER BY valor_total DESC LIMIT 10")
}

pub fn top_municipalities(pred: &Predicate) -> SqlQuery {
    SqlQuery::new(
        "SELECT
            COALESCE(mu.municipio || ' - ' || mu.uf, 'Não informado') AS localizacao,
            COUNT(DISTINCT a.cpf) AS num_atletas,
            SUM(p.valor_pago) AS valor_total",
    )
    .push(PAYMENT_VIEW)
    .push_predicate(pred, false)
    .push(" GROUP BY mu.municipio, mu.uf ORDER BY valor_total DESC LIMIT 10")
}

pub fn top_disciplines_by_athletes(pred: &Predicate) -> SqlQuery {
    SqlQuery::new(
        "SELECT
            COALESCE(m.modalidade, 'Não informado') AS modalidade,
            COUNT(DISTINCT p.cpf) AS num_atletas,
            SUM(p.valor_pago) AS valor_total,
            AVG(p.valor_pago) AS valor_medio",
    )
    .push(PAYMENT_VIEW)
    .push_predicate(pred, false)
    .push(" GROUP BY m.modalidade ORDER BY num_atletas DESC LIMIT 10")
}

pub fn state_geography(pred: &Predicate) -> SqlQuery {
    SqlQuery::new(
        "SELECT
            COALESCE(mu.uf, 'Não informado') AS uf,
            COUNT(DISTINCT a.cpf) AS num_atletas,
            COUNT(p.id_pagamento) AS num_pagamentos,
            SUM(p.valor_pago) AS valor_total",
    )
    .push(PAYMENT_VIEW)
    .push_predicate(pred, false)
    .push(" GROUP BY mu.uf ORDER BY valor_total DESC")
}

pub fn detailed_summary(pred: &Predicate) -> SqlQuery {
    SqlQuery::new(
        "SELECT
            COALESCE(c.categoria, 'Não informado') AS categoria,
            COALESCE(m.modalidade, 'Não informado') AS modalidade,
            COALESCE(mu.uf, 'Não informado') AS uf,
            COUNT(DISTINCT p.cpf) AS num_atletas,
            COUNT(p.id_pagamento) AS num_pagamentos,
            SUM(p.valor_pago) AS valor_total,
            AVG(p.valor_pago) AS valor_medio",
    )
    .push(PAYMENT_VIEW)
    .push_predicate(pred, false)
    .push(" GROUP BY c.categoria, m.modalidade, mu.uf ORDER BY valor_total DESC LIMIT 50")
}

// ============================================================================
// Category / discipline / region pages
// ============================================================================

/// Predicate for the category page's single choice
pub fn category_predicate(category: Option<&str>) -> Predicate {
    match category {
        Some(c) => Predicate::new().eq("c.categoria", c),
        None => Predicate::new(),
    }
}

pub fn discipline_predicate(discipline: Option<&str>) -> Predicate {
    match discipline {
        Some(d) => Predicate::new().eq("m.modalidade", d),
        None => Predicate::new(),
    }
}

pub fn state_predicate(uf: Option<&str>) -> Predicate {
    match uf {
        Some(uf) => Predicate::new().eq("mu.uf", uf),
        None => Predicate::new(),
    }
}

pub fn by_category(category: Option<&str>) -> SqlQuery {
    SqlQuery::new(
        "SELECT
            COALESCE(c.categoria, 'Não informado') AS categoria,
            COUNT(p.id_pagamento) AS num_pagamentos,
            COUNT(DISTINCT p.cpf) AS num_atletas,
            SUM(p.valor_pago) AS valor_total,
            AVG(p.valor_pago) AS valor_medio",
    )
    .push(PAYMENT_VIEW)
    .push_predicate(&category_predicate(category), false)
    .push(" GROUP BY c.categoria ORDER BY valor_total DESC")
}

pub fn by_discipline(discipline: Option<&str>) -> SqlQuery {
    SqlQuery::new(
        "SELECT
            COALESCE(m.modalidade, 'Não informado') AS modalidade,
            COUNT(p.id_pagamento) AS num_pagamentos,
            COUNT(DISTINCT p.cpf) AS num_atletas,
            SUM(p.valor_pago) AS valor_total,
            AVG(p.valor_pago) AS valor_medio",
    )
    .push(PAYMENT_VIEW)
    .push_predicate(&discipline_predicate(discipline), false)
    .push(" GROUP BY m.modalidade ORDER BY valor_total DESC")
}

/// One row per state, with the number of municipalities that received payments
pub fn by_state() -> SqlQuery {
    SqlQuery::new(
        "SELECT
            COALESCE(mu.uf, 'Não informado') AS uf,
            COUNT(DISTINCT mu.id_municipio) AS num_municipios,
            COUNT(DISTINCT a.cpf) AS num_atletas,
            COUNT(p.id_pagamento) AS num_pagamentos,
            SUM(p.valor_pago) AS valor_total,
            AVG(p.valor_pago) AS valor_medio",
    )
    .push(PAYMENT_VIEW)
    .push(" GROUP BY mu.uf ORDER BY valor_total DESC")
}

/// One row per municipality of `uf`
pub fn municipalities_in_state(uf: &str) -> SqlQuery {
    SqlQuery::new(
        "SELECT
            COALESCE(mu.uf, 'Não informado') AS uf,
            COALESCE(mu.municipio, 'Não informado') AS municipio,
            COUNT(DISTINCT a.cpf) AS num_atletas,
            COUNT(p.id_pagamento) AS num_pagamentos,
            SUM(p.valor_pago) AS valor_total,
            AVG(p.valor_pago) AS valor_medio",
    )
    .push(PAYMENT_VIEW)
    .push_predicate(&state_predicate(Some(uf)), false)
    .push(" GROUP BY mu.uf, mu.municipio ORDER BY valor_total DESC")
}

// ============================================================================
// Temporal
// ============================================================================

/// Per-period aggregates over dated payments. The granularity only changes
/// the `strftime` grouping key.
pub fn timeline(granularity: Granularity) -> SqlQuery {
    SqlQuery::new(format!(
        "SELECT
            strftime('{}', p.data_pagamento) AS periodo,
            COUNT(*) AS num_pagamentos,
            SUM(p.valor_pago) AS valor_total,
            AVG(p.valor_pago) AS valor_medio,
            COUNT(DISTINCT p.cpf) AS num_atletas
        FROM pagamento p
        WHERE p.data_pagamento IS NOT NULL
        GROUP BY periodo
        ORDER BY periodo",
        granularity.strftime()
    ))
}

/// Summary restricted to dated payments, matching `timeline`'s population
pub fn dated_summary() -> SqlQuery {
    summary(&Predicate::new().not_null("p.data_pagamento"))
}

// ============================================================================
// Athletes
// ============================================================================

pub const ATHLETE_SEARCH_LIMIT: u32 = 100;

/// Athletes whose name contains `name`, with their payment aggregates
pub fn athlete_search(name: &str) -> SqlQuery {
    SqlQuery::new(
        "SELECT
            a.nome,
            a.cpf,
            mu.municipio,
            mu.uf,
            COUNT(p.id_pagamento) AS num_pagamentos,
            SUM(p.valor_pago) AS valor_total,
            AVG(p.valor_pago) AS valor_medio,
            MIN(p.data_pagamento) AS primeira_data,
            MAX(p.data_pagamento) AS ultima_data
        FROM atleta a
        LEFT JOIN municipio mu ON a.id_municipio = mu.id_municipio
        LEFT JOIN pagamento p ON a.cpf = p.cpf
        WHERE a.nome LIKE '%' || ",
    )
    .push_bind(name)
    .push(
        " || '%'
        GROUP BY a.cpf, a.nome, mu.municipio, mu.uf
        ORDER BY valor_total DESC
        LIMIT ",
    )
    .push_bind(ATHLETE_SEARCH_LIMIT)
}

/// Every payment of one athlete, newest first
pub fn athlete_payments(cpf: &str) -> SqlQuery {
    SqlQuery::new(
        "SELECT
            p.data_pagamento,
            p.data_referencia,
            c.categoria,
            m.modalidade,
            s.situacao,
            p.valor_pago,
            e.id_edital AS edital
        FROM pagamento p
        LEFT JOIN categoria c ON p.id_categoria = c.id_categoria
        LEFT JOIN modalidade m ON p.id_modalidade = m.id_modalidade
        LEFT JOIN situacao s ON p.id_situacao = s.id_situacao
        LEFT JOIN edital e ON p.id_edital = e.id_edital
        WHERE p.cpf = ",
    )
    .push_bind(cpf)
    .push(" ORDER BY p.data_pagamento DESC")
}

// ============================================================================
// Raw data and filter options
// ============================================================================

/// `SELECT *` from a whitelisted table
pub fn raw_rows(table: RawTable, limit: u32) -> SqlQuery {
    SqlQuery::new(format!("SELECT * FROM {} LIMIT ", table.table_name())).push_bind(limit)
}

pub fn category_names() -> SqlQuery {
    SqlQuery::new("SELECT categoria FROM categoria ORDER BY categoria")
}

pub fn discipline_names() -> SqlQuery {
    SqlQuery::new("SELECT modalidade FROM modalidade ORDER BY modalidade")
}

pub fn state_codes() -> SqlQuery {
    SqlQuery::new("SELECT DISTINCT uf FROM municipio ORDER BY uf")
}

pub fn payment_date_range() -> SqlQuery {
    SqlQuery::new(
        "SELECT MIN(data_pagamento) AS min_date, MAX(data_pagamento) AS max_date
        FROM pagamento
        WHERE data_pagamento IS NOT NULL",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        fixture_db, fixture_db_with, FIXTURE_DATED_TOTAL, FIXTURE_TOTAL, ORPHAN_PAYMENT_SQL,
    };
    use bolsactl_core::GlobalFilters;

    #[tokio::test]
    async fn test_unfiltered_summary_matches_table() {
        let (_dir, db) = fixture_db().await;
        let rs = db.fetch(&summary(&Predicate::new())).await.unwrap();

        assert_eq!(rs.scalar_i64("total_pagamentos"), 8);
        assert_eq!(rs.scalar_i64("total_atletas"), 4);
        assert_eq!(rs.scalar_f64("valor_total"), FIXTURE_TOTAL);
        assert_eq!(rs.scalar_f64("valor_medio"), FIXTURE_TOTAL / 8.0);
    }

    #[tokio::test]
    async fn test_filtered_summary_matches_direct_sum() {
        let (_dir, db) = fixture_db().await;
        let filters = GlobalFilters::from_pairs([("uf", "SP")]).unwrap();

        let rs = db.fetch(&summary(&filters.predicate())).await.unwrap();
        let direct = db
            .fetch(&SqlQuery::new(
                "SELECT COUNT(*) AS n, SUM(valor_pago) AS total FROM pagamento
                 WHERE cpf IN (SELECT cpf FROM atleta a JOIN municipio mu
                               ON a.id_municipio = mu.id_municipio WHERE mu.uf = 'SP')",
            ))
            .await
            .unwrap();

        assert_eq!(rs.scalar_i64("total_pagamentos"), direct.scalar_i64("n"));
        assert_eq!(rs.scalar_f64("valor_total"), direct.scalar_f64("total"));
        assert_eq!(rs.scalar_f64("valor_total"), 5550.0);
        assert_eq!(rs.scalar_i64("total_atletas"), 2);
    }

    #[tokio::test]
    async fn test_payment_with_missing_dimensions_still_counts() {
        let (_dir, db) = fixture_db_with(ORPHAN_PAYMENT_SQL).await;

        let rs = db.fetch(&summary(&Predicate::new())).await.unwrap();
        let direct = db
            .fetch(&SqlQuery::new(
                "SELECT COUNT(*) AS n, SUM(valor_pago) AS total FROM pagamento",
            ))
            .await
            .unwrap();

        assert_eq!(rs.scalar_i64("total_pagamentos"), direct.scalar_i64("n"));
        assert_eq!(rs.scalar_f64("valor_total"), direct.scalar_f64("total"));
        assert_eq!(rs.scalar_i64("total_pagamentos"), 9);
        assert_eq!(rs.scalar_f64("valor_total"), FIXTURE_TOTAL + 700.0);
    }

    #[tokio::test]
    async fn test_filters_exclude_payment_with_missing_dimensions() {
        let (_dir, db) = fixture_db_with(ORPHAN_PAYMENT_SQL).await;

        let filters = GlobalFilters::from_pairs([("categoria", "Nacional")]).unwrap();
        let rs = db.fetch(&summary(&filters.predicate())).await.unwrap();
        assert_eq!(rs.scalar_i64("total_pagamentos"), 4);
        assert_eq!(rs.scalar_f64("valor_total"), 7760.0);

        let filters = GlobalFilters::from_pairs([("uf", "SP"), ("uf", "RJ"), ("uf", "MG")]).unwrap();
        let rs = db.fetch(&summary(&filters.predicate())).await.unwrap();
        assert_eq!(rs.scalar_f64("valor_total"), FIXTURE_TOTAL);
    }

    #[tokio::test]
    async fn test_missing_dimension_is_labelled() {
        let (_dir, db) = fixture_db_with(ORPHAN_PAYMENT_SQL).await;
        let unfiltered = Predicate::new();

        let categories = db.fetch(&category_distribution(&unfiltered)).await.unwrap();
        assert!(categories.texts("categoria").contains(&UNKNOWN_LABEL.to_string()));
        assert!(!categories.texts("categoria").contains(&String::new()));

        let states = db.fetch(&state_geography(&unfiltered)).await.unwrap();
        let labels = states.texts("uf");
        assert_eq!(labels.len(), 4);
        assert!(labels.contains(&UNKNOWN_LABEL.to_string()));
        assert!(labels.iter().all(|uf| !uf.is_empty()));

        let disciplines = db.fetch(&by_discipline(None)).await.unwrap();
        assert!(disciplines.texts("modalidade").contains(&UNKNOWN_LABEL.to_string()));

        let places = db.fetch(&top_municipalities(&unfiltered)).await.unwrap();
        assert!(places.texts("localizacao").contains(&UNKNOWN_LABEL.to_string()));
    }

    #[tokio::test]
    async fn test_region_filter_returns_only_that_region() {
        let (_dir, db) = fixture_db().await;

        let rs = db.fetch(&municipalities_in_state("SP")).await.unwrap();
        assert_eq!(rs.len(), 2);
        assert!(rs.texts("uf").iter().all(|uf| uf == "SP"));

        let filters = GlobalFilters::from_pairs([("uf", "RJ")]).unwrap();
        let rs = db.fetch(&detailed_summary(&filters.predicate())).await.unwrap();
        assert!(!rs.is_empty());
        assert!(rs.texts("uf").iter().all(|uf| uf == "RJ"));
    }

    #[tokio::test]
    async fn test_category_choice_restricts_rows() {
        let (_dir, db) = fixture_db().await;

        let all = db.fetch(&by_category(None)).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all.sum("valor_total"), FIXTURE_TOTAL);

        let one = db.fetch(&by_category(Some("Nacional"))).await.unwrap();
        assert_eq!(one.texts("categoria"), vec!["Nacional"]);
        assert_eq!(one.scalar_f64("valor_total"), 7760.0);
        assert_eq!(one.scalar_i64("num_atletas"), 2);
    }

    #[tokio::test]
    async fn test_granularity_changes_grouping_not_total() {
        let (_dir, db) = fixture_db().await;

        let mut totals = Vec::new();
        for granularity in Granularity::ALL {
            let rs = db.fetch(&timeline(granularity)).await.unwrap();
            totals.push((granularity, rs.len(), rs.sum("valor_total")));
        }

        assert_eq!(totals[0], (Granularity::Year, 2, FIXTURE_DATED_TOTAL));
        assert_eq!(totals[1], (Granularity::Month, 4, FIXTURE_DATED_TOTAL));
        assert_eq!(totals[2], (Granularity::YearMonth, 4, FIXTURE_DATED_TOTAL));

        let dated = db.fetch(&dated_summary()).await.unwrap();
        assert_eq!(dated.scalar_f64("valor_total"), FIXTURE_DATED_TOTAL);
    }

    #[tokio::test]
    async fn test_timeline_periods_are_ordered() {
        let (_dir, db) = fixture_db().await;
        let rs = db.fetch(&timeline(Granularity::YearMonth)).await.unwrap();

        assert_eq!(
            rs.texts("periodo"),
            vec!["2020-01", "2020-02", "2021-03", "2021-04"]
        );
        assert_eq!(rs.i64s("num_pagamentos"), vec![1, 2, 2, 2]);
    }

    #[tokio::test]
    async fn test_value_bands() {
        let (_dir, db) = fixture_db().await;
        let rs = db.fetch(&value_bands(&Predicate::new())).await.unwrap();

        assert_eq!(
            rs.texts("faixa_valor"),
            vec![
                "Até R$ 1.000",
                "R$ 1.000 - R$ 2.000",
                "R$ 3.000 - R$ 5.000",
                "Acima de R$ 5.000"
            ]
        );
        assert_eq!(rs.i64s("quantidade"), vec![3, 2, 2, 1]);
    }

    #[tokio::test]
    async fn test_athlete_search_matches_substring() {
        let (_dir, db) = fixture_db().await;

        let rs = db.fetch(&athlete_search("Souza")).await.unwrap();
        assert_eq!(rs.texts("nome"), vec!["Carla Souza", "Ana Souza"]);

        let rs = db.fetch(&athlete_search("Zzz")).await.unwrap();
        assert!(rs.is_empty());
    }

    #[tokio::test]
    async fn test_athlete_without_payments_still_listed() {
        let (_dir, db) = fixture_db().await;
        let rs = db.fetch(&athlete_search("Eva")).await.unwrap();

        assert_eq!(rs.len(), 1);
        assert_eq!(rs.scalar_i64("num_pagamentos"), 0);
        assert!(rs.value(0, "valor_total").unwrap().is_null());
    }

    #[tokio::test]
    async fn test_athlete_payments_newest_first() {
        let (_dir, db) = fixture_db().await;
        let rs = db.fetch(&athlete_payments("111")).await.unwrap();

        assert_eq!(rs.len(), 2);
        assert_eq!(rs.texts("data_pagamento"), vec!["2020-02-10", "2020-01-10"]);
        assert_eq!(rs.texts("situacao"), vec!["Pago", "Pago"]);
    }

    #[tokio::test]
    async fn test_raw_rows_respects_limit() {
        let (_dir, db) = fixture_db().await;
        let rs = db.fetch(&raw_rows(RawTable::Pagamento, 3)).await.unwrap();
        assert_eq!(rs.len(), 3);
        assert_eq!(rs.columns.len(), 9);
    }

    #[tokio::test]
    async fn test_filter_options() {
        let (_dir, db) = fixture_db().await;
        let states = db.fetch(&state_codes()).await.unwrap();
        assert_eq!(states.texts("uf"), vec!["MG", "RJ", "SP"]);

        let range = db.fetch(&payment_date_range()).await.unwrap();
        assert_eq!(range.texts("min_date"), vec!["2020-01-10"]);
        assert_eq!(range.texts("max_date"), vec!["2021-04-20"]);
    }
}
