//! Análise por Região: per state, or per municipality of one state

use bolsactl_core::{format_count, format_money, Page};

use super::{
    chart_or_notice, choice_select, detail_table, Block, Metric, Notice, PageParams, PageView,
    KEY_PAGE_STATE,
};
use crate::charts::ChartBuilder;
use crate::db::{Database, DbError};
use crate::queries;

pub(super) async fn build(db: &Database, params: &PageParams) -> Result<PageView, DbError> {
    let selected = params.state.as_deref();
    let mut view = PageView::new(Page::Regions, "🗺️ Análise por Região");

    let states = db.fetch(&queries::state_codes()).await?;
    view.controls.push(choice_select(
        KEY_PAGE_STATE,
        "Selecione um estado:",
        "Todos",
        states.texts("uf"),
        selected,
    ));

    let rows = match selected {
        Some(uf) => db.fetch(&queries::municipalities_in_state(uf)).await?,
        None => db.fetch(&queries::by_state()).await?,
    };
    if rows.is_empty() {
        view.push(Block::Notice(Notice::no_data()));
        return Ok(view);
    }

    let municipalities = if rows.has_column("num_municipios") {
        rows.i64s("num_municipios").iter().sum()
    } else {
        rows.len() as i64
    };
    let summary = db
        .fetch(&queries::summary(&queries::state_predicate(selected)))
        .await?;
    view.push(Block::Metrics {
        items: vec![
            Metric::new("Municípios", format_count(municipalities)),
            Metric::new("Atletas", format_count(summary.scalar_i64("total_atletas"))),
            Metric::new("Valor Total", format_money(summary.scalar_f64("valor_total"))),
            Metric::new("Valor Médio", format_money(summary.scalar_f64("valor_medio"))),
        ],
    });
    view.push(Block::Divider);

    let (bar, pie) = match selected {
        None => (
            chart_or_notice(&rows, |rs| {
                ChartBuilder::bar(rs, "Valor Total por Estado")
                    .x("uf", "Estado")
                    .y("valor_total", "Valor Total (R$)")
                    .tick_angle(45)
                    .build()
            }),
            chart_or_notice(&rows, |rs| {
                ChartBuilder::pie(rs, "Distribuição de Atletas por Estado")
                    .x("uf", "Estado")
                    .y("num_atletas", "Número de Atletas")
                    .build()
            }),
        ),
        Some(uf) => (
            chart_or_notice(&rows.head(20), |rs| {
                ChartBuilder::bar(rs, format!("Top 20 Municípios em {}", uf))
                    .x("municipio", "Município")
                    .y("valor_total", "Valor Total (R$)")
                    .tick_angle(45)
                    .build()
            }),
            chart_or_notice(&rows.head(10), |rs| {
                ChartBuilder::pie(rs, format!("Top 10 Municípios em {}", uf))
                    .x("municipio", "Município")
                    .y("num_atletas", "Número de Atletas")
                    .build()
            }),
        ),
    };
    view.push(Block::Columns {
        columns: vec![vec![bar], vec![pie]],
    });

    view.blocks.extend(detail_table(&rows));
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_db;

    #[tokio::test]
    async fn test_all_states() {
        let (_dir, db) = fixture_db().await;
        let view = build(&db, &PageParams::default()).await.unwrap();

        assert_eq!(view.metric("Municípios"), Some("4"));
        assert_eq!(view.metric("Atletas"), Some("4"));
        assert_eq!(view.metric("Valor Total"), Some("R$ 17,660.00"));

        let table = view.tables()[0];
        let uf = table.columns.iter().position(|c| c == "uf").unwrap();
        let order: Vec<&str> = table.rows.iter().map(|r| r[uf].as_str()).collect();
        assert_eq!(order, vec!["RJ", "MG", "SP"]);
    }

    #[tokio::test]
    async fn test_one_state_lists_its_municipalities() {
        let (_dir, db) = fixture_db().await;
        let params = PageParams {
            state: Some("SP".into()),
            ..PageParams::default()
        };
        let view = build(&db, &params).await.unwrap();

        assert_eq!(view.metric("Municípios"), Some("2"));
        assert_eq!(view.metric("Atletas"), Some("2"));
        assert_eq!(view.metric("Valor Total"), Some("R$ 5,550.00"));

        let table = view.tables()[0];
        assert!(table.rows.iter().all(|row| row[0] == "SP"));
        assert_eq!(view.charts()[0].title, "Top 20 Municípios em SP");
    }
}
