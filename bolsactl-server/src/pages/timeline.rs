//! Análise Temporal: payments grouped by year, month or year-month

use bolsactl_core::{format_count, format_money, Granularity, Page, TimeMetric};

use super::{
    chart_or_notice, detail_table, Block, Control, Metric, Notice, PageParams, PageView,
    SelectOption, KEY_GRANULARITY, KEY_METRIC,
};
use crate::charts::ChartBuilder;
use crate::db::{Database, DbError};
use crate::queries;

fn controls(params: &PageParams) -> Vec<Control> {
    vec![
        Control::Select {
            name: KEY_GRANULARITY,
            label: "Agrupar por:",
            options: Granularity::ALL
                .iter()
                .map(|g| SelectOption {
                    value: g.param().to_string(),
                    label: g.label().to_string(),
                })
                .collect(),
            selected: params.granularity.param().to_string(),
        },
        Control::Select {
            name: KEY_METRIC,
            label: "Métrica:",
            options: TimeMetric::ALL
                .iter()
                .map(|m| SelectOption {
                    value: m.param().to_string(),
                    label: m.label().to_string(),
                })
                .collect(),
            selected: params.metric.param().to_string(),
        },
    ]
}

pub(super) async fn build(db: &Database, params: &PageParams) -> Result<PageView, DbError> {
    let mut view = PageView::new(Page::Timeline, "📅 Análise Temporal");
    view.controls = controls(params);

    let rows = db.fetch(&queries::timeline(params.granularity)).await?;
    if rows.is_empty() {
        view.push(Block::Notice(Notice::no_data()));
        return Ok(view);
    }

    let metric = params.metric;
    let column = metric.column();

    view.push(chart_or_notice(&rows, |rs| {
        ChartBuilder::line(rs, format!("Evolução {} ao Longo do Tempo", metric.label()))
            .x("periodo", "Período")
            .y(column, metric.label())
            .build()
    }));

    let dated = db.fetch(&queries::dated_summary()).await?;
    view.push(Block::Metrics {
        items: vec![
            Metric::new("Total de Períodos", format_count(rows.len() as i64)),
            Metric::new(
                "Total de Pagamentos",
                format_count(dated.scalar_i64("total_pagamentos")),
            ),
            Metric::new("Valor Total", format_money(dated.scalar_f64("valor_total"))),
            Metric::new("Valor Médio", format_money(dated.scalar_f64("valor_medio"))),
        ],
    });
    view.push(Block::Divider);

    view.push(chart_or_notice(&rows, |rs| {
        ChartBuilder::bar(rs, format!("{} por Período", metric.label()))
            .x("periodo", "Período")
            .y(column, metric.label())
            .tick_angle(45)
            .build()
    }));

    view.blocks.extend(detail_table(&rows));
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_db;

    #[tokio::test]
    async fn test_yearly_payment_counts() {
        let (_dir, db) = fixture_db().await;
        let view = build(&db, &PageParams::default()).await.unwrap();

        assert_eq!(view.metric("Total de Períodos"), Some("2"));
        assert_eq!(view.metric("Total de Pagamentos"), Some("7"));

        let line = view.charts()[0];
        assert_eq!(
            line.title,
            "Evolução Quantidade de Pagamentos ao Longo do Tempo"
        );
        assert_eq!(line.figure["data"][0]["x"], serde_json::json!(["2020", "2021"]));
        assert_eq!(line.figure["data"][0]["y"], serde_json::json!([3.0, 4.0]));
    }

    #[tokio::test]
    async fn test_granularity_keeps_total() {
        let (_dir, db) = fixture_db().await;

        for granularity in Granularity::ALL {
            let params = PageParams {
                granularity,
                metric: TimeMetric::TotalValue,
                ..PageParams::default()
            };
            let view = build(&db, &params).await.unwrap();
            assert_eq!(view.metric("Valor Total"), Some("R$ 12,160.00"));

            let bars = view.charts()[1];
            let sum: f64 = bars.figure["data"][0]["y"]
                .as_array()
                .unwrap()
                .iter()
                .filter_map(|v| v.as_f64())
                .sum();
            assert_eq!(sum, 12160.0);
        }
    }

    #[tokio::test]
    async fn test_monthly_periods() {
        let (_dir, db) = fixture_db().await;
        let params = PageParams {
            granularity: Granularity::Month,
            metric: TimeMetric::TotalValue,
            ..PageParams::default()
        };
        let view = build(&db, &params).await.unwrap();

        assert_eq!(view.metric("Total de Períodos"), Some("4"));
        let bars = view.charts()[1];
        assert_eq!(bars.title, "Valor Total por Período");
        assert_eq!(
            bars.figure["data"][0]["y"],
            serde_json::json!([925.0, 2775.0, 4950.0, 3510.0])
        );
    }
}
