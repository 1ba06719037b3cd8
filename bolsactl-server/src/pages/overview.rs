//! Visão Geral: executive dashboard driven by the global filters

use bolsactl_core::{GlobalFilters, Page};

use super::{chart_or_notice, summary_metrics, Block, Notice, PageView, Table};
use crate::charts::ChartBuilder;
use crate::db::{Database, DbError};
use crate::queries;

pub(super) async fn build(db: &Database, filters: &GlobalFilters) -> Result<PageView, DbError> {
    let pred = filters.predicate();
    let mut view = PageView::new(Page::Overview, "📈 Dashboard Executivo - Bolsa Atleta");

    let summary = db.fetch(&queries::summary(&pred)).await?;
    view.push(summary_metrics(
        &summary,
        [
            "💰 Total de Pagamentos",
            "👥 Total de Atletas",
            "💵 Valor Total Pago",
            "📊 Valor Médio",
        ],
    ));
    view.push(Block::Divider);

    let bands = db.fetch(&queries::value_bands(&pred)).await?;
    let averages = db.fetch(&queries::average_by_category(&pred)).await?;
    view.push(Block::Columns {
        columns: vec![
            vec![
                Block::subheader("💰 Distribuição de Valores Pagos"),
                chart_or_notice(&bands, |rs| {
                    ChartBuilder::bar(rs, "Pagamentos por Faixa de Valor")
                        .x("faixa_valor", "Faixa de Valor")
                        .y("quantidade", "Quantidade")
                        .color("quantidade", "Blues")
                        .build()
                }),
            ],
            vec![
                Block::subheader("💵 Valor Médio por Categoria"),
                chart_or_notice(&averages, |rs| {
                    ChartBuilder::bar(rs, "Valor Médio de Pagamento por Categoria")
                        .x("categoria", "Categoria")
                        .y("valor_medio", "Valor Médio (R$)")
                        .color("valor_medio", "Greens")
                        .text("valor_medio", "R$ %{text:,.2f}")
                        .tick_angle(45)
                        .build()
                }),
            ],
        ],
    });

    let disciplines = db.fetch(&queries::top_disciplines_by_total(&pred)).await?;
    let categories = db.fetch(&queries::category_distribution(&pred)).await?;
    view.push(Block::Columns {
        columns: vec![
            vec![
                Block::subheader("🏅 Top 10 Modalidades por Valor Total"),
                chart_or_notice(&disciplines, |rs| {
                    ChartBuilder::bar(rs, "Top 10 Modalidades")
                        .x("modalidade", "Modalidade")
                        .y("valor_total", "Valor Total (R$)")
                        .color("valor_total", "Viridis")
                        .tick_angle(45)
                        .build()
                }),
            ],
            vec![
                Block::subheader("📊 Distribuição por Categoria"),
                chart_or_notice(&categories, |rs| {
                    ChartBuilder::donut(rs, "Distribuição de Valores por Categoria")
                        .x("categoria", "Categoria")
                        .y("valor_total", "Valor Total (R$)")
                        .build()
                }),
            ],
        ],
    });
    view.push(Block::Divider);

    let states = db.fetch(&queries::top_states(&pred)).await?;
    let municipalities = db.fetch(&queries::top_municipalities(&pred)).await?;
    view.push(Block::Columns {
        columns: vec![
            vec![
                Block::subheader("🗺️ Top 10 Estados por Valor Total"),
                chart_or_notice(&states, |rs| {
                    ChartBuilder::bar(rs, "Top 10 Estados")
                        .x("uf", "Estado")
                        .y("valor_total", "Valor Total (R$)")
                        .color("num_atletas", "Reds")
                        .build()
                }),
            ],
            vec![
                Block::subheader("🏆 Top 10 Municípios por Valor Total"),
                chart_or_notice(&municipalities, |rs| {
                    ChartBuilder::horizontal_bar(rs, "Top 10 Municípios por Valor Total")
                        .x("localizacao", "Município - UF")
                        .y("valor_total", "Valor Total (R$)")
                        .color("num_atletas", "Oranges")
                        .build()
                }),
            ],
        ],
    });
    view.push(Block::Divider);

    let by_athletes = db.fetch(&queries::top_disciplines_by_athletes(&pred)).await?;
    let geography = db.fetch(&queries::state_geography(&pred)).await?;
    view.push(Block::Columns {
        columns: vec![
            vec![
                Block::subheader("📊 Comparação: Modalidades com Mais Atletas"),
                chart_or_notice(&by_athletes, |rs| {
                    ChartBuilder::bar(rs, "Top 10 Modalidades por Número de Atletas")
                        .x("modalidade", "Modalidade")
                        .y("num_atletas", "Número de Atletas")
                        .color("valor_total", "Purples")
                        .text("num_atletas", "%{text}")
                        .tick_angle(45)
                        .build()
                }),
            ],
            vec![
                Block::subheader("🗺️ Distribuição Geográfica por Estado"),
                chart_or_notice(&geography, |rs| {
                    ChartBuilder::treemap(rs, "Distribuição de Valores por Estado")
                        .x("uf", "Estado")
                        .y("valor_total", "Valor Total (R$)")
                        .color("num_atletas", "RdBu")
                        .hover_data(&["num_atletas", "num_pagamentos"])
                        .build()
                }),
            ],
        ],
    });
    view.push(Block::Divider);

    view.push(Block::subheader("📋 Resumo Detalhado"));
    let detail = db.fetch(&queries::detailed_summary(&pred)).await?;
    if detail.is_empty() {
        view.push(Block::Notice(Notice::no_data()));
    } else {
        view.push(Block::Table(Table::from_result(
            &detail,
            &["valor_total", "valor_medio"],
        )));
    }

    Ok(view)
}
