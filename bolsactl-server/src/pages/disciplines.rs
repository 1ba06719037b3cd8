use bolsactl_core::Page;

use super::{
    chart_or_notice, choice_select, detail_table, summary_metrics, Block, Notice, PageParams,
    PageView, KEY_PAGE_DISCIPLINE,
};
use crate::charts::ChartBuilder;
use crate::db::{Database, DbError};
use crate::queries;

const TOP_DISCIPLINES: usize = 20;

pub(super) async fn build(db: &Database, params: &PageParams) -> Result<PageView, DbError> {
    let selected = params.discipline.as_deref();
    let mut view = PageView::new(Page::Disciplines, "🏅 Análise por Modalidade");

    let names = db.fetch(&queries::discipline_names()).await?;
    view.controls.push(choice_select(
        KEY_PAGE_DISCIPLINE,
        "Selecione uma modalidade:",
        "Todas",
        names.texts("modalidade"),
        selected,
    ));

    let rows = db.fetch(&queries::by_discipline(selected)).await?;
    if rows.is_empty() {
        view.push(Block::Notice(Notice::no_data()));
        return Ok(view);
    }

    let summary = db
        .fetch(&queries::summary(&queries::discipline_predicate(selected)))
        .await?;
    view.push(summary_metrics(
        &summary,
        ["Pagamentos", "Atletas", "Valor Total", "Valor Médio"],
    ));
    view.push(Block::Divider);

    let top = rows.head(TOP_DISCIPLINES);
    view.push(Block::Columns {
        columns: vec![
            vec![chart_or_notice(&top, |rs| {
                ChartBuilder::bar(rs, "Top 20 Modalidades por Valor Total")
                    .x("modalidade", "Modalidade")
                    .y("valor_total", "Valor Total (R$)")
                    .tick_angle(45)
                    .build()
            })],
            vec![chart_or_notice(&rows, |rs| {
                ChartBuilder::scatter(rs, "Relação: Atletas vs Valor Total")
                    .x("num_atletas", "Número de Atletas")
                    .y("valor_total", "Valor Total (R$)")
                    .size("num_pagamentos")
                    .hover_name("modalidade")
                    .build()
            })],
        ],
    });

    view.blocks.extend(detail_table(&rows));
    Ok(view)
}
