use bolsactl_core::Page;

use super::{
    chart_or_notice, choice_select, detail_table, summary_metrics, Block, Notice, PageParams,
    PageView, KEY_PAGE_CATEGORY,
};
use crate::charts::ChartBuilder;
use crate::db::{Database, DbError};
use crate::queries;

pub(super) async fn build(db: &Database, params: &PageParams) -> Result<PageView, DbError> {
    let selected = params.category.as_deref();
    let mut view = PageView::new(Page::Categories, "📊 Análise por Categoria");

    let names = db.fetch(&queries::category_names()).await?;
    view.controls.push(choice_select(
        KEY_PAGE_CATEGORY,
        "Selecione uma categoria:",
        "Todas",
        names.texts("categoria"),
        selected,
    ));

    let rows = db.fetch(&queries::by_category(selected)).await?;
    if rows.is_empty() {
        view.push(Block::Notice(Notice::no_data()));
        return Ok(view);
    }

    let summary = db
        .fetch(&queries::summary(&queries::category_predicate(selected)))
        .await?;
    view.push(summary_metrics(
        &summary,
        ["Pagamentos", "Atletas", "Valor Total", "Valor Médio"],
    ));
    view.push(Block::Divider);

    view.push(Block::Columns {
        columns: vec![
            vec![chart_or_notice(&rows, |rs| {
                ChartBuilder::pie(rs, "Distribuição de Valores por Categoria")
                    .x("categoria", "Categoria")
                    .y("valor_total", "Valor Total (R$)")
                    .build()
            })],
            vec![chart_or_notice(&rows, |rs| {
                ChartBuilder::bar(rs, "Número de Atletas por Categoria")
                    .x("categoria", "Categoria")
                    .y("num_atletas", "Número de Atletas")
                    .tick_angle(45)
                    .build()
            })],
        ],
    });

    view.blocks.extend(detail_table(&rows));
    Ok(view)
}
