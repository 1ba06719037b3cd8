//! Busca de Atletas: name search plus a per-athlete payment history

use bolsactl_core::{format_count, format_money, Page};

use super::{Block, Control, Metric, Notice, PageParams, PageView, SelectOption, Table, KEY_CPF, KEY_NAME};
use crate::db::{Database, DbError};
use crate::queries;

pub(super) async fn build(db: &Database, params: &PageParams) -> Result<PageView, DbError> {
    let mut view = PageView::new(Page::Athletes, "🔍 Busca de Atletas");
    view.controls.push(Control::Text {
        name: KEY_NAME,
        label: "Digite o nome do atleta (ou parte do nome):",
        value: params.name.clone().unwrap_or_default(),
    });

    let Some(name) = params.name.as_deref() else {
        view.push(Block::Notice(Notice::info("Digite um nome para buscar atletas.")));
        return Ok(view);
    };

    let found = db.fetch(&queries::athlete_search(name)).await?;
    if found.is_empty() {
        view.push(Block::Notice(Notice::warning(
            "Nenhum atleta encontrado com esse nome.",
        )));
        return Ok(view);
    }

    view.push(Block::Notice(Notice::success(format!(
        "Encontrados {} atleta(s)",
        found.len()
    ))));

    let names = found.texts("nome");
    let cpfs = found.texts("cpf");
    let chosen = params
        .cpf
        .as_deref()
        .and_then(|cpf| cpfs.iter().position(|c| c == cpf))
        .unwrap_or(0);

    view.controls.push(Control::Select {
        name: KEY_CPF,
        label: "Selecione um atleta para ver detalhes:",
        options: cpfs
            .iter()
            .zip(&names)
            .map(|(cpf, nome)| SelectOption {
                value: cpf.clone(),
                label: nome.clone(),
            })
            .collect(),
        selected: cpfs[chosen].clone(),
    });

    view.push(Block::Table(Table::from_result(
        &found,
        &["valor_total", "valor_medio"],
    )));

    let payments = db.fetch(&queries::athlete_payments(&cpfs[chosen])).await?;
    let count = payments.len();
    let total = payments.sum("valor_pago");
    let average = if count == 0 { 0.0 } else { total / count as f64 };

    view.push(Block::subheader(format!("Detalhes de {}", names[chosen])));
    view.push(Block::Metrics {
        items: vec![
            Metric::new("Total de Pagamentos", format_count(count as i64)),
            Metric::new("Valor Total Recebido", format_money(total)),
            Metric::new("Valor Médio", format_money(average)),
        ],
    });
    view.push(Block::Table(Table::from_result(&payments, &["valor_pago"])));

    Ok(view)
}
