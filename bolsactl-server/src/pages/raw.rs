use bolsactl_core::page::{RAW_ROWS_MAX, RAW_ROWS_MIN};
use bolsactl_core::{Page, RawTable};

use super::{Block, Control, PageParams, PageView, SelectOption, Table, KEY_ROWS, KEY_TABLE};
use crate::db::{Database, DbError};
use crate::queries;

pub(super) async fn build(db: &Database, params: &PageParams) -> Result<PageView, DbError> {
    let mut view = PageView::new(Page::Raw, "📄 Dados Brutos");
    view.controls = vec![
        Control::Select {
            name: KEY_TABLE,
            label: "Selecione uma tabela:",
            options: RawTable::ALL
                .iter()
                .map(|t| SelectOption::same(t.table_name()))
                .collect(),
            selected: params.table.table_name().to_string(),
        },
        Control::Range {
            name: KEY_ROWS,
            label: "Número de linhas:",
            min: RAW_ROWS_MIN,
            max: RAW_ROWS_MAX,
            value: params.rows,
        },
    ];

    let rows = db.fetch(&queries::raw_rows(params.table, params.rows)).await?;

    view.push(Block::subheader(format!(
        "Dados da tabela: {}",
        params.table.table_name()
    )));
    view.push(Block::Table(Table::from_result(&rows, &[])));
    view.push(Block::subheader("Estatísticas"));
    view.push(Block::text(format!("Total de linhas exibidas: {}", rows.len())));
    view.push(Block::text(format!("Total de colunas: {}", rows.columns.len())));

    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture_db, fixture_db_with};

    #[tokio::test]
    async fn test_default_table() {
        let (_dir, db) = fixture_db().await;
        let view = build(&db, &PageParams::default()).await.unwrap();

        assert_eq!(view.tables()[0].rows.len(), 8);
        assert!(view
            .blocks
            .contains(&Block::text("Total de colunas: 9")));
    }

    #[tokio::test]
    async fn test_other_table() {
        let (_dir, db) = fixture_db().await;
        let params = PageParams {
            table: RawTable::Municipio,
            rows: 10,
            ..PageParams::default()
        };
        let view = build(&db, &params).await.unwrap();

        let table = view.tables()[0];
        assert_eq!(table.columns, vec!["id_municipio", "municipio", "uf"]);
        assert_eq!(table.rows.len(), 4);
        assert!(view
            .blocks
            .contains(&Block::text("Total de linhas exibidas: 4")));
    }

    #[tokio::test]
    async fn test_empty_table_keeps_headers() {
        let (_dir, db) = fixture_db_with("DELETE FROM situacao;").await;
        let params = PageParams {
            table: RawTable::Situacao,
            ..PageParams::default()
        };
        let view = build(&db, &params).await.unwrap();

        let table = view.tables()[0];
        assert_eq!(table.columns, vec!["id_situacao", "situacao"]);
        assert!(table.rows.is_empty());
        assert!(view
            .blocks
            .contains(&Block::text("Total de linhas exibidas: 0")));
        assert!(view.blocks.contains(&Block::text("Total de colunas: 2")));
    }
}
