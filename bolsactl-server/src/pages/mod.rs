//! Page assembly: query results -> `PageView`
//!
//! Every page is re-evaluated from scratch per request. A `PageView` is a
//! flat list of blocks (metrics, charts, tables, notices) that `render`
//! turns into HTML and the JSON API serializes as-is.

mod athletes;
mod categories;
mod disciplines;
mod overview;
mod raw;
mod regions;
mod timeline;

use bolsactl_core::format::format_decimal;
use bolsactl_core::page::{raw_row_limit, single_choice};
use bolsactl_core::{
    format_count, format_money, BolsaError, GlobalFilters, Granularity, Page, RawTable, SqlValue,
    TimeMetric,
};
use serde::Serialize;
use tracing::debug;

use crate::charts::Chart;
use crate::db::{Database, DbError};
use crate::queries;
use crate::result_set::ResultSet;

/// Page-level single choices. Distinct from the sidebar's multi-select keys
/// so a page selection never leaks into the global filters.
pub const KEY_PAGE_CATEGORY: &str = "categoria_pagina";
pub const KEY_PAGE_DISCIPLINE: &str = "modalidade_pagina";
pub const KEY_PAGE_STATE: &str = "uf_pagina";

pub const KEY_GRANULARITY: &str = "agrupamento";
pub const KEY_METRIC: &str = "metrica";
pub const KEY_NAME: &str = "nome";
pub const KEY_CPF: &str = "cpf";
pub const KEY_TABLE: &str = "tabela";
pub const KEY_ROWS: &str = "linhas";

/// Shown in place of a chart or table whose query returned no rows
pub const NO_DATA: &str =
    "📊 Nenhum dado encontrado para esta visualização com os filtros aplicados.";

/// Single-valued page controls (last value wins)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageParams {
    pub category: Option<String>,
    pub discipline: Option<String>,
    pub state: Option<String>,
    pub granularity: Granularity,
    pub metric: TimeMetric,
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub table: RawTable,
    pub rows: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            category: None,
            discipline: None,
            state: None,
            granularity: Granularity::default(),
            metric: TimeMetric::default(),
            name: None,
            cpf: None,
            table: RawTable::default(),
            rows: raw_row_limit(None),
        }
    }
}

/// Everything a page needs from the query string
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageRequest {
    pub filters: GlobalFilters,
    pub params: PageParams,
}

impl PageRequest {
    /// Parse a raw (still percent-encoded) query string
    pub fn from_query(query: Option<&str>) -> Result<Self, BolsaError> {
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.unwrap_or("").as_bytes())
            .into_owned()
            .collect();
        Self::from_pairs(&pairs)
    }

    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, BolsaError> {
        let filters = GlobalFilters::from_pairs(pairs.iter().map(|(k, v)| (k, v)))?;

        let last = |key: &str| {
            pairs
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        let granularity = match single_choice(last(KEY_GRANULARITY)) {
            Some(v) => Granularity::from_param(&v).ok_or_else(|| {
                BolsaError::invalid_filter(KEY_GRANULARITY, format!("unknown grouping '{}'", v))
            })?,
            None => Granularity::default(),
        };
        let metric = match single_choice(last(KEY_METRIC)) {
            Some(v) => TimeMetric::from_param(&v).ok_or_else(|| {
                BolsaError::invalid_filter(KEY_METRIC, format!("unknown metric '{}'", v))
            })?,
            None => TimeMetric::default(),
        };
        let table = match single_choice(last(KEY_TABLE)) {
            Some(v) => RawTable::from_param(&v).ok_or_else(|| {
                BolsaError::invalid_filter(KEY_TABLE, format!("unknown table '{}'", v))
            })?,
            None => RawTable::default(),
        };
        let rows = match single_choice(last(KEY_ROWS)) {
            Some(v) => Some(v.parse::<u32>().map_err(|_| {
                BolsaError::invalid_filter(KEY_ROWS, format!("expected a row count, got '{}'", v))
            })?),
            None => None,
        };

        let params = PageParams {
            category: single_choice(last(KEY_PAGE_CATEGORY)),
            discipline: single_choice(last(KEY_PAGE_DISCIPLINE)),
            state: single_choice(last(KEY_PAGE_STATE)),
            granularity,
            metric,
            name: single_choice(last(KEY_NAME)),
            cpf: single_choice(last(KEY_CPF)),
            table,
            rows: raw_row_limit(rows),
        };

        Ok(Self { filters, params })
    }
}

/// One rendered page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub page: Page,
    pub title: &'static str,
    pub header: String,
    pub controls: Vec<Control>,
    pub blocks: Vec<Block>,
}

impl PageView {
    fn new(page: Page, header: impl Into<String>) -> Self {
        Self {
            page,
            title: page.title(),
            header: header.into(),
            controls: Vec::new(),
            blocks: Vec::new(),
        }
    }

    fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// All notices on the page, in order
    pub fn notices(&self) -> Vec<&Notice> {
        fn collect<'a>(blocks: &'a [Block], out: &mut Vec<&'a Notice>) {
            for block in blocks {
                match block {
                    Block::Notice(n) => out.push(n),
                    Block::Columns { columns } => {
                        for col in columns {
                            collect(col, out);
                        }
                    }
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.blocks, &mut out);
        out
    }

    /// All charts on the page, in order
    pub fn charts(&self) -> Vec<&Chart> {
        fn collect<'a>(blocks: &'a [Block], out: &mut Vec<&'a Chart>) {
            for block in blocks {
                match block {
                    Block::Chart(c) => out.push(c),
                    Block::Columns { columns } => {
                        for col in columns {
                            collect(col, out);
                        }
                    }
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.blocks, &mut out);
        out
    }

    /// Metric value by label, first match
    pub fn metric(&self, label: &str) -> Option<&str> {
        self.blocks.iter().find_map(|b| match b {
            Block::Metrics { items } => items
                .iter()
                .find(|m| m.label == label)
                .map(|m| m.value.as_str()),
            _ => None,
        })
    }

    pub fn tables(&self) -> Vec<&Table> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Subheader { text: String },
    Metrics { items: Vec<Metric> },
    Chart(Chart),
    /// Side-by-side columns, each a list of blocks
    Columns { columns: Vec<Vec<Block>> },
    Table(Table),
    Notice(Notice),
    Text { text: String },
    Divider,
}

impl Block {
    fn subheader(text: impl Into<String>) -> Self {
        Block::Subheader { text: text.into() }
    }

    fn text(text: impl Into<String>) -> Self {
        Block::Text { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, text: text.into() }
    }

    fn no_data() -> Self {
        Self::info(NO_DATA)
    }
}

/// Display table; cells are already formatted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Format a result set; `money` columns are shown as `R$ 1,234.56`
    pub fn from_result(rs: &ResultSet, money: &[&str]) -> Self {
        let money_idx: Vec<bool> = rs
            .columns
            .iter()
            .map(|c| money.contains(&c.as_str()))
            .collect();

        let rows = rs
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(i, cell)| format_cell(cell, money_idx.get(i).copied().unwrap_or(false)))
                    .collect()
            })
            .collect();

        Self {
            columns: rs.columns.clone(),
            rows,
        }
    }
}

fn format_cell(cell: &SqlValue, money: bool) -> String {
    match cell {
        SqlValue::Null => String::new(),
        _ if money => cell.as_f64().map(format_money).unwrap_or_default(),
        SqlValue::Real(r) => format_decimal(*r),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn same(value: impl Into<String>) -> Self {
        let value = value.into();
        Self { label: value.clone(), value }
    }
}

/// Page-level input widgets
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    Select {
        name: &'static str,
        label: &'static str,
        options: Vec<SelectOption>,
        selected: String,
    },
    Text {
        name: &'static str,
        label: &'static str,
        value: String,
    },
    Range {
        name: &'static str,
        label: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },
}

/// Select whose first option ("Todas"/"Todos") means no restriction
fn choice_select(
    name: &'static str,
    label: &'static str,
    all_label: &str,
    values: Vec<String>,
    selected: Option<&str>,
) -> Control {
    let mut options = vec![SelectOption::same(all_label)];
    options.extend(values.into_iter().map(SelectOption::same));
    Control::Select {
        name,
        label,
        options,
        selected: selected.unwrap_or(all_label).to_string(),
    }
}

/// Options offered by the sidebar filters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub disciplines: Vec<String>,
    pub states: Vec<String>,
    pub min_date: Option<String>,
    pub max_date: Option<String>,
}

pub async fn filter_options(db: &Database) -> Result<FilterOptions, DbError> {
    let categories = db.fetch(&queries::category_names()).await?;
    let disciplines = db.fetch(&queries::discipline_names()).await?;
    let states = db.fetch(&queries::state_codes()).await?;
    let range = db.fetch(&queries::payment_date_range()).await?;

    let date = |col: &str| {
        range
            .value(0, col)
            .and_then(SqlValue::as_str)
            .map(str::to_string)
    };

    Ok(FilterOptions {
        categories: categories.texts("categoria"),
        disciplines: disciplines.texts("modalidade"),
        states: states.texts("uf"),
        min_date: date("min_date"),
        max_date: date("max_date"),
    })
}

/// Build `page` for `request`
pub async fn build(db: &Database, page: Page, request: &PageRequest) -> Result<PageView, DbError> {
    debug!(page = %page, "building page");
    match page {
        Page::Overview => overview::build(db, &request.filters).await,
        Page::Categories => categories::build(db, &request.params).await,
        Page::Disciplines => disciplines::build(db, &request.params).await,
        Page::Regions => regions::build(db, &request.params).await,
        Page::Timeline => timeline::build(db, &request.params).await,
        Page::Athletes => athletes::build(db, &request.params).await,
        Page::Raw => raw::build(db, &request.params).await,
    }
}

/// Chart built from `rs`, or the no-data notice when it is empty
fn chart_or_notice(rs: &ResultSet, chart: impl FnOnce(&ResultSet) -> Chart) -> Block {
    if rs.is_empty() {
        Block::Notice(Notice::no_data())
    } else {
        Block::Chart(chart(rs))
    }
}

/// The four headline metrics of a `queries::summary` result
fn summary_metrics(summary: &ResultSet, labels: [&str; 4]) -> Block {
    Block::Metrics {
        items: vec![
            Metric::new(labels[0], format_count(summary.scalar_i64("total_pagamentos"))),
            Metric::new(labels[1], format_count(summary.scalar_i64("total_atletas"))),
            Metric::new(labels[2], format_money(summary.scalar_f64("valor_total"))),
            Metric::new(labels[3], format_money(summary.scalar_f64("valor_medio"))),
        ],
    }
}

fn detail_table(rs: &ResultSet) -> Vec<Block> {
    if rs.is_empty() {
        return vec![Block::subheader("📋 Detalhamento"), Block::Notice(Notice::no_data())];
    }
    vec![
        Block::subheader("📋 Detalhamento"),
        Block::Table(Table::from_result(rs, &["valor_total", "valor_medio"])),
    ]
}
