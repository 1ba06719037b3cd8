//! Report pages and the whitelisted choices their controls offer

use serde::{Deserialize, Serialize};

/// The seven report pages, in sidebar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Overview,
    Categories,
    Disciplines,
    Regions,
    Timeline,
    Athletes,
    Raw,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Overview,
        Page::Categories,
        Page::Disciplines,
        Page::Regions,
        Page::Timeline,
        Page::Athletes,
        Page::Raw,
    ];

    /// URL path segment
    pub fn slug(self) -> &'static str {
        match self {
            Page::Overview => "overview",
            Page::Categories => "categories",
            Page::Disciplines => "disciplines",
            Page::Regions => "regions",
            Page::Timeline => "timeline",
            Page::Athletes => "athletes",
            Page::Raw => "raw",
        }
    }

    /// Sidebar label
    pub fn title(self) -> &'static str {
        match self {
            Page::Overview => "Visão Geral",
            Page::Categories => "Análise por Categoria",
            Page::Disciplines => "Análise por Modalidade",
            Page::Regions => "Análise por Região",
            Page::Timeline => "Análise Temporal",
            Page::Athletes => "Busca de Atletas",
            Page::Raw => "Dados Brutos",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|p| p.slug() == slug)
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Labels meaning "no restriction" in single-choice selects
const ALL_LABELS: [&str; 2] = ["Todas", "Todos"];

/// Normalize a single-choice select: absent, blank or "Todas"/"Todos" means all
pub fn single_choice(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !ALL_LABELS.contains(v))
        .map(str::to_string)
}

/// Time bucket for the temporal page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    #[default]
    #[serde(rename = "ano")]
    Year,
    #[serde(rename = "mes")]
    Month,
    #[serde(rename = "ano-mes")]
    YearMonth,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Granularity::Year, Granularity::Month, Granularity::YearMonth];

    /// `strftime` format applied to `data_pagamento`
    pub fn strftime(self) -> &'static str {
        match self {
            Granularity::Year => "%Y",
            Granularity::Month => "%m",
            Granularity::YearMonth => "%Y-%m",
        }
    }

    pub fn from_param(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.param() == value)
    }

    pub fn param(self) -> &'static str {
        match self {
            Granularity::Year => "ano",
            Granularity::Month => "mes",
            Granularity::YearMonth => "ano-mes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Granularity::Year => "Ano",
            Granularity::Month => "Mês",
            Granularity::YearMonth => "Ano-Mês",
        }
    }
}

/// Measure plotted on the temporal page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeMetric {
    #[default]
    #[serde(rename = "pagamentos")]
    PaymentCount,
    #[serde(rename = "valor")]
    TotalValue,
}

impl TimeMetric {
    pub const ALL: [TimeMetric; 2] = [TimeMetric::PaymentCount, TimeMetric::TotalValue];

    /// Result-set column holding the measure
    pub fn column(self) -> &'static str {
        match self {
            TimeMetric::PaymentCount => "num_pagamentos",
            TimeMetric::TotalValue => "valor_total",
        }
    }

    pub fn from_param(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.param() == value)
    }

    pub fn param(self) -> &'static str {
        match self {
            TimeMetric::PaymentCount => "pagamentos",
            TimeMetric::TotalValue => "valor",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeMetric::PaymentCount => "Quantidade de Pagamentos",
            TimeMetric::TotalValue => "Valor Total",
        }
    }
}

/// Tables browseable from the raw-data page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawTable {
    #[default]
    Pagamento,
    Atleta,
    Categoria,
    Modalidade,
    Municipio,
    Situacao,
    Edital,
}

impl RawTable {
    pub const ALL: [RawTable; 7] = [
        RawTable::Pagamento,
        RawTable::Atleta,
        RawTable::Categoria,
        RawTable::Modalidade,
        RawTable::Municipio,
        RawTable::Situacao,
        RawTable::Edital,
    ];

    /// Only whitelisted table names resolve
    pub fn from_param(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.table_name() == value)
    }

    pub fn table_name(self) -> &'static str {
        match self {
            RawTable::Pagamento => "pagamento",
            RawTable::Atleta => "atleta",
            RawTable::Categoria => "categoria",
            RawTable::Modalidade => "modalidade",
            RawTable::Municipio => "municipio",
            RawTable::Situacao => "situacao",
            RawTable::Edital => "edital",
        }
    }
}

pub const RAW_ROWS_MIN: u32 = 10;
pub const RAW_ROWS_MAX: u32 = 1000;
pub const RAW_ROWS_DEFAULT: u32 = 100;

/// Clamp the requested raw-data row count to 10..=1000 (default 100)
pub fn raw_row_limit(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(RAW_ROWS_DEFAULT)
        .clamp(RAW_ROWS_MIN, RAW_ROWS_MAX)
}
