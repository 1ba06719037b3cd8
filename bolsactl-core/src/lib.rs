//! bolsactl-core: domain types for the Bolsa Atleta stipend dashboard
//!
//! Filters, pages, bound-parameter SQL fragments, configuration and
//! display formatting. No I/O beyond reading the config file.

pub mod config;
pub mod error;
pub mod filters;
pub mod format;
pub mod page;
pub mod sql;

pub use config::DashboardConfig;
pub use error::{BolsaError, Result};
pub use filters::GlobalFilters;
pub use format::{format_count, format_money};
pub use page::{Granularity, Page, RawTable, TimeMetric};
pub use sql::{Predicate, SqlParam, SqlQuery, SqlValue};
