//! bolsactl-server: read-only reporting dashboard over the Bolsa Atleta database
//!
//! - `db` / `queries` / `cache`: SQLite access through a memoizing query layer
//! - `pages` / `charts` / `render`: result sets to page views, Plotly figures and HTML
//! - `http`: axum router, JSON API and server lifecycle

pub mod cache;
pub mod charts;
pub mod db;
pub mod http;
pub mod pages;
pub mod queries;
pub mod render;
pub mod result_set;

#[cfg(test)]
mod test_support;

pub use cache::{CacheStats, QueryCache};
pub use db::{Database, DbError, OpenOptions};
pub use http::{run_server, ServerConfig};
pub use pages::{PageRequest, PageView};
pub use result_set::ResultSet;
