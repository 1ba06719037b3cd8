/// Structured error types for bolsactl-core.
///
/// Library crates return `BolsaError`; the `bolsactl` binary wraps these in
/// `anyhow` with additional context.
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bolsactl-core operations
#[derive(Error, Debug)]
pub enum BolsaError {
    /// The stipend database file does not exist. Fatal at startup.
    #[error(
        "Banco de dados não encontrado: {}\n\n\
         Coloque o arquivo bolsa_atleta.db no diretório de trabalho, \
         ou informe o caminho com --db-path / BOLSACTL_DB_PATH.",
        path.display()
    )]
    DatabaseMissing { path: PathBuf },

    /// A filter value could not be interpreted
    #[error("Invalid filter '{field}': {reason}")]
    InvalidFilter { field: &'static str, reason: String },
}

/// Result type alias for bolsactl-core operations
pub type Result<T> = std::result::Result<T, BolsaError>;

impl BolsaError {
    /// Create a missing-database error
    pub fn database_missing(path: impl Into<PathBuf>) -> Self {
        Self::DatabaseMissing { path: path.into() }
    }

    /// Create an invalid filter error
    pub fn invalid_filter(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidFilter {
            field,
            reason: reason.into(),
        }
    }
}
