//! Error types for pipeline operations.

use rf_core::RfError;
use rf_matrix::MatrixError;
use rf_registry::RegistryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Pipelines and registry were not built from the same variable list.
    #[error("Configuration integrity: {what}")]
    ConfigurationIntegrity { what: String },

    #[error("Unknown {what}: {id}")]
    UnknownEntity { what: &'static str, id: u32 },

    #[error("Invalid space {space} (parallel spaces: {spaces})")]
    InvalidSpace { space: usize, spaces: usize },

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Matrix error: {0}")]
    Matrix(#[from] MatrixError),

    #[error("Study error: {0}")]
    Core(#[from] RfError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    pub(crate) fn integrity(what: impl Into<String>) -> Self {
        Self::ConfigurationIntegrity { what: what.into() }
    }
}
