//! rf-matrix: dense numeric matrices with a CSV codec and out-of-core support.
//!
//! A [`Matrix`] stores `T` coefficients and is written/read as `W` values
//! (coercion target of the codec). When the process-wide out-of-core mode is
//! on, matrices drop their buffer right after a successful save and can
//! defer loading their content from disk until the next save needs it.

pub mod batch;
pub mod coefficient;
pub mod csv;
pub mod lazy;
pub mod matrix;
pub mod predicate;

pub use batch::{SaveJob, save_batch};
pub use coefficient::Coefficient;
pub use csv::SaveOptions;
pub use lazy::{LazySource, OutOfCoreGuard, out_of_core_enabled};
pub use matrix::Matrix;
pub use predicate::{CellPredicate, Identity, TimeSeriesNumbers};

use std::path::PathBuf;

pub type MatrixResult<T> = Result<T, MatrixError>;

#[derive(thiserror::Error, Debug)]
pub enum MatrixError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Write error: {0}")]
    Write(#[from] std::io::Error),

    #[error("Malformed dimensions in {path}: {header:?}")]
    MalformedDimensions { path: PathBuf, header: String },

    #[error("Truncated data in {path}: expected {expected} {what}, found {found}")]
    Truncated {
        path: PathBuf,
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid cell in {path} at row {row}, column {col}: {text:?}")]
    InvalidCell {
        path: PathBuf,
        row: usize,
        col: usize,
        text: String,
    },
}
