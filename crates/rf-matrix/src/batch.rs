//! Parallel export of independent matrices.

use std::path::PathBuf;

use rayon::prelude::*;

use crate::coefficient::Coefficient;
use crate::csv::SaveOptions;
use crate::matrix::Matrix;
use crate::MatrixResult;

/// One matrix to write, owned exclusively by the job.
#[derive(Debug)]
pub struct SaveJob<'a, T: Coefficient = f64, W: Coefficient = T> {
    pub matrix: &'a mut Matrix<T, W>,
    pub path: PathBuf,
    pub options: SaveOptions,
}

/// Save every job on the rayon pool. Results keep the job order.
///
/// Each job holds the only mutable borrow of its matrix, so the
/// load-write-release sequence of a matrix never runs on two threads.
pub fn save_batch<T: Coefficient, W: Coefficient>(
    jobs: &mut [SaveJob<'_, T, W>],
) -> Vec<MatrixResult<()>> {
    jobs.par_iter_mut()
        .map(|job| job.matrix.save_to_csv_file(&job.path, job.options))
        .collect()
}
