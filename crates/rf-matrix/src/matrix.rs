//! Dense column-major matrix.

use std::fs;
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::coefficient::Coefficient;
use crate::csv::{self, SaveOptions};
use crate::lazy::{LazySource, out_of_core_enabled};
use crate::predicate::{CellPredicate, Identity};
use crate::{MatrixError, MatrixResult};

/// `rows x cols` buffer of `T`, written and read as `W`.
///
/// Storage is column-major: `column(c)` is a contiguous slice of `rows` cells.
#[derive(Clone, Debug)]
pub struct Matrix<T: Coefficient = f64, W: Coefficient = T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
    lazy: Option<LazySource>,
    storage: PhantomData<W>,
}

impl<T: Coefficient, W: Coefficient> Default for Matrix<T, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Coefficient, W: Coefficient> Matrix<T, W> {
    /// Empty matrix without lazy source.
    pub fn new() -> Self {
        Self {
            rows: 0,
            cols: 0,
            data: Vec::new(),
            lazy: None,
            storage: PhantomData,
        }
    }

    /// Zero-filled matrix. Never attaches a lazy source.
    pub fn with_size(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::default(); rows * cols],
            lazy: None,
            storage: PhantomData,
        }
    }

    /// Matrix filled from row-major values; missing values are zero.
    pub fn from_row_major(rows: usize, cols: usize, values: &[T]) -> Self {
        let mut m = Self::with_size(rows, cols);
        for (i, value) in values.iter().take(rows * cols).enumerate() {
            let (row, col) = (i / cols, i % cols);
            m.data[col * rows + row] = *value;
        }
        m
    }

    /// Single-column matrix.
    pub fn from_column(values: Vec<T>) -> Self {
        Self {
            rows: values.len(),
            cols: 1,
            data: values,
            lazy: None,
            storage: PhantomData,
        }
    }

    /// Matrix whose content stays in `path` until a save needs it.
    pub fn deferred(path: impl Into<PathBuf>, expected_rows: usize, expected_cols: usize) -> Self {
        Self {
            lazy: Some(LazySource::deferred(path, expected_rows, expected_cols)),
            ..Self::new()
        }
    }

    /// Reallocate as `rows x cols`, zero-filled when `clear` is set.
    ///
    /// Drops any lazy source, and attaches a fresh one when the out-of-core
    /// mode is on.
    pub fn reset(&mut self, rows: usize, cols: usize, clear: bool) {
        if clear {
            self.data.clear();
        }
        self.data.resize(rows * cols, T::default());
        self.rows = rows;
        self.cols = cols;
        self.lazy = out_of_core_enabled().then(LazySource::fresh);
    }

    /// Free the buffer. A lazy source stays attached but is no longer loaded.
    pub fn clear(&mut self) {
        self.rows = 0;
        self.cols = 0;
        self.data = Vec::new();
        if let Some(lazy) = self.lazy.as_mut() {
            lazy.loaded = false;
        }
    }

    pub fn empty(&self) -> bool {
        self.rows * self.cols == 0
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        (row < self.rows && col < self.cols).then(|| self.data[col * self.rows + row])
    }

    pub fn column(&self, col: usize) -> &[T] {
        &self.data[col * self.rows..(col + 1) * self.rows]
    }

    pub fn column_mut(&mut self, col: usize) -> &mut [T] {
        self.touch();
        let rows = self.rows;
        &mut self.data[col * rows..(col + 1) * rows]
    }

    pub fn fill(&mut self, value: T) {
        self.touch();
        self.data.fill(value);
    }

    /// Column-major cells.
    pub fn values(&self) -> &[T] {
        &self.data
    }

    pub fn lazy(&self) -> Option<&LazySource> {
        self.lazy.as_ref()
    }

    pub fn lazy_mut(&mut self) -> Option<&mut LazySource> {
        self.lazy.as_mut()
    }

    pub fn set_lazy(&mut self, lazy: Option<LazySource>) {
        self.lazy = lazy;
    }

    /// Ask for a reload from the backing file at the next save.
    ///
    /// Returns false when no backing file is known.
    pub fn mark_for_load(&mut self) -> bool {
        match self.lazy.as_mut() {
            Some(lazy) if lazy.path.is_some() => {
                lazy.request_load = true;
                true
            }
            _ => false,
        }
    }

    fn touch(&mut self) {
        if let Some(lazy) = self.lazy.as_mut() {
            lazy.modified = true;
        }
    }

    /// Load the backing file if a load is pending.
    ///
    /// Returns whether a load happened.
    pub fn ensure_loaded(&mut self) -> MatrixResult<bool> {
        let Some(lazy) = self.lazy.as_mut().filter(|lazy| lazy.needs_load()) else {
            return Ok(false);
        };
        // Without a backing file the buffer is the only content.
        let Some(path) = lazy.path.clone() else {
            lazy.request_load = false;
            debug!(rows = self.rows, cols = self.cols, "load request without source dropped");
            return Ok(false);
        };
        let (rows, cols) = (lazy.expected_rows, lazy.expected_cols);
        self.load_from_csv_file(&path, rows, cols)?;
        if let Some(lazy) = self.lazy.as_mut() {
            lazy.request_load = false;
        }
        Ok(true)
    }

    /// Replace the content with the file at `path`.
    ///
    /// `expected_rows x expected_cols` is the size of an empty file, and the
    /// minimum number of rows of a file without size header.
    pub fn load_from_csv_file(
        &mut self,
        path: &Path,
        expected_rows: usize,
        expected_cols: usize,
    ) -> MatrixResult<()> {
        let text = fs::read_to_string(path).map_err(|source| MatrixError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let grid = csv::parse_csv::<W>(&text, path, expected_rows, expected_cols)?;
        debug!(path = %path.display(), rows = grid.rows, cols = grid.cols, "matrix loaded");

        self.rows = grid.rows;
        self.cols = grid.cols;
        self.data = grid
            .data
            .into_iter()
            .map(|cell| T::from_f64(cell.to_f64()))
            .collect();
        if let Some(lazy) = self.lazy.as_mut() {
            lazy.loaded = true;
            lazy.modified = false;
        }
        Ok(())
    }

    /// Write to `path` without transform.
    pub fn save_to_csv_file(&mut self, path: &Path, options: SaveOptions) -> MatrixResult<()> {
        self.save_to_csv_file_with(path, options, &Identity)
    }

    /// Write to `path`, applying `predicate` to every cell first.
    ///
    /// A pending lazy load happens before writing. With the out-of-core mode
    /// on, the buffer is released after a successful write.
    pub fn save_to_csv_file_with<P: CellPredicate + ?Sized>(
        &mut self,
        path: &Path,
        options: SaveOptions,
        predicate: &P,
    ) -> MatrixResult<()> {
        self.ensure_loaded()?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| MatrixError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let io_err = |source| MatrixError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = fs::File::create(path).map_err(io_err)?;
        let mut out = BufWriter::new(file);
        csv::write_csv::<T, W, P, _>(
            &mut out,
            self.rows,
            self.cols,
            &self.data,
            options,
            predicate,
        )
        .map_err(io_err)?;
        out.flush().map_err(io_err)?;
        self.release_if_out_of_core();
        Ok(())
    }

    /// Same as [`Matrix::save_to_csv_file_with`] into any writer.
    pub fn save_to_writer<O: Write + ?Sized, P: CellPredicate + ?Sized>(
        &mut self,
        out: &mut O,
        options: SaveOptions,
        predicate: &P,
    ) -> MatrixResult<()> {
        self.ensure_loaded()?;
        csv::write_csv::<T, W, P, O>(out, self.rows, self.cols, &self.data, options, predicate)?;
        self.release_if_out_of_core();
        Ok(())
    }

    fn release_if_out_of_core(&mut self) {
        if out_of_core_enabled() {
            debug!(rows = self.rows, cols = self.cols, "matrix released after save");
            self.clear();
        }
    }

    /// Bytes held by this matrix.
    pub fn memory_usage(&self) -> u64 {
        (std::mem::size_of::<Self>() + self.data.capacity() * std::mem::size_of::<T>()) as u64
    }

    /// Bytes a `rows x cols` matrix will hold.
    pub fn estimate_memory_usage(rows: usize, cols: usize) -> u64 {
        (std::mem::size_of::<Self>() + rows * cols * std::mem::size_of::<T>()) as u64
    }
}

impl<T: Coefficient, W: Coefficient> Index<(usize, usize)> for Matrix<T, W> {
    type Output = T;

    /// `(row, col)` cell; panics when out of bounds.
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(row < self.rows && col < self.cols, "matrix index out of bounds");
        &self.data[col * self.rows + row]
    }
}

impl<T: Coefficient, W: Coefficient> IndexMut<(usize, usize)> for Matrix<T, W> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(row < self.rows && col < self.cols, "matrix index out of bounds");
        self.touch();
        let rows = self.rows;
        &mut self.data[col * rows + row]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_construction() {
        let m: Matrix = Matrix::from_row_major(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(m.column(1), &[2.0, 5.0]);
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn reset_resizes_and_clears() {
        let mut m: Matrix<i32> = Matrix::from_row_major(1, 2, &[7, 8]);
        m.reset(2, 2, true);
        assert_eq!(m.values(), &[0, 0, 0, 0]);
        assert!(!m.empty());

        m.reset(0, 5, true);
        assert!(m.empty());
    }

    #[test]
    fn clear_frees_buffer() {
        let mut m: Matrix = Matrix::with_size(10, 10);
        let before = m.memory_usage();
        m.clear();
        assert!(m.empty());
        assert!(m.memory_usage() < before);
        assert!(before >= Matrix::<f64>::estimate_memory_usage(10, 10));
    }

    #[test]
    fn writer_output_matches_codec() {
        let mut m: Matrix<f64, i32> = Matrix::from_row_major(2, 2, &[1.99, 2.44, -3.999, -1.51]);
        let mut out = Vec::new();
        m.save_to_writer(&mut out, SaveOptions::with_precision(3), &Identity)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\t2\n-3\t-1\n");
    }

    #[test]
    fn deferred_without_path_cannot_mark() {
        let mut m: Matrix = Matrix::new();
        assert!(!m.mark_for_load());
        m.set_lazy(Some(LazySource::fresh()));
        assert!(!m.mark_for_load());
    }

    #[test]
    fn index_mut_marks_modified() {
        let mut m: Matrix = Matrix::with_size(1, 1);
        let mut lazy = LazySource::fresh();
        lazy.modified = false;
        m.set_lazy(Some(lazy));
        m[(0, 0)] = 2.0;
        assert!(m.lazy().is_some_and(|l| l.modified));
    }
}
