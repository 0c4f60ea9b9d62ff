//! Tab-separated text codec.
//!
//! Output format:
//! - optional header line `size:<rows>x<cols>`
//! - one line per row, cells separated by `\t`, every line ends with `\n`
//! - whole values are written without a decimal point, other values with
//!   exactly `precision` decimals
//! - nothing at all when every written value is zero and no header is asked

use std::io::Write;
use std::path::Path;

use rf_core::is_whole;

use crate::coefficient::Coefficient;
use crate::predicate::CellPredicate;
use crate::{MatrixError, MatrixResult};

const SIZE_PREFIX: &str = "size:";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Decimals written for values with a fractional part.
    pub precision: usize,
    /// Write the `size:RxC` header line.
    pub print_dimensions: bool,
}

impl SaveOptions {
    pub fn with_precision(precision: usize) -> Self {
        Self {
            precision,
            print_dimensions: false,
        }
    }
}

/// Write a column-major `rows x cols` buffer.
///
/// Every cell goes through `predicate`, is coerced to `W` and then formatted.
pub fn write_csv<T, W, P, O>(
    out: &mut O,
    rows: usize,
    cols: usize,
    data: &[T],
    options: SaveOptions,
    predicate: &P,
) -> std::io::Result<()>
where
    T: Coefficient,
    W: Coefficient,
    P: CellPredicate + ?Sized,
    O: Write + ?Sized,
{
    // Two passes over `data`; no coerced copy of the buffer is kept.
    let coerced = |cell: &T| W::from_f64(predicate.apply(cell.to_f64())).to_f64();

    if !options.print_dimensions && data.iter().all(|cell| coerced(cell) == 0.0) {
        return Ok(());
    }

    if options.print_dimensions {
        writeln!(out, "{SIZE_PREFIX}{rows}x{cols}")?;
    }

    let mut line = String::new();
    for row in 0..rows {
        line.clear();
        for col in 0..cols {
            if col > 0 {
                line.push('\t');
            }
            format_cell(&mut line, coerced(&data[col * rows + row]), options.precision);
        }
        line.push('\n');
        out.write_all(line.as_bytes())?;
    }
    Ok(())
}

/// Append one formatted cell to `buf`.
pub fn format_cell(buf: &mut String, value: f64, precision: usize) {
    if value == 0.0 {
        buf.push('0');
    } else if is_whole(value) {
        buf.push_str(&format!("{value:.0}"));
    } else {
        buf.push_str(&format!("{value:.precision$}"));
    }
}

/// Cells parsed from text, column-major.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedGrid<W> {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<W>,
}

/// Parse the text produced by [`write_csv`].
///
/// An empty text is an all-zero `expected_rows x expected_cols` grid. With a
/// header, the declared size must be fully present; without one, the size
/// comes from the content and every row must be as wide as the first.
pub fn parse_csv<W: Coefficient>(
    text: &str,
    path: &Path,
    expected_rows: usize,
    expected_cols: usize,
) -> MatrixResult<ParsedGrid<W>> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty()).peekable();

    let Some(first) = lines.peek().copied() else {
        return Ok(ParsedGrid {
            rows: expected_rows,
            cols: expected_cols,
            data: vec![W::default(); expected_rows * expected_cols],
        });
    };

    let declared = match first.strip_prefix(SIZE_PREFIX) {
        Some(dims) => {
            lines.next();
            Some(parse_dimensions(dims).ok_or_else(|| MatrixError::MalformedDimensions {
                path: path.to_path_buf(),
                header: first.to_string(),
            })?)
        }
        None => None,
    };

    let mut table: Vec<Vec<W>> = Vec::new();
    for (row, line) in lines.enumerate() {
        let mut cells = Vec::new();
        for (col, text) in line.split('\t').enumerate() {
            let text = text.trim();
            let value = W::parse_cell(text).ok_or_else(|| MatrixError::InvalidCell {
                path: path.to_path_buf(),
                row,
                col,
                text: text.to_string(),
            })?;
            cells.push(value);
        }
        table.push(cells);
    }

    let (rows, cols) = match declared {
        Some(dims) => dims,
        None => (table.len(), table.first().map_or(0, Vec::len)),
    };

    // Rows of a zero-width grid are blank lines, which carry no cells.
    let min_rows = match declared {
        Some((_, 0)) => 0,
        Some(_) => rows,
        None => rows.max(expected_rows),
    };
    if table.len() < min_rows {
        return Err(MatrixError::Truncated {
            path: path.to_path_buf(),
            what: "rows",
            expected: min_rows,
            found: table.len(),
        });
    }
    if let Some(short) = table.iter().take(rows).find(|cells| cells.len() < cols) {
        return Err(MatrixError::Truncated {
            path: path.to_path_buf(),
            what: "cells in a row",
            expected: cols,
            found: short.len(),
        });
    }

    let mut data = vec![W::default(); rows * cols];
    for (row, cells) in table.iter().take(rows).enumerate() {
        for (col, value) in cells.iter().take(cols).enumerate() {
            data[col * rows + row] = *value;
        }
    }
    Ok(ParsedGrid { rows, cols, data })
}

fn parse_dimensions(dims: &str) -> Option<(usize, usize)> {
    let (rows, cols) = dims.trim().split_once('x')?;
    Some((rows.parse().ok()?, cols.parse().ok()?))
}
