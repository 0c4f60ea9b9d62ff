//! Report targets filled by the pipelines.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use rf_core::{ColumnCount, DataLevel, FileLevel, Precision};
use rf_matrix::csv::format_cell;
use rf_matrix::Matrix;
use tracing::{debug, info};

use crate::PipelineResult;
use crate::variable::PrintFlags;

/// One column of one variable at one precision.
#[derive(Clone, Debug)]
pub struct ReportSection {
    pub variable: &'static str,
    pub column: String,
    pub unit: &'static str,
    pub precision: Precision,
    pub file_level: FileLevel,
    pub result_captions: &'static [&'static str],
    /// `periods x result_captions.len()` values.
    pub values: Matrix<f64>,
    pub decimals: usize,
    pub printed: bool,
    pub non_applicable: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigestLevel {
    /// Expectation only.
    Values,
    /// Every statistic.
    Detailed,
}

/// Annual digest line of one column.
#[derive(Clone, Debug, PartialEq)]
pub struct DigestRow {
    pub entity: String,
    pub data_level: DataLevel,
    pub column: String,
    pub captions: Vec<&'static str>,
    pub values: Vec<f64>,
    pub decimals: usize,
    pub non_applicable: bool,
}

/// Sections and digest rows of one entity.
///
/// A variable attaches its flags with [`attach`](Self::attach) before
/// pushing its columns; pushed columns take the attached flags.
#[derive(Debug)]
pub struct SurveyResults {
    pub entity: String,
    pub data_level: DataLevel,
    flags: PrintFlags,
    sections: Vec<ReportSection>,
    digest: Vec<DigestRow>,
}

impl SurveyResults {
    pub fn new(entity: impl Into<String>, data_level: DataLevel) -> Self {
        Self {
            entity: entity.into(),
            data_level,
            flags: PrintFlags::new(ColumnCount::Single),
            sections: Vec::new(),
            digest: Vec::new(),
        }
    }

    pub fn attach(&mut self, flags: &PrintFlags) {
        self.flags = flags.clone();
    }

    /// Add `section` as result column `column` of the attached variable.
    pub fn push_section(&mut self, column: usize, mut section: ReportSection) {
        section.printed = self.flags.is_printed(column);
        section.non_applicable = self.flags.is_non_applicable(column);
        self.sections.push(section);
    }

    /// Add a digest row; unprinted columns are skipped.
    pub fn push_digest(
        &mut self,
        column: usize,
        data_level: DataLevel,
        label: &str,
        captions: Vec<&'static str>,
        values: Vec<f64>,
        decimals: usize,
    ) {
        if !self.flags.is_printed(column) {
            return;
        }
        self.digest.push(DigestRow {
            entity: self.entity.clone(),
            data_level,
            column: label.to_string(),
            captions,
            values,
            decimals,
            non_applicable: self.flags.is_non_applicable(column),
        });
    }

    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    pub fn digest(&self) -> &[DigestRow] {
        &self.digest
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.digest.is_empty()
    }

    /// Write one file per (file level, precision) into `dir`.
    ///
    /// Unprinted sections are left out. Non-applicable sections keep their
    /// columns, written as zeros and captioned `N/A`.
    pub fn write_to_dir(&mut self, dir: &Path) -> PipelineResult<Vec<PathBuf>> {
        let mut groups: BTreeMap<String, Vec<ReportSection>> = BTreeMap::new();
        for section in self.sections.drain(..).filter(|s| s.printed) {
            let name = format!(
                "{}-{}.txt",
                section.file_level.file_prefix(),
                section.precision.suffix()
            );
            groups.entry(name).or_default().push(section);
        }

        std::fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(groups.len());
        for (name, sections) in groups {
            let path = dir.join(&name);
            write_group(&path, &self.entity, &sections)?;
            debug!(path = %path.display(), sections = sections.len(), "survey file written");
            written.push(path);
        }
        info!(entity = %self.entity, files = written.len(), "survey results exported");
        Ok(written)
    }
}

/// Header lines, then one line per period. Each column keeps the decimals of
/// its own variable; non-applicable columns are written as zeros.
fn write_group(path: &Path, entity: &str, sections: &[ReportSection]) -> PipelineResult<()> {
    let rows = sections.iter().map(|s| s.values.rows()).max().unwrap_or(0);

    let mut names = Vec::new();
    let mut units = Vec::new();
    let mut stats = Vec::new();
    for section in sections {
        for caption in section.result_captions {
            names.push(section.column.as_str());
            units.push(section.unit);
            stats.push(if section.non_applicable { "N/A" } else { *caption });
        }
    }

    let file = std::fs::File::create(path)?;
    let mut out = std::io::BufWriter::new(file);
    writeln!(out, "{entity}")?;
    writeln!(out, "{}", names.join("\t"))?;
    writeln!(out, "{}", units.join("\t"))?;
    writeln!(out, "{}", stats.join("\t"))?;

    let mut line = String::new();
    for row in 0..rows {
        line.clear();
        for section in sections {
            for c in 0..section.result_captions.len() {
                if !line.is_empty() {
                    line.push('\t');
                }
                let value = if section.non_applicable || row >= section.values.rows() {
                    0.0
                } else {
                    section.values[(row, c)]
                };
                format_cell(&mut line, value, section.decimals);
            }
        }
        line.push('\n');
        out.write_all(line.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

/// Write digest rows, one line each: entity, column, then the values.
pub fn write_digest(path: &Path, rows: &[DigestRow]) -> PipelineResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let mut text = String::new();
    for row in rows {
        text.push_str(&row.entity);
        text.push('\t');
        text.push_str(&row.column);
        for value in &row.values {
            text.push('\t');
            if row.non_applicable {
                text.push_str("N/A");
            } else {
                format_cell(&mut text, *value, row.decimals);
            }
        }
        text.push('\n');
    }
    std::fs::write(path, text)?;
    info!(path = %path.display(), rows = rows.len(), "digest written");
    Ok(())
}
