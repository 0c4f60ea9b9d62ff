//! Static description of an output variable.

use std::fmt;

use rf_core::{ColumnCount, DataLevel, FileLevel, Precision};

/// Stable identity of a variable inside a pipeline.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableKey(pub &'static str);

impl VariableKey {
    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for VariableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VariableKey({:?})", self.0)
    }
}

impl fmt::Display for VariableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Cross-entity combination of one variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpatialAggregate {
    Sum,
    Average,
    Min,
    Max,
}

impl SpatialAggregate {
    /// Combine an accumulated value with the value of one more entity.
    pub fn combine(self, acc: f64, value: f64) -> f64 {
        match self {
            Self::Sum | Self::Average => acc + value,
            Self::Min => acc.min(value),
            Self::Max => acc.max(value),
        }
    }

    /// Final value once `count` entities were combined.
    pub fn finish(self, acc: f64, count: usize) -> f64 {
        match self {
            Self::Average if count > 0 => acc / count as f64,
            _ => acc,
        }
    }
}

/// How hourly values are folded into daily/weekly/monthly/annual periods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeAggregate {
    Sum,
    Average,
}

/// Statistics written for every period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultKind {
    /// Expectation, standard deviation, minimum and maximum over years.
    AvgStdMinMax,
    AverageOnly,
}

impl ResultKind {
    pub fn count(self) -> u32 {
        self.captions().len() as u32
    }

    pub fn captions(self) -> &'static [&'static str] {
        match self {
            Self::AvgStdMinMax => &["EXP", "std", "min", "max"],
            Self::AverageOnly => &["EXP"],
        }
    }

    /// Column shape of one registry entry.
    pub fn registry_columns(self) -> ColumnCount {
        match self.count() {
            1 => ColumnCount::Single,
            n => ColumnCount::Fixed(n),
        }
    }
}

/// Static metadata of a variable.
#[derive(Clone, Copy, Debug)]
pub struct VariableCard {
    pub key: VariableKey,
    pub caption: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
    pub columns: ColumnCount,
    /// Per-column names of fixed multi-column variables.
    pub column_captions: &'static [&'static str],
    pub data_level: DataLevel,
    pub file_level: FileLevel,
    pub precision: Precision,
    pub spatial_aggregate: SpatialAggregate,
    pub time_aggregate: TimeAggregate,
    pub results: ResultKind,
    pub decimals: usize,
    pub has_intermediate_values: bool,
    /// Shown as its own node in variable trees.
    pub node_depth_for_gui: bool,
    pub possibly_non_applicable: bool,
}

impl VariableCard {
    /// Base for card literals: one area column, every precision.
    pub const DEFAULT: Self = Self {
        key: VariableKey(""),
        caption: "",
        unit: "",
        description: "",
        columns: ColumnCount::Single,
        column_captions: &[],
        data_level: DataLevel::AREA,
        file_level: FileLevel::VALUES,
        precision: Precision::ALL,
        spatial_aggregate: SpatialAggregate::Sum,
        time_aggregate: TimeAggregate::Sum,
        results: ResultKind::AvgStdMinMax,
        decimals: 0,
        has_intermediate_values: true,
        node_depth_for_gui: false,
        possibly_non_applicable: false,
    };

    /// Name of column `index`, falling back to the caption.
    pub fn column_caption(&self, index: usize) -> &'static str {
        self.column_captions
            .get(index)
            .copied()
            .unwrap_or(self.caption)
    }

    /// Registry names of this variable: one per fixed column, otherwise one.
    pub fn print_names(&self) -> Vec<&'static str> {
        match self.columns {
            ColumnCount::Fixed(n) if n > 1 => {
                (0..n as usize).map(|i| self.column_caption(i)).collect()
            }
            ColumnCount::Fixed(0) => Vec::new(),
            _ => vec![self.caption],
        }
    }
}
