use rf_core::{ColumnCount, DataLevel, FileLevel};
use serde::{Deserialize, Serialize};

/// Print information of one variable name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    pub name: String,
    /// Result columns written for this name.
    pub columns: ColumnCount,
    pub data_level: DataLevel,
    pub file_level: FileLevel,
    pub print_enabled: bool,
}

impl VariableDescriptor {
    /// Descriptor printed by default.
    pub fn new(
        name: impl Into<String>,
        columns: ColumnCount,
        data_level: DataLevel,
        file_level: FileLevel,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            data_level,
            file_level,
            print_enabled: true,
        }
    }

    /// Contribution to the registry's printed-column total.
    ///
    /// Dynamic widths are only known at runtime and count as zero.
    pub fn printed_columns(&self) -> u32 {
        if self.print_enabled {
            self.columns.static_width().unwrap_or(0)
        } else {
            0
        }
    }
}
