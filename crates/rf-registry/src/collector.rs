//! Fills a registry from variable-list enumeration.

use rf_core::{ColumnCount, DataLevel, FileLevel};
use tracing::debug;

use crate::descriptor::VariableDescriptor;
use crate::registry::PrintInfoRegistry;
use crate::{RegistryError, RegistryResult};

/// Sink handed to the pipelines when they list their printable names.
///
/// Several pipelines (areas, sets of areas) may list the same name. A repeated
/// name with the same column shape widens the existing category masks; a
/// different shape is a registration conflict.
#[derive(Debug)]
pub struct PrintInfoCollector<'a> {
    registry: &'a mut PrintInfoRegistry,
}

impl<'a> PrintInfoCollector<'a> {
    pub fn new(registry: &'a mut PrintInfoRegistry) -> Self {
        Self { registry }
    }

    pub fn add(
        &mut self,
        name: &str,
        columns: ColumnCount,
        data_level: DataLevel,
        file_level: FileLevel,
    ) -> RegistryResult<()> {
        if let Some(existing) = self.registry.get_by_name_mut(name) {
            if existing.columns != columns {
                return Err(RegistryError::DuplicateName {
                    name: name.to_string(),
                });
            }
            existing.data_level = existing.data_level | data_level;
            existing.file_level = existing.file_level | file_level;
            debug!(name, "print info merged");
            return Ok(());
        }
        self.registry
            .add(VariableDescriptor::new(name, columns, data_level, file_level))
    }

    pub fn registry(&self) -> &PrintInfoRegistry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_names_merge_levels() {
        let mut registry = PrintInfoRegistry::new();
        let mut c = PrintInfoCollector::new(&mut registry);
        c.add("LOAD", ColumnCount::Fixed(4), DataLevel::AREA, FileLevel::VALUES)
            .unwrap();
        c.add(
            "LOAD",
            ColumnCount::Fixed(4),
            DataLevel::SET_OF_AREAS,
            FileLevel::VALUES,
        )
        .unwrap();

        assert_eq!(registry.len(), 1);
        let load = registry.require("LOAD").unwrap();
        assert!(load.data_level.intersects(DataLevel::AREA));
        assert!(load.data_level.intersects(DataLevel::SET_OF_AREAS));
    }

    #[test]
    fn conflicting_shapes_fail() {
        let mut registry = PrintInfoRegistry::new();
        let mut c = PrintInfoCollector::new(&mut registry);
        c.add("LOAD", ColumnCount::Fixed(4), DataLevel::AREA, FileLevel::VALUES)
            .unwrap();
        let err = c
            .add("LOAD", ColumnCount::Single, DataLevel::AREA, FileLevel::VALUES)
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName { .. }));
    }
}
