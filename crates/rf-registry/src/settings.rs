//! Output settings file.

use std::path::Path;

use rf_core::StudyContext;
use rf_matrix::OutOfCoreGuard;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::RegistryResult;
use crate::registry::PrintInfoRegistry;
use crate::selection::SelectionTable;

/// Output options of a study, stored as YAML or JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Release matrices after they are written.
    pub out_of_core: bool,
    pub year_by_year: bool,
    /// Honour `selection`; otherwise every variable is printed.
    pub user_selection: bool,
    pub selection: SelectionTable,
}

impl OutputSettings {
    /// Apply the selection and prepare the registry for a run.
    ///
    /// Returns the selected names that are not registered.
    pub fn apply_to(&self, registry: &mut PrintInfoRegistry) -> Vec<String> {
        let unknown = if self.user_selection {
            self.selection.apply(registry)
        } else {
            Vec::new()
        };
        registry.prepare_for_simulation(self.user_selection);
        unknown
    }

    /// Copy the study-wide output options into `study`.
    pub fn apply_to_study(&self, study: &mut StudyContext) {
        study.year_by_year = self.year_by_year;
    }

    /// Enter the configured out-of-core mode until the guard is dropped.
    pub fn out_of_core_guard(&self) -> OutOfCoreGuard {
        info!(enabled = self.out_of_core, "out-of-core mode");
        OutOfCoreGuard::new(self.out_of_core)
    }
}

pub fn load_yaml(path: &Path) -> RegistryResult<OutputSettings> {
    let content = std::fs::read_to_string(path)?;
    let settings: OutputSettings = serde_yaml::from_str(&content)?;
    info!(path = %path.display(), "output settings loaded");
    Ok(settings)
}

pub fn save_yaml(path: &Path, settings: &OutputSettings) -> RegistryResult<()> {
    let content = serde_yaml::to_string(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> RegistryResult<OutputSettings> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_json(path: &Path, settings: &OutputSettings) -> RegistryResult<()> {
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}
