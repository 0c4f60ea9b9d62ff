//! Persisted user selection of printed variables.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::registry::PrintInfoRegistry;

/// Name → enabled table applied to a registry before a run.
///
/// With `reset_to_all`, every variable is printed except those in `deselect`.
/// Otherwise only the names in `select` are printed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionTable {
    pub reset_to_all: bool,
    pub select: BTreeSet<String>,
    pub deselect: BTreeSet<String>,
}

impl Default for SelectionTable {
    fn default() -> Self {
        Self::all()
    }
}

impl SelectionTable {
    /// Everything printed.
    pub fn all() -> Self {
        Self {
            reset_to_all: true,
            select: BTreeSet::new(),
            deselect: BTreeSet::new(),
        }
    }

    /// Only `names` printed.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reset_to_all: false,
            select: names.into_iter().map(Into::into).collect(),
            deselect: BTreeSet::new(),
        }
    }

    pub fn is_selected(&self, name: &str) -> bool {
        if self.reset_to_all {
            !self.deselect.contains(name)
        } else {
            self.select.contains(name)
        }
    }

    /// Set the print flag of every registered descriptor.
    ///
    /// Returns the names of the table that are not registered.
    pub fn apply(&self, registry: &mut PrintInfoRegistry) -> Vec<String> {
        let names: Vec<String> = registry.iter().map(|d| d.name.clone()).collect();
        for name in &names {
            registry.set_print_status(name, self.is_selected(name));
        }

        let listed = if self.reset_to_all {
            &self.deselect
        } else {
            &self.select
        };
        let unknown: Vec<String> = listed
            .iter()
            .filter(|name| registry.require(name).is_err())
            .cloned()
            .collect();
        for name in &unknown {
            warn!(name = %name, "selection names an unknown variable");
        }
        unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VariableDescriptor;
    use rf_core::{ColumnCount, DataLevel, FileLevel};

    fn registry() -> PrintInfoRegistry {
        let mut r = PrintInfoRegistry::new();
        for name in ["OV. COST", "LOAD", "FLOW LIN."] {
            r.add(VariableDescriptor::new(
                name,
                ColumnCount::Fixed(4),
                DataLevel::AREA,
                FileLevel::VALUES,
            ))
            .unwrap();
        }
        r
    }

    #[test]
    fn reset_to_all_with_exclusions() {
        let mut r = registry();
        let mut table = SelectionTable::all();
        table.deselect.insert("LOAD".into());
        assert!(table.apply(&mut r).is_empty());
        assert!(r.require("OV. COST").unwrap().print_enabled);
        assert!(!r.require("LOAD").unwrap().print_enabled);
    }

    #[test]
    fn explicit_selection_reports_unknown_names() {
        let mut r = registry();
        let table = SelectionTable::only(["FLOW LIN.", "GHOST"]);
        let unknown = table.apply(&mut r);
        assert_eq!(unknown, vec!["GHOST".to_string()]);
        assert!(r.require("FLOW LIN.").unwrap().print_enabled);
        assert!(!r.require("LOAD").unwrap().print_enabled);
    }
}
