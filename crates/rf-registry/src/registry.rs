//! Ordered registry of print descriptors with a find-then-read cursor.

use std::collections::HashMap;

use rf_core::ColumnCount;
use tracing::{debug, info};

use crate::descriptor::VariableDescriptor;
use crate::{RegistryError, RegistryResult};

/// Print descriptors in registration order.
///
/// Reading through the cursor ([`is_printed`](Self::is_printed),
/// [`current_columns_count`](Self::current_columns_count)) is only valid right
/// after a successful [`find`](Self::find); any structural change resets it.
#[derive(Debug, Default, Clone)]
pub struct PrintInfoRegistry {
    entries: Vec<VariableDescriptor>,
    index: HashMap<String, usize>,
    cursor: Option<usize>,
    columns_count: u32,
}

impl PrintInfoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor. Names are unique.
    pub fn add(&mut self, descriptor: VariableDescriptor) -> RegistryResult<()> {
        if self.index.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateName {
                name: descriptor.name,
            });
        }
        self.index
            .insert(descriptor.name.clone(), self.entries.len());
        self.entries.push(descriptor);
        self.cursor = None;
        Ok(())
    }

    /// Remove every descriptor and reset the cached total.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.cursor = None;
        self.columns_count = 0;
    }

    /// Position the cursor on `name`.
    ///
    /// An unknown name leaves the cursor unset and returns false.
    pub fn find(&mut self, name: &str) -> bool {
        self.cursor = self.index.get(name).copied();
        self.cursor.is_some()
    }

    /// Descriptor under the cursor.
    pub fn current(&self) -> RegistryResult<&VariableDescriptor> {
        self.cursor
            .and_then(|i| self.entries.get(i))
            .ok_or(RegistryError::CursorNotPositioned)
    }

    pub fn is_printed(&self) -> RegistryResult<bool> {
        Ok(self.current()?.print_enabled)
    }

    pub fn current_columns_count(&self) -> RegistryResult<ColumnCount> {
        Ok(self.current()?.columns)
    }

    /// Descriptor for `name`, or `Unregistered`.
    pub fn require(&self, name: &str) -> RegistryResult<&VariableDescriptor> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| RegistryError::Unregistered {
                name: name.to_string(),
            })
    }

    /// Toggle one descriptor. Returns false when `name` is not registered.
    pub fn set_print_status(&mut self, name: &str, enabled: bool) -> bool {
        match self.index.get(name) {
            Some(&i) => {
                self.entries[i].print_enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn set_all_print_status(&mut self, enabled: bool) {
        for entry in &mut self.entries {
            entry.print_enabled = enabled;
        }
    }

    /// Freeze the selection before a run.
    ///
    /// Without user selection every descriptor is printed. The printed-column
    /// total is recomputed in both cases.
    pub fn prepare_for_simulation(&mut self, user_selection: bool) {
        if !user_selection {
            self.set_all_print_status(true);
        }
        self.columns_count = self
            .entries
            .iter()
            .map(VariableDescriptor::printed_columns)
            .sum();

        let printed = self.entries.iter().filter(|e| e.print_enabled).count();
        debug!(user_selection, printed, "print selection applied");
        info!(
            variables = self.entries.len(),
            printed,
            columns = self.columns_count,
            "output registry prepared"
        );
    }

    /// Printed-column total as of the last preparation.
    pub fn columns_count(&self) -> u32 {
        self.columns_count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableDescriptor> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&VariableDescriptor> {
        self.entries.get(index)
    }

    pub(crate) fn get_by_name_mut(&mut self, name: &str) -> Option<&mut VariableDescriptor> {
        let i = *self.index.get(name)?;
        self.entries.get_mut(i)
    }

    pub fn last(&self) -> Option<&VariableDescriptor> {
        self.entries.last()
    }
}
