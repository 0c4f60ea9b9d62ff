//! rf-registry: print-info registry and output selection.
//!
//! The registry holds one [`VariableDescriptor`] per printable variable name,
//! in registration order. User selection (a [`SelectionTable`], usually read
//! from an [`OutputSettings`] file) toggles descriptors before
//! [`PrintInfoRegistry::prepare_for_simulation`] freezes the printed-column
//! total.

pub mod collector;
pub mod descriptor;
pub mod registry;
pub mod selection;
pub mod settings;

pub use collector::PrintInfoCollector;
pub use descriptor::VariableDescriptor;
pub use registry::PrintInfoRegistry;
pub use selection::SelectionTable;
pub use settings::{OutputSettings, load_json, load_yaml, save_json, save_yaml};

pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("Variable already registered: {name}")]
    DuplicateName { name: String },

    #[error("Variable not registered: {name}")]
    Unregistered { name: String },

    #[error("Registry cursor is not positioned on a variable")]
    CursorNotPositioned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
