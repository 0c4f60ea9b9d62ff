//! Variable enumeration for external tooling.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::PipelineResult;
use crate::card::VariableCard;

/// Receives (caption, unit, description) tuples.
pub trait VariableListSink {
    fn add(&mut self, caption: &str, unit: &str, description: &str);
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableInfo {
    pub caption: String,
    pub unit: String,
    pub description: String,
}

/// Flat variable list, exported as JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableListing {
    pub variables: Vec<VariableInfo>,
}

impl VariableListSink for VariableListing {
    fn add(&mut self, caption: &str, unit: &str, description: &str) {
        self.variables.push(VariableInfo {
            caption: caption.to_string(),
            unit: unit.to_string(),
            description: description.to_string(),
        });
    }
}

impl VariableListing {
    pub fn captions(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|v| v.caption.as_str())
    }

    pub fn to_json(&self) -> PipelineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json(&self, path: &Path) -> PipelineResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> PipelineResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Receives the variable tree of a pipeline.
pub trait InformationSink {
    fn begin_node(&mut self, caption: &str);
    fn add_card(&mut self, card: &VariableCard);
    fn end_node(&mut self);
}

/// Tree built from [`InformationSink`] calls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VariableTree {
    pub caption: String,
    pub cards: Vec<String>,
    pub children: Vec<VariableTree>,
    #[serde(skip)]
    open: Vec<VariableTree>,
}

impl VariableTree {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            ..Self::default()
        }
    }

    fn current(&mut self) -> &mut VariableTree {
        // `open` holds the nodes under construction, innermost last.
        match self.open.len() {
            0 => self,
            n => &mut self.open[n - 1],
        }
    }
}

impl InformationSink for VariableTree {
    fn begin_node(&mut self, caption: &str) {
        self.open.push(VariableTree::new(caption));
    }

    fn add_card(&mut self, card: &VariableCard) {
        self.current().cards.push(card.caption.to_string());
    }

    fn end_node(&mut self) {
        if let Some(node) = self.open.pop() {
            self.current().children.push(node);
        }
    }
}
