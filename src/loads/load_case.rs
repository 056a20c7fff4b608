//! Load cases

use serde::{Deserialize, Serialize};

use super::NodeLoad;
use crate::error::FEAResult;

/// One set of concentrated loads solved against the shared factorization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    /// Optional label of the load case
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub loads: Vec<NodeLoad>,
}

impl LoadCase {
    /// Create an empty, unnamed load case
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty load case with a label
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            loads: Vec::new(),
        }
    }

    pub fn with_load(mut self, load: NodeLoad) -> Self {
        self.loads.push(load);
        self
    }

    pub fn add_load(&mut self, load: NodeLoad) {
        self.loads.push(load);
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    pub fn validate(&self, num_nodes: usize) -> FEAResult<()> {
        self.loads.iter().try_for_each(|load| load.validate(num_nodes))
    }
}
