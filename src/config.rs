//! Options accepted by the backward graph builder.
use crate::error::GraphError;
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Hide split operations and their output values, connecting the split's
    /// input straight to the downstream consumers.
    pub remove_split: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { remove_split: true }
    }
}

impl BuildOptions {
    pub fn keep_splits() -> Self {
        Self { remove_split: false }
    }

    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self, GraphError> {
        serde_json::from_str(s).map_err(|e| GraphError::Config(e.to_string()))
    }
}
