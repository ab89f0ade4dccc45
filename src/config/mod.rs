use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Parser settings.
///
/// Nesting is only bounded by the call stack unless `max_depth` is set.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of nested `not`, parentheses and scope brackets.
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl ParseOptions {
    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(text).context("Config: Failed to read parse options")
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}
