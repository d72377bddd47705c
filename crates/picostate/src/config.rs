//! Runtime configuration.

use crate::PicoResult;
use serde::{Deserialize, Serialize};

/// Limits and diagnostics for a [`crate::Runtime`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Deepest nesting of assembly (and `initialize` re-entry) before
    /// `create` fails with `DepthExceeded`. Guards self-referential type
    /// graphs whose defaults never bottom out.
    pub max_depth: usize,
    /// Log the state before and after every transition at `debug` level.
    pub trace_transitions: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            trace_transitions: false,
        }
    }
}

impl RuntimeConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_trace_transitions(mut self, enabled: bool) -> Self {
        self.trace_transitions = enabled;
        self
    }

    /// Parse a JSON document. Missing keys keep their defaults.
    pub fn from_json(source: &str) -> PicoResult<Self> {
        Ok(serde_json::from_str(source)?)
    }
}
