//! Workflow submission inputs.

use serde::{Deserialize, Serialize};

/// Template parameters, each rendered as `key=value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOptions {
    pub parameters: Vec<String>,
}

impl SubmitOptions {
    pub fn with_parameter(mut self, key: &str, value: &str) -> Self {
        self.parameters.push(format!("{key}={value}"));
        self
    }
}
