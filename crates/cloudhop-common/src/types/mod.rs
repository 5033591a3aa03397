//! Common types used across cloudhop

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Semantic role of a destination container, inferred from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerRole {
    Dataset,
    Model,
}

impl ContainerRole {
    pub const ALL: [ContainerRole; 2] = [ContainerRole::Dataset, ContainerRole::Model];

    /// Lowercase token searched for in container names
    pub fn token(self) -> &'static str {
        match self {
            ContainerRole::Dataset => "dataset",
            ContainerRole::Model => "model",
        }
    }

    /// Case-insensitive substring match of the role token against a name
    pub fn matches(self, container_name: &str) -> bool {
        container_name.to_lowercase().contains(self.token())
    }

    /// Environment variable that configures this role explicitly
    pub fn env_var(self) -> &'static str {
        match self {
            ContainerRole::Dataset => "CLOUDHOP_DATASET_BUCKET",
            ContainerRole::Model => "CLOUDHOP_MODEL_BUCKET",
        }
    }
}

impl std::fmt::Display for ContainerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl std::str::FromStr for ContainerRole {
    type Err = crate::MigrateError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dataset" | "datasets" => Ok(ContainerRole::Dataset),
            "model" | "models" => Ok(ContainerRole::Model),
            other => Err(crate::MigrateError::Config(format!(
                "Invalid container role: {} (expected 'dataset' or 'model')",
                other
            ))),
        }
    }
}

/// One object returned by a destination listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

impl ObjectSummary {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified: None,
        }
    }
}

/// Immediate entry of the staging directory, shown after a fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedEntry {
    pub name: String,
    pub size: u64,
    pub is_dir: bool,
}
