use crate::models::Role;
use serde::{Deserialize, Serialize};

/// How much of the ranked genre list a report keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Top-K genres only
    Listener,
    /// Full ranked list, long tail included
    Artist,
}

impl ReportMode {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Artist => ReportMode::Artist,
            Role::Listener | Role::Admin => ReportMode::Listener,
        }
    }

    /// Maximum number of genres kept, `None` for the whole list
    pub fn limit(self, top_k: usize) -> Option<usize> {
        match self {
            ReportMode::Listener => Some(top_k),
            ReportMode::Artist => None,
        }
    }
}

/// Tunables for report shaping and metric aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub top_k: usize, // genres kept in listener mode
    pub metric_columns: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            metric_columns: [
                "bpm",
                "gain",
                "duration_minutes",
                "danceability",
                "energy",
                "acousticness",
                "instrumentalness",
                "valence",
            ]
            .iter()
            .map(|metric| metric.to_string())
            .collect(),
        }
    }
}

impl ReportConfig {
    /// Load a report configuration from a JSON file; absent keys keep their defaults
    pub fn load_from_file(path: &str) -> Result<ReportConfig, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: ReportConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}
