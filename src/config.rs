use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    division::Division,
    error::{RecomError, Result},
    partition::{BipartitionParams, default_attempts, default_node_repeats},
};

/// Settings for one recorded ReCom chain.
///
/// Loadable from JSON; every field other than the first four has a default:
///
/// ```json
/// {"pop_column": "TOTPOP", "num_districts": 4, "epsilon": 0.02, "steps": 1000,
///  "divisions": [{"column": "COUNTYFP", "weight": 1}], "first_check_division": true}
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainConfig {
    pub pop_column: String,
    pub num_districts: u32,
    pub epsilon: f64,
    /// Number of states yielded, including the initial plan.
    pub steps: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub divisions: Vec<Division>,
    #[serde(default)]
    pub first_check_division: bool,
    #[serde(default = "default_node_repeats")]
    pub node_repeats: usize,
    #[serde(default = "default_attempts")]
    pub attempts_before_giveup: usize,
    /// Label column whose split count is recorded with every state.
    #[serde(default)]
    pub region_column: Option<String>,
    /// Node attribute keying plan files (e.g. `GEOID20`); the graph's own ids if unset.
    #[serde(default)]
    pub unit_column: Option<String>,
}

impl ChainConfig {
    pub fn new(pop_column: impl Into<String>, num_districts: u32, epsilon: f64, steps: usize) -> Self {
        Self {
            pop_column: pop_column.into(),
            num_districts,
            epsilon,
            steps,
            seed: None,
            divisions: Vec::new(),
            first_check_division: false,
            node_repeats: default_node_repeats(),
            attempts_before_giveup: default_attempts(),
            region_column: None,
            unit_column: None,
        }
    }

    /// Read a config from a JSON file. The result is not validated.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("[config] Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("[config] Failed to parse config JSON from {:?}", path))
    }

    /// Check everything that does not depend on the graph.
    pub fn validate(&self) -> Result<()> {
        if self.num_districts < 2 {
            return Err(RecomError::InvalidConfig(format!("a chain needs at least 2 districts, got {}", self.num_districts)));
        }
        if self.steps == 0 {
            return Err(RecomError::InvalidConfig("steps must be at least 1".into()));
        }
        self.bipartition_params(1.0).validate()
    }

    /// Bipartition parameters balancing against `ideal` population.
    pub fn bipartition_params(&self, ideal: f64) -> BipartitionParams {
        BipartitionParams::new(self.pop_column.clone(), ideal, self.epsilon)
            .with_divisions(self.divisions.iter().cloned())
            .with_first_check_division(self.first_check_division)
            .with_node_repeats(self.node_repeats)
            .with_attempts_before_giveup(self.attempts_before_giveup)
    }
}
