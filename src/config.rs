use serde::Deserialize;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::loader::parser::parse_json_file;

/// Identifier of the node both agents start from when the input does not name one.
pub const DEFAULT_ENTRY: &str = "AA";

/// Ticks available to a lone agent.
pub const DEFAULT_SINGLE_AGENT_BUDGET: u32 = 30;

/// Ticks available to two cooperating agents. Shorter than the single-agent
/// budget to account for the time spent setting up the second agent.
pub const DEFAULT_DUAL_AGENT_BUDGET: u32 = 26;

/// Which optimizers a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Single,
    Dual,
    #[default]
    Both,
}

impl SearchMode {
    pub fn runs_single(&self) -> bool {
        matches!(self, SearchMode::Single | SearchMode::Both)
    }

    pub fn runs_dual(&self) -> bool {
        matches!(self, SearchMode::Dual | SearchMode::Both)
    }
}

impl FromStr for SearchMode {
    type Err = Error;

    fn from_str(mode: &str) -> Result<SearchMode> {
        match mode.to_ascii_lowercase().as_str() {
            "single" => Ok(SearchMode::Single),
            "dual" => Ok(SearchMode::Dual),
            "both" => Ok(SearchMode::Both),
            _ => Err(Error::InvalidConfig(format!("unknown search mode '{}'", mode))),
        }
    }
}

/// Settings for one planning run.
///
/// Every field has a default, so a configuration file only needs to name the
/// values it changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerConfig {
    pub entry: String,
    pub single_agent_budget: u32,
    pub dual_agent_budget: u32,
    pub worker_count: usize,
    pub mode: SearchMode,
    pub pruning: bool,
    pub log_level: String,
    pub log_dir: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            entry: DEFAULT_ENTRY.to_string(),
            single_agent_budget: DEFAULT_SINGLE_AGENT_BUDGET,
            dual_agent_budget: DEFAULT_DUAL_AGENT_BUDGET,
            worker_count: default_worker_count(),
            mode: SearchMode::default(),
            pruning: true,
            log_level: "info".to_string(),
            log_dir: "logs".to_string(),
        }
    }
}

impl PlannerConfig {
    /// Reads a configuration file. Missing fields keep their defaults.
    pub fn from_file(file_path: &str) -> Result<Self> {
        let config: PlannerConfig = parse_json_file(file_path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.entry.trim().is_empty() {
            return Err(Error::InvalidConfig("entry id must not be empty".to_string()));
        }
        if self.worker_count == 0 {
            return Err(Error::InvalidConfig("worker count must be positive".to_string()));
        }
        if self.mode.runs_single() && self.single_agent_budget == 0 {
            return Err(Error::InvalidConfig("single-agent budget must be positive".to_string()));
        }
        if self.mode.runs_dual() && self.dual_agent_budget == 0 {
            return Err(Error::InvalidConfig("dual-agent budget must be positive".to_string()));
        }
        Ok(())
    }
}

/// Number of hardware threads, or 1 if it cannot be determined.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}
