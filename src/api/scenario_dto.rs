use serde::Deserialize;

/// JSON form of a planning scenario.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDto {
    /// Overrides the configured entry node when present.
    pub entry: Option<String>,
    pub nodes: Vec<NodeRecordDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecordDto {
    pub id: String,
    pub reward_rate: u64,
    #[serde(default)]
    pub neighbors: Vec<String>,
}

impl NodeRecordDto {
    pub fn new(id: impl Into<String>, reward_rate: u64, neighbors: &[&str]) -> Self {
        Self { id: id.into(), reward_rate, neighbors: neighbors.iter().map(|n| n.to_string()).collect() }
    }
}
