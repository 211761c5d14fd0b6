use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse scenario JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Node '{node}' lists neighbor '{neighbor}', which is never defined")]
    MalformedInput { node: String, neighbor: String },

    #[error("Node '{0}' is declared more than once")]
    DuplicateNode(String),

    #[error("Entry node '{0}' is absent from the input")]
    UnreachableEntry(String),

    #[error("Invalid node record on line {line}: {reason}")]
    RecordParse { line: usize, reason: String },

    #[error("Graph has {count} reward-bearing nodes, at most {max} are supported")]
    TooManyRewardNodes { count: usize, max: usize },

    #[error("Node '{0}' is not a reward-bearing node of this graph")]
    UnknownNode(String),

    #[error("Invalid planner configuration: {0}")]
    InvalidConfig(String),

    #[error("Search worker {worker} aborted ({candidates} candidates left, {remaining} ticks remaining)")]
    SearchAborted { worker: String, candidates: usize, remaining: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
