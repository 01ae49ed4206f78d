use thiserror::Error;

pub type GraphletResult<T> = std::result::Result<T, GraphletError>;

/// Failures surfaced by the counting core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphletError {
    #[error("Node '{0}' not found in graph")]
    NodeNotFound(String),

    #[error("Invalid graphlet size {size}: must be between 1 and the node count {node_count}")]
    InvalidGraphletSize { size: usize, node_count: usize },

    #[error("Invalid sample size {requested}: graph has {available} nodes")]
    InvalidSampleSize { requested: usize, available: usize },

    #[error("Randomization stalled after {applied} of {requested} swaps")]
    RandomizationStalled { applied: usize, requested: usize },

    #[error("Unknown enumeration strategy '{0}'")]
    UnknownStrategy(String),
}
