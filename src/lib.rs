pub mod aggregate;
pub mod config;
pub mod enumeration;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod randomize;
pub mod signature;
pub mod verify;

pub use aggregate::{Bucket, GraphletBucketMap};
pub use config::RunConfig;
pub use enumeration::{Strategy, SubsetEnumerator};
pub use error::{GraphletError, GraphletResult};
pub use graph::{EdgeListLoader, GraphStore, Graphlet, GraphletSnapshot, NodeId};
pub use pipeline::{
    EnsembleConfig, EnsembleRunner, EnsembleSummary, GraphletCounter, LogObserver, MarkovConfig,
    PipelineObserver, RunStats, SamplingConfig, count_graphlets, count_graphlets_parallel,
};
pub use randomize::{GraphRandomizer, SwapOutcome};
pub use signature::{CanonicalSignature, signature};
