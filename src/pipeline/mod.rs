pub mod counter;
pub mod ensemble;
pub mod observer;

pub use counter::{GraphletCounter, RunStats, count_graphlets, count_graphlets_parallel};
pub use ensemble::{
    EnsembleConfig, EnsembleEntry, EnsembleRunner, EnsembleSummary, MarkovConfig, SamplingConfig,
};
pub use observer::{LogObserver, NoopObserver, PipelineObserver};
