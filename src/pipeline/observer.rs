use log::{debug, info, warn};

use crate::enumeration::Strategy;
use crate::graph::GraphStore;
use crate::pipeline::counter::RunStats;
use crate::randomize::SwapOutcome;

/// Hooks the counting pipeline reports progress through. Every method has a
/// no-op default.
pub trait PipelineObserver: Send + Sync {
    fn on_run_start(&self, _strategy: Strategy, _graphlet_size: usize, _graph: &GraphStore) {}

    fn on_run_complete(&self, _stats: &RunStats) {}

    /// A Markov chain of the ensemble finished randomizing its graph.
    fn on_randomized(&self, _chain: usize, _outcome: &SwapOutcome) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Forwards pipeline events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn on_run_start(&self, strategy: Strategy, graphlet_size: usize, graph: &GraphStore) {
        debug!(
            "Counting graphlets of size {} with {} on {} nodes / {} edges",
            graphlet_size,
            strategy,
            graph.node_count(),
            graph.edge_count()
        );
    }

    fn on_run_complete(&self, stats: &RunStats) {
        info!(
            "{} (k={}): {} candidates in {} classes, {:.2?}",
            stats.strategy, stats.graphlet_size, stats.candidates, stats.buckets, stats.elapsed
        );
    }

    fn on_randomized(&self, chain: usize, outcome: &SwapOutcome) {
        if outcome.stalled() {
            warn!(
                "Markov graph {} stalled: {} of {} swaps applied",
                chain + 1,
                outcome.applied,
                outcome.requested
            );
        } else {
            debug!(
                "Markov graph {}: {} swaps applied, {} proposals rejected",
                chain + 1,
                outcome.applied,
                outcome.rejected
            );
        }
    }
}
