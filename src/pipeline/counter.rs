use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::aggregate::GraphletBucketMap;
use crate::enumeration::{Strategy, validate_size};
use crate::error::GraphletResult;
use crate::graph::{GraphStore, NodeId};
use crate::pipeline::observer::{NoopObserver, PipelineObserver};

#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub strategy: Strategy,
    pub graphlet_size: usize,
    /// Subsets reported by the strategy, duplicates included.
    pub candidates: u64,
    pub buckets: usize,
    pub elapsed: Duration,
}

/// Enumeration + signature bucketing for one strategy.
#[derive(Clone)]
pub struct GraphletCounter {
    strategy: Strategy,
    observer: Arc<dyn PipelineObserver>,
}

impl GraphletCounter {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn count(&self, graph: &GraphStore, k: usize) -> GraphletResult<GraphletBucketMap> {
        self.count_with_stats(graph, k).map(|(map, _)| map)
    }

    pub fn count_with_stats(
        &self,
        graph: &GraphStore,
        k: usize,
    ) -> GraphletResult<(GraphletBucketMap, RunStats)> {
        validate_size(graph, k)?;
        let seeds = self.strategy.enumerator().seeds(graph);
        Ok(self.run(graph, k, &seeds, false))
    }

    /// Count only the partitions owned by `seeds`.
    ///
    /// Partitions of disjoint seed lists never overlap, so a run can be split
    /// or resumed and the partial maps merged afterwards.
    pub fn count_seeds(
        &self,
        graph: &GraphStore,
        k: usize,
        seeds: &[NodeId],
    ) -> GraphletResult<GraphletBucketMap> {
        validate_size(graph, k)?;
        Ok(self.run(graph, k, seeds, false).0)
    }

    /// Spread seeds over the rayon pool; yields the same map as [`Self::count`].
    pub fn count_parallel(&self, graph: &GraphStore, k: usize) -> GraphletResult<GraphletBucketMap> {
        self.count_parallel_with_stats(graph, k).map(|(map, _)| map)
    }

    pub fn count_parallel_with_stats(
        &self,
        graph: &GraphStore,
        k: usize,
    ) -> GraphletResult<(GraphletBucketMap, RunStats)> {
        validate_size(graph, k)?;
        let seeds = self.strategy.enumerator().seeds(graph);
        Ok(self.run(graph, k, &seeds, true))
    }

    fn run(
        &self,
        graph: &GraphStore,
        k: usize,
        seeds: &[NodeId],
        parallel: bool,
    ) -> (GraphletBucketMap, RunStats) {
        self.observer.on_run_start(self.strategy, k, graph);
        let start = Instant::now();
        let enumerator = self.strategy.enumerator();

        let accumulator = if parallel {
            seeds
                .par_iter()
                .fold(CountAccumulator::default, |mut acc, seed| {
                    let mut sink = |subset: &[NodeId]| acc.consume(graph, subset);
                    enumerator.enumerate_seed(graph, k, *seed, &mut sink);
                    acc
                })
                .reduce(CountAccumulator::default, CountAccumulator::combine)
        } else {
            let mut acc = CountAccumulator::default();
            let mut sink = |subset: &[NodeId]| acc.consume(graph, subset);
            for seed in seeds {
                enumerator.enumerate_seed(graph, k, *seed, &mut sink);
            }
            acc
        };

        let stats = RunStats {
            strategy: self.strategy,
            graphlet_size: k,
            candidates: accumulator.candidates,
            buckets: accumulator.buckets.len(),
            elapsed: start.elapsed(),
        };
        self.observer.on_run_complete(&stats);
        (accumulator.buckets, stats)
    }
}

#[derive(Default)]
struct CountAccumulator {
    buckets: GraphletBucketMap,
    candidates: u64,
}

impl CountAccumulator {
    fn consume(&mut self, graph: &GraphStore, subset: &[NodeId]) {
        self.candidates += 1;
        self.buckets.record_subset(graph, subset);
    }

    fn combine(mut self, other: Self) -> Self {
        self.buckets.merge(other.buckets);
        self.candidates += other.candidates;
        self
    }
}

/// Enumerate with `strategy` and bucket every subset by signature.
pub fn count_graphlets(
    graph: &GraphStore,
    k: usize,
    strategy: Strategy,
) -> GraphletResult<GraphletBucketMap> {
    GraphletCounter::new(strategy).count(graph, k)
}

pub fn count_graphlets_parallel(
    graph: &GraphStore,
    k: usize,
    strategy: Strategy,
) -> GraphletResult<GraphletBucketMap> {
    GraphletCounter::new(strategy).count_parallel(graph, k)
}
