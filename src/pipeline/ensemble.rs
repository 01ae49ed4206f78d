use std::borrow::Cow;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use log::{debug, info};
use rayon::prelude::*;

use crate::aggregate::GraphletBucketMap;
use crate::enumeration::Strategy;
use crate::error::GraphletError;
use crate::graph::{GraphStore, GraphletSnapshot};
use crate::pipeline::counter::GraphletCounter;
use crate::pipeline::observer::{NoopObserver, PipelineObserver};
use crate::randomize::{GraphRandomizer, random_seed};
use crate::signature::CanonicalSignature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkovConfig {
    /// Accepted swaps per generated graph.
    pub steps: usize,
    /// Number of independent chains.
    pub graphs: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingConfig {
    /// Nodes per sample.
    pub size: usize,
    /// Samples drawn from each (randomized) graph.
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsembleConfig {
    pub graphlet_size: usize,
    pub strategy: Strategy,
    pub markov: Option<MarkovConfig>,
    pub sampling: Option<SamplingConfig>,
    pub seed: Option<u64>,
    pub parallel: bool,
}

impl EnsembleConfig {
    /// One run over the unmodified graph.
    pub fn new(graphlet_size: usize, strategy: Strategy) -> Self {
        Self {
            graphlet_size,
            strategy,
            markov: None,
            sampling: None,
            seed: None,
            parallel: true,
        }
    }

    pub fn chains(&self) -> usize {
        self.markov.map_or(1, |markov| markov.graphs)
    }

    pub fn samples_per_chain(&self) -> usize {
        self.sampling.map_or(1, |sampling| sampling.samples)
    }

    pub fn runs(&self) -> usize {
        self.chains() * self.samples_per_chain()
    }

    pub fn validate(&self, graph: &GraphStore) -> Result<()> {
        if self.runs() == 0 {
            bail!("Ensemble needs at least one Markov graph and one sample");
        }
        let available = match self.sampling {
            Some(sampling) => {
                if sampling.size == 0 || sampling.size > graph.node_count() {
                    return Err(GraphletError::InvalidSampleSize {
                        requested: sampling.size,
                        available: graph.node_count(),
                    }
                    .into());
                }
                sampling.size
            }
            None => graph.node_count(),
        };
        if self.graphlet_size == 0 || self.graphlet_size > available {
            return Err(GraphletError::InvalidGraphletSize {
                size: self.graphlet_size,
                node_count: available,
            }
            .into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleEntry {
    pub signature: CanonicalSignature,
    pub representative: GraphletSnapshot,
    /// Summed count over every run.
    pub total: u64,
    /// `total` divided by the number of runs.
    pub mean: f64,
}

#[derive(Debug, Clone)]
pub struct EnsembleSummary {
    pub entries: Vec<EnsembleEntry>,
    pub runs: usize,
    pub stalled_chains: usize,
    pub elapsed: Duration,
}

impl EnsembleSummary {
    /// The `n` classes with the highest mean frequency.
    pub fn top(&self, n: usize) -> &[EnsembleEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn get(&self, signature: &CanonicalSignature) -> Option<&EnsembleEntry> {
        self.entries.iter().find(|entry| entry.signature == *signature)
    }
}

struct ChainResult {
    buckets: GraphletBucketMap,
    runs: usize,
    stalled: bool,
}

/// Averages graphlet counts over Markov-randomized and node-sampled copies of
/// one input graph.
pub struct EnsembleRunner {
    config: EnsembleConfig,
    observer: Arc<dyn PipelineObserver>,
}

impl EnsembleRunner {
    pub fn new(config: EnsembleConfig) -> Self {
        Self {
            config,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    pub fn run(&self, graph: &GraphStore) -> Result<EnsembleSummary> {
        self.config.validate(graph)?;
        let start = Instant::now();
        let base_seed = self.config.seed.unwrap_or_else(random_seed);
        let chains = self.config.chains();
        info!(
            "Running ensemble: {} graph(s) x {} sample(s), k={}, {}",
            chains,
            self.config.samples_per_chain(),
            self.config.graphlet_size,
            self.config.strategy
        );

        let results: Vec<ChainResult> = if self.config.parallel {
            (0..chains)
                .into_par_iter()
                .map(|chain| self.run_chain(graph, chain, base_seed))
                .collect::<Result<_>>()?
        } else {
            (0..chains)
                .map(|chain| self.run_chain(graph, chain, base_seed))
                .collect::<Result<_>>()?
        };

        let mut combined = GraphletBucketMap::new();
        let mut runs = 0;
        let mut stalled_chains = 0;
        for result in results {
            combined.merge(result.buckets);
            runs += result.runs;
            stalled_chains += usize::from(result.stalled);
        }

        let entries = combined
            .into_sorted()
            .into_iter()
            .map(|(signature, bucket)| EnsembleEntry {
                signature,
                representative: bucket.representative,
                total: bucket.count,
                mean: bucket.count as f64 / runs as f64,
            })
            .collect();

        let elapsed = start.elapsed();
        info!(
            "Ensemble finished: {} runs, {} stalled chain(s), {:.2?}",
            runs, stalled_chains, elapsed
        );
        Ok(EnsembleSummary {
            entries,
            runs,
            stalled_chains,
            elapsed,
        })
    }

    fn run_chain(&self, graph: &GraphStore, chain: usize, base_seed: u64) -> Result<ChainResult> {
        let mut randomizer = GraphRandomizer::seeded(base_seed.wrapping_add(chain as u64));
        let counter = GraphletCounter::new(self.config.strategy).with_observer(Arc::clone(&self.observer));
        let k = self.config.graphlet_size;

        let mut stalled = false;
        let derived: Cow<'_, GraphStore> = match self.config.markov {
            Some(markov) => {
                let outcome = randomizer.double_edge_swap(graph, markov.steps);
                self.observer.on_randomized(chain, &outcome);
                stalled = outcome.stalled();
                Cow::Owned(outcome.graph)
            }
            None => Cow::Borrowed(graph),
        };

        let mut buckets = GraphletBucketMap::new();
        let mut runs = 0;
        for sample in 0..self.config.samples_per_chain() {
            let target: Cow<'_, GraphStore> = match self.config.sampling {
                Some(sampling) => Cow::Owned(
                    randomizer
                        .sample_nodes(&derived, sampling.size)
                        .with_context(|| format!("sample {} of graph {}", sample + 1, chain + 1))?,
                ),
                None => Cow::Borrowed(derived.as_ref()),
            };
            let counted = if self.config.parallel {
                counter.count_parallel(&target, k)
            } else {
                counter.count(&target, k)
            }
            .with_context(|| format!("count sample {} of graph {}", sample + 1, chain + 1))?;
            debug!(
                "Graph {} sample {}: {} classes",
                chain + 1,
                sample + 1,
                counted.len()
            );
            buckets.merge(counted);
            runs += 1;
        }

        Ok(ChainResult {
            buckets,
            runs,
            stalled,
        })
    }
}
