//! Connected node-subset enumeration.
//!
//! Three interchangeable strategies share one contract: given a store and a
//! size k, report node subsets of exactly k nodes that are connected under the
//! undirected view. Each strategy splits its output into per-seed partitions,
//! which makes a run restartable from any seed and lets callers spread seeds
//! over worker threads.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer};

use crate::error::{GraphletError, GraphletResult};
use crate::graph::{GraphStore, NodeId};

pub mod exhaustive;
pub mod incremental;
pub mod path_growth;

pub use exhaustive::ExhaustiveCombination;
pub use incremental::IncrementalGrowth;
pub use path_growth::PathGrowth;

/// Receives each candidate subset, sorted by node id.
pub type SubsetSink<'a> = dyn FnMut(&[NodeId]) + 'a;

pub trait SubsetEnumerator: Send + Sync {
    fn strategy(&self) -> Strategy;

    /// Seeds whose partitions together form the full output, in run order.
    fn seeds(&self, graph: &GraphStore) -> Vec<NodeId> {
        graph.node_ids().collect()
    }

    /// Emit the partition owned by `seed`. `k` must already be validated.
    fn enumerate_seed(&self, graph: &GraphStore, k: usize, seed: NodeId, sink: &mut SubsetSink<'_>);

    fn enumerate(&self, graph: &GraphStore, k: usize, sink: &mut SubsetSink<'_>) -> GraphletResult<()> {
        validate_size(graph, k)?;
        for seed in self.seeds(graph) {
            self.enumerate_seed(graph, k, seed, sink);
        }
        Ok(())
    }
}

/// Reject sizes outside `1..=node_count` before any work starts.
pub fn validate_size(graph: &GraphStore, k: usize) -> GraphletResult<()> {
    if k == 0 || k > graph.node_count() {
        return Err(GraphletError::InvalidGraphletSize {
            size: k,
            node_count: graph.node_count(),
        });
    }
    Ok(())
}

/// Collect every emitted subset; convenient for tests and small graphs.
pub fn collect_subsets(
    strategy: Strategy,
    graph: &GraphStore,
    k: usize,
) -> GraphletResult<Vec<Vec<NodeId>>> {
    let mut subsets = Vec::new();
    strategy
        .enumerator()
        .enumerate(graph, k, &mut |subset: &[NodeId]| subsets.push(subset.to_vec()))?;
    Ok(subsets)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    ExhaustiveCombination,
    PathGrowth,
    IncrementalGrowth,
}

static EXHAUSTIVE: ExhaustiveCombination = ExhaustiveCombination;
static PATH_GROWTH: PathGrowth = PathGrowth;
static INCREMENTAL: IncrementalGrowth = IncrementalGrowth;

/// Name -> strategy table; keys are lower-case, lookups are case-insensitive.
static REGISTRY: Lazy<IndexMap<String, Strategy>> = Lazy::new(|| {
    const TABLE: &[(&str, Strategy)] = &[
        ("exhaustive", Strategy::ExhaustiveCombination),
        ("exhaustive_combination", Strategy::ExhaustiveCombination),
        ("brute_force", Strategy::ExhaustiveCombination),
        ("bruteforcegraphletcounter", Strategy::ExhaustiveCombination),
        ("path_growth", Strategy::PathGrowth),
        ("bfs", Strategy::PathGrowth),
        ("bfsgraphletcounter", Strategy::PathGrowth),
        ("incremental", Strategy::IncrementalGrowth),
        ("incremental_growth", Strategy::IncrementalGrowth),
        ("dp", Strategy::IncrementalGrowth),
        ("dpgraphletcounter", Strategy::IncrementalGrowth),
    ];
    TABLE
        .iter()
        .map(|(name, strategy)| (name.to_string(), *strategy))
        .collect()
});

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::ExhaustiveCombination,
        Strategy::PathGrowth,
        Strategy::IncrementalGrowth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::ExhaustiveCombination => "exhaustive",
            Strategy::PathGrowth => "path_growth",
            Strategy::IncrementalGrowth => "incremental",
        }
    }

    pub fn enumerator(self) -> &'static dyn SubsetEnumerator {
        match self {
            Strategy::ExhaustiveCombination => &EXHAUSTIVE,
            Strategy::PathGrowth => &PATH_GROWTH,
            Strategy::IncrementalGrowth => &INCREMENTAL,
        }
    }

    /// Every registered name, aliases included.
    pub fn registered_names() -> impl Iterator<Item = &'static str> {
        REGISTRY.keys().map(String::as_str)
    }

    /// Whether each connected subset is emitted at most once.
    pub fn emits_sets(self) -> bool {
        !matches!(self, Strategy::PathGrowth)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = GraphletError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        REGISTRY
            .get(&name.trim().to_ascii_lowercase())
            .copied()
            .ok_or_else(|| GraphletError::UnknownStrategy(name.to_string()))
    }
}

impl<'de> Deserialize<'de> for Strategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
