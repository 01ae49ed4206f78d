use std::collections::HashSet;

use indexmap::IndexSet;
use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::{GraphletError, GraphletResult};
use crate::graph::construction::induced_by_ids;
use crate::graph::{Edge, GraphStore, NodeId};

/// Consecutive rejected proposals after which a swap chain gives up.
pub const DEFAULT_MAX_REJECTIONS: usize = 10_000;

/// Result of a swap chain; `applied < requested` means it stalled.
#[derive(Debug, Clone)]
pub struct SwapOutcome {
    pub graph: GraphStore,
    pub requested: usize,
    pub applied: usize,
    pub rejected: usize,
}

impl SwapOutcome {
    pub fn stalled(&self) -> bool {
        self.applied < self.requested
    }

    /// The randomized graph, or `RandomizationStalled` when fewer swaps than
    /// requested were applied.
    pub fn into_complete(self) -> GraphletResult<GraphStore> {
        if self.stalled() {
            return Err(GraphletError::RandomizationStalled {
                applied: self.applied,
                requested: self.requested,
            });
        }
        Ok(self.graph)
    }
}

/// Null-model graph generation: degree- and mode-preserving edge swaps and
/// uniform node sampling. Input graphs are never mutated.
#[derive(Debug, Clone)]
pub struct GraphRandomizer {
    rng: Xoshiro256PlusPlus,
    max_rejections: usize,
}

impl GraphRandomizer {
    /// Seeded from `seed`, or from the clock when `None`.
    pub fn new(seed: Option<u64>) -> Self {
        Self::seeded(seed.unwrap_or_else(random_seed))
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            max_rejections: DEFAULT_MAX_REJECTIONS,
        }
    }

    pub fn with_max_rejections(mut self, max_rejections: usize) -> Self {
        self.max_rejections = max_rejections.max(1);
        self
    }

    /// Run a Markov chain of `steps` accepted double edge swaps.
    ///
    /// Two edges `a -> b` and `c -> d` of the same mode over four distinct
    /// nodes are rewired to either `a -> d, c -> b` or `a -> c, d -> b`; a
    /// proposal that would duplicate an existing edge is rejected without
    /// consuming a step. Node order, mode registry, edge count, total degree
    /// per node and edge count per mode are preserved.
    pub fn double_edge_swap(&mut self, graph: &GraphStore, steps: usize) -> SwapOutcome {
        let mut edges: Vec<Edge> = graph.edges().collect();
        let mut present: HashSet<Edge> = edges.iter().copied().collect();
        let mut applied = 0;
        let mut rejected = 0;
        let mut consecutive = 0;

        if edges.len() < 2 && steps > 0 {
            warn!(
                "double edge swap needs at least two edges, graph has {}",
                edges.len()
            );
            return SwapOutcome {
                graph: graph.clone(),
                requested: steps,
                applied,
                rejected,
            };
        }

        while applied < steps {
            if consecutive >= self.max_rejections {
                warn!(
                    "double edge swap stalled after {} consecutive rejections ({} of {} swaps applied)",
                    consecutive, applied, steps
                );
                break;
            }

            let pick = (
                self.rng.gen_range(0..edges.len()),
                self.rng.gen_range(0..edges.len()),
            );
            let (first, second) = (pick.0.min(pick.1), pick.0.max(pick.1));
            let proposal = if first == second {
                None
            } else {
                self.propose(edges[first], edges[second])
            };
            let Some((left, right)) = proposal.filter(|(left, right)| {
                !present.contains(left) && !present.contains(right)
            }) else {
                rejected += 1;
                consecutive += 1;
                continue;
            };

            present.remove(&edges[first]);
            present.remove(&edges[second]);
            present.insert(left);
            present.insert(right);
            edges[first] = left;
            edges[second] = right;
            applied += 1;
            consecutive = 0;
        }

        debug!(
            "double edge swap: {} applied, {} rejected, {} requested",
            applied, rejected, steps
        );

        let mut randomized = graph.empty_like();
        for edge in edges {
            randomized.insert_edge(edge);
        }
        SwapOutcome {
            graph: randomized,
            requested: steps,
            applied,
            rejected,
        }
    }

    /// Rewired pair for `a -> b`, `c -> d`, or `None` when the pair is not swappable.
    fn propose(&mut self, first: Edge, second: Edge) -> Option<(Edge, Edge)> {
        if first.mode != second.mode {
            return None;
        }
        let (a, b, c, d) = (first.source, first.target, second.source, second.target);
        if !endpoints_distinct([a, b, c, d]) {
            return None;
        }
        let mode = first.mode;
        let rewired = if self.rng.gen_bool(0.5) {
            (
                Edge { source: a, target: c, mode },
                Edge { source: d, target: b, mode },
            )
        } else {
            (
                Edge { source: a, target: d, mode },
                Edge { source: c, target: b, mode },
            )
        };
        Some(rewired)
    }

    /// Induced subgraph on `count` nodes drawn uniformly without replacement.
    ///
    /// Sampled nodes keep their relative order and the parent's mode registry.
    pub fn sample_nodes(&mut self, graph: &GraphStore, count: usize) -> GraphletResult<GraphStore> {
        if count == 0 || count > graph.node_count() {
            return Err(GraphletError::InvalidSampleSize {
                requested: count,
                available: graph.node_count(),
            });
        }
        let mut picked = rand::seq::index::sample(&mut self.rng, graph.node_count(), count).into_vec();
        picked.sort_unstable();
        let retain: IndexSet<NodeId> = picked.into_iter().map(NodeId::new).collect();
        Ok(induced_by_ids(graph, &retain))
    }
}

/// True when the four swap endpoints are pairwise different nodes.
fn endpoints_distinct(mut nodes: [NodeId; 4]) -> bool {
    nodes.sort_unstable();
    nodes.windows(2).all(|pair| pair[0] != pair[1])
}

pub(crate) fn random_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
