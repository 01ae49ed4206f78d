use crate::enumeration::{Strategy, SubsetEnumerator, SubsetSink};
use crate::graph::{GraphStore, NodeId};

/// Every C(n, k) combination in insertion order, kept when it has at least
/// k - 1 internal undirected adjacencies.
///
/// The adjacency count is the acceptance rule, not a full connectivity test:
/// with k >= 4 a subset holding a triangle plus an isolated node passes. Only
/// meant for small graphs and cross-checking the other strategies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveCombination;

impl SubsetEnumerator for ExhaustiveCombination {
    fn strategy(&self) -> Strategy {
        Strategy::ExhaustiveCombination
    }

    /// Combinations whose lowest-index member is `seed`.
    fn enumerate_seed(&self, graph: &GraphStore, k: usize, seed: NodeId, sink: &mut SubsetSink<'_>) {
        let pool: Vec<NodeId> = graph
            .node_ids()
            .filter(|node| node.index() > seed.index())
            .collect();
        let rest = k - 1;
        if pool.len() < rest {
            return;
        }

        let mut picks: Vec<usize> = (0..rest).collect();
        let mut combination = Vec::with_capacity(k);
        loop {
            combination.clear();
            combination.push(seed);
            combination.extend(picks.iter().map(|&idx| pool[idx]));
            if has_spanning_edges(graph, &combination) {
                sink(&combination);
            }

            let Some(pos) = (0..rest)
                .rev()
                .find(|&pos| picks[pos] < pos + pool.len() - rest)
            else {
                return;
            };
            picks[pos] += 1;
            for next in pos + 1..rest {
                picks[next] = picks[next - 1] + 1;
            }
        }
    }
}

fn has_spanning_edges(graph: &GraphStore, combination: &[NodeId]) -> bool {
    let needed = combination.len() - 1;
    if needed == 0 {
        return true;
    }
    let mut found = 0;
    for (i, node) in combination.iter().enumerate() {
        for other in &combination[i + 1..] {
            if graph.are_adjacent(*node, *other) {
                found += 1;
                if found >= needed {
                    return true;
                }
            }
        }
    }
    false
}
