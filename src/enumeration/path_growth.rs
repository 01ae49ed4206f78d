use std::collections::{HashMap, VecDeque};

use indexmap::IndexMap;

use crate::enumeration::{Strategy, SubsetEnumerator, SubsetSink};
use crate::graph::{GraphStore, NodeId};

/// Breadth-first path growth followed by pairwise path merging.
///
/// From every start node the BFS records simple paths of up to k nodes,
/// bucketed by length. Two paths merge into a candidate when
/// `len(p) + len(q) - common_prefix(p, q) == k` and their union really holds k
/// nodes; every full-length path is a candidate on its own. The overlap rule
/// looks at the shared *prefix* only, so a subset is reported once per
/// derivation and some subsets may be missed: counts from this strategy are an
/// approximation of true occurrence counts.
///
/// Start nodes are processed in insertion order and are excluded from later
/// searches, so the partition of start `s` treats every node with a smaller id
/// as already processed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathGrowth;

type Path = Vec<NodeId>;

impl SubsetEnumerator for PathGrowth {
    fn strategy(&self) -> Strategy {
        Strategy::PathGrowth
    }

    fn enumerate_seed(&self, graph: &GraphStore, k: usize, seed: NodeId, sink: &mut SubsetSink<'_>) {
        let by_length = path_search(graph, seed, k);
        combine_paths(&by_length, k, sink);
    }
}

/// Simple paths from `start`, keyed by node count, in discovery order.
fn path_search(graph: &GraphStore, start: NodeId, k: usize) -> IndexMap<usize, Vec<Path>> {
    let mut by_length: IndexMap<usize, Vec<Path>> = IndexMap::new();
    by_length.insert(1, vec![vec![start]]);
    let mut distance: HashMap<NodeId, usize> = HashMap::from([(start, 1)]);
    let mut queue: VecDeque<Path> = VecDeque::from([vec![start]]);

    while let Some(path) = queue.pop_front() {
        let Some(&last) = path.last() else {
            continue;
        };
        for &neighbor in graph.undirected_neighbors(last) {
            if neighbor < start {
                continue;
            }
            // equal-length rediscovery is allowed; only longer routes are cut
            let reachable = distance
                .get(&neighbor)
                .is_none_or(|known| *known > path.len());
            if !reachable {
                continue;
            }
            let mut next = path.clone();
            next.push(neighbor);
            distance.insert(neighbor, next.len());
            if next.len() < k {
                queue.push_back(next.clone());
            }
            if next.len() <= k {
                by_length.entry(next.len()).or_default().push(next);
            }
        }
    }

    by_length
}

fn combine_paths(by_length: &IndexMap<usize, Vec<Path>>, k: usize, sink: &mut SubsetSink<'_>) {
    for (&length, paths) in by_length {
        if length == k || length == 1 || paths.is_empty() {
            continue;
        }
        for other_length in length..k {
            let Some(others) = by_length.get(&other_length) else {
                continue;
            };
            if other_length == length {
                for (idx, first) in paths.iter().enumerate() {
                    for second in &paths[idx + 1..] {
                        merge_into(first, second, k, sink);
                    }
                }
            } else {
                for first in paths {
                    for second in others {
                        merge_into(first, second, k, sink);
                    }
                }
            }
        }
    }

    if let Some(full) = by_length.get(&k) {
        for path in full {
            let mut subset = path.clone();
            subset.sort_unstable();
            sink(&subset);
        }
    }
}

fn merge_into(first: &[NodeId], second: &[NodeId], k: usize, sink: &mut SubsetSink<'_>) {
    if merged_length(first, second) != k {
        return;
    }
    let mut union: Vec<NodeId> = first.iter().chain(second).copied().collect();
    union.sort_unstable();
    union.dedup();
    if union.len() == k {
        sink(&union);
    }
}

/// Combined node count assuming the paths only overlap on their common prefix.
fn merged_length(first: &[NodeId], second: &[NodeId]) -> usize {
    let common = first
        .iter()
        .zip(second)
        .take_while(|(a, b)| a == b)
        .count();
    first.len() + second.len() - common
}
