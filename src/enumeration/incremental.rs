use indexmap::IndexSet;

use crate::enumeration::{Strategy, SubsetEnumerator, SubsetSink};
use crate::graph::{GraphStore, NodeId};

/// Size-ladder growth with a canonical extension rule.
///
/// A group only grows by a neighbour whose name sorts strictly after the
/// group's largest member, so every emitted subset is produced through one
/// ordering at most and the output is a set. Groups are grown depth-first from
/// each singleton, which makes the singleton the seed of its partition.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncrementalGrowth;

impl SubsetEnumerator for IncrementalGrowth {
    fn strategy(&self) -> Strategy {
        Strategy::IncrementalGrowth
    }

    fn seeds(&self, graph: &GraphStore) -> Vec<NodeId> {
        let mut seeds: Vec<NodeId> = graph.node_ids().collect();
        seeds.sort_by(|a, b| graph.node_name(*a).cmp(graph.node_name(*b)));
        seeds
    }

    fn enumerate_seed(&self, graph: &GraphStore, k: usize, seed: NodeId, sink: &mut SubsetSink<'_>) {
        let mut group = vec![seed];
        grow(graph, k, &mut group, sink);
    }
}

fn grow(graph: &GraphStore, k: usize, group: &mut Vec<NodeId>, sink: &mut SubsetSink<'_>) {
    if group.len() == k {
        let mut subset = group.clone();
        subset.sort_unstable();
        sink(&subset);
        return;
    }
    let Some(&last) = group.last() else {
        return;
    };
    let floor = graph.node_name(last);

    // neighbours reachable from several members are attached once
    let mut attached: IndexSet<NodeId> = IndexSet::new();
    for member_idx in 0..group.len() {
        let member = group[member_idx];
        for &neighbor in graph.undirected_neighbors(member) {
            if group.contains(&neighbor) || attached.contains(&neighbor) {
                continue;
            }
            if graph.node_name(neighbor) <= floor {
                continue;
            }
            attached.insert(neighbor);
            group.push(neighbor);
            grow(graph, k, group, sink);
            group.pop();
        }
    }
}
