use std::cmp::Reverse;
use std::collections::BinaryHeap;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::graph::{GraphStore, Graphlet, GraphletSnapshot, NodeId};
use crate::signature::{CanonicalSignature, signature};

/// One isomorphism class: the first graphlet seen with this signature and how
/// many times the class was reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub representative: GraphletSnapshot,
    pub count: u64,
}

/// Signature -> (representative, count), iterated in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct GraphletBucketMap {
    buckets: IndexMap<CanonicalSignature, Bucket>,
}

impl GraphletBucketMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `graphlet` under its signature and return that signature.
    pub fn record(&mut self, graphlet: &Graphlet<'_>) -> CanonicalSignature {
        let key = signature(graphlet);
        match self.buckets.entry(key) {
            Entry::Occupied(mut entry) => entry.get_mut().count += 1,
            Entry::Vacant(entry) => {
                entry.insert(Bucket {
                    representative: graphlet.snapshot(),
                    count: 1,
                });
            }
        }
        key
    }

    pub fn record_subset(&mut self, graph: &GraphStore, subset: &[NodeId]) -> CanonicalSignature {
        self.record(&Graphlet::new(graph, subset.iter().copied()))
    }

    /// Sum counts per signature. Representatives already held by `self` win.
    pub fn merge(&mut self, other: GraphletBucketMap) {
        for (key, bucket) in other.buckets {
            match self.buckets.entry(key) {
                Entry::Occupied(mut entry) => entry.get_mut().count += bucket.count,
                Entry::Vacant(entry) => {
                    entry.insert(bucket);
                }
            }
        }
    }

    /// The `n` most frequent buckets, largest first; equal counts keep
    /// first-seen order.
    pub fn top_n(&self, n: usize) -> Vec<(CanonicalSignature, &Bucket)> {
        if n == 0 {
            return Vec::new();
        }
        // min-heap of the current best n; among equal counts the latest bucket
        // sits at the root and is evicted first
        let mut heap: BinaryHeap<Reverse<(u64, Reverse<usize>)>> = BinaryHeap::with_capacity(n + 1);
        for (idx, bucket) in self.buckets.values().enumerate() {
            heap.push(Reverse((bucket.count, Reverse(idx))));
            if heap.len() > n {
                heap.pop();
            }
        }

        let mut picked: Vec<(u64, Reverse<usize>)> = heap.into_iter().map(|Reverse(item)| item).collect();
        picked.sort_unstable_by(|a, b| b.cmp(a));
        picked
            .into_iter()
            .filter_map(|(_, Reverse(idx))| self.buckets.get_index(idx))
            .map(|(key, bucket)| (*key, bucket))
            .collect()
    }

    pub fn get(&self, key: &CanonicalSignature) -> Option<&Bucket> {
        self.buckets.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalSignature, &Bucket)> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sum of all bucket counts, i.e. the number of reported graphlets.
    pub fn total_count(&self) -> u64 {
        self.buckets.values().map(|bucket| bucket.count).sum()
    }

    /// Every bucket by descending count, ties in first-seen order.
    pub fn into_sorted(self) -> Vec<(CanonicalSignature, Bucket)> {
        let mut buckets: Vec<(CanonicalSignature, Bucket)> = self.buckets.into_iter().collect();
        buckets.sort_by(|a, b| b.1.count.cmp(&a.1.count));
        buckets
    }
}

impl IntoIterator for GraphletBucketMap {
    type Item = (CanonicalSignature, Bucket);
    type IntoIter = indexmap::map::IntoIter<CanonicalSignature, Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> GraphStore {
        let mut graph = GraphStore::new();
        graph.add_edge("A", "B", "activation");
        graph.add_edge("C", "D", "activation");
        graph.add_edge("E", "F", "activation");
        graph.add_edge("G", "H", "repression");
        graph.add_edge("I", "J", "repression");
        graph.add_edge("K", "L", "inhibition");
        graph
    }

    fn record_pairs(map: &mut GraphletBucketMap, graph: &GraphStore, pairs: &[[&str; 2]]) {
        for pair in pairs {
            map.record(&Graphlet::from_names(graph, pair).unwrap());
        }
    }

    #[test]
    fn record_keeps_first_representative() {
        let graph = sample_graph();
        let mut map = GraphletBucketMap::new();
        record_pairs(&mut map, &graph, &[["C", "D"], ["A", "B"], ["G", "H"]]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.total_count(), 3);

        let key = signature(&Graphlet::from_names(&graph, &["E", "F"]).unwrap());
        let bucket = map.get(&key).unwrap();
        assert_eq!(bucket.count, 2);
        assert_eq!(bucket.representative.nodes, vec!["C", "D"]);
    }

    #[test]
    fn top_n_breaks_ties_by_first_seen() {
        let graph = sample_graph();
        let mut map = GraphletBucketMap::new();
        record_pairs(
            &mut map,
            &graph,
            &[["K", "L"], ["G", "H"], ["A", "B"], ["I", "J"], ["C", "D"]],
        );
        // inhibition: 1, repression: 2, activation: 2
        let top = map.top_n(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].1.representative.nodes, vec!["G", "H"]);
        assert_eq!(top[1].1.representative.nodes, vec!["A", "B"]);

        let all = map.top_n(10);
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].1.count, 1);
        assert!(map.top_n(0).is_empty());
    }

    #[test]
    fn merge_sums_counts_and_keeps_left_representative() {
        let graph = sample_graph();
        let mut left = GraphletBucketMap::new();
        record_pairs(&mut left, &graph, &[["A", "B"]]);
        let mut right = GraphletBucketMap::new();
        record_pairs(&mut right, &graph, &[["C", "D"], ["G", "H"]]);

        left.merge(right);
        assert_eq!(left.len(), 2);
        assert_eq!(left.total_count(), 3);
        let sorted = left.into_sorted();
        assert_eq!(sorted[0].1.count, 2);
        assert_eq!(sorted[0].1.representative.nodes, vec!["A", "B"]);
    }
}
