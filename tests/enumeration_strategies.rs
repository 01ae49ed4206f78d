use std::collections::HashSet;

use graphlet_census::enumeration::collect_subsets;
use graphlet_census::{
    GraphStore, GraphletBucketMap, GraphletCounter, Graphlet, NodeId, Strategy, count_graphlets,
    count_graphlets_parallel, signature,
};
use proptest::prelude::{ProptestConfig, prop, prop_assert, prop_assume, proptest};
use proptest::strategy::Strategy as _;

fn graph_from(edges: &[(&str, &str, &str)]) -> GraphStore {
    let mut graph = GraphStore::new();
    for (src, dst, mode) in edges {
        graph.add_edge(src, dst, mode);
    }
    graph
}

fn subset_names(graph: &GraphStore, subset: &[NodeId]) -> Vec<String> {
    let mut names: Vec<String> = subset
        .iter()
        .map(|node| graph.node_name(*node).to_string())
        .collect();
    names.sort();
    names
}

fn regulatory_network() -> GraphStore {
    graph_from(&[
        ("lexA", "recA", "repression"),
        ("recA", "lexA", "activation"),
        ("lexA", "umuD", "repression"),
        ("umuD", "umuC", "activation"),
        ("recA", "umuD", "activation"),
        ("crp", "araC", "activation"),
        ("araC", "araB", "activation"),
        ("crp", "araB", "activation"),
        ("araB", "araB", "repression"),
        ("umuC", "crp", "repression"),
        ("fis", "crp", "repression"),
    ])
}

#[test]
fn feed_forward_loop_has_single_triple() {
    let graph = graph_from(&[
        ("A", "B", "activation"),
        ("B", "C", "activation"),
        ("A", "C", "repression"),
    ]);
    let relabelled = graph_from(&[
        ("X", "Y", "activation"),
        ("Y", "Z", "activation"),
        ("X", "Z", "repression"),
    ]);

    for strategy in Strategy::ALL {
        let subsets = collect_subsets(strategy, &graph, 3).unwrap();
        assert_eq!(subsets.len(), 1, "{strategy}");
        assert_eq!(subset_names(&graph, &subsets[0]), vec!["A", "B", "C"]);

        let map = count_graphlets(&graph, 3, strategy).unwrap();
        let copy = count_graphlets(&relabelled, 3, strategy).unwrap();
        let keys: Vec<_> = map.iter().map(|(key, _)| *key).collect();
        let copy_keys: Vec<_> = copy.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, copy_keys, "{strategy}");
    }
}

#[test]
fn disjoint_edges_have_no_triples() {
    let graph = graph_from(&[("A", "B", "activation"), ("C", "D", "activation")]);
    for strategy in Strategy::ALL {
        assert!(collect_subsets(strategy, &graph, 3).unwrap().is_empty(), "{strategy}");
        assert!(count_graphlets(&graph, 3, strategy).unwrap().is_empty());
    }
}

#[test]
fn emitted_subsets_are_connected() {
    let graph = regulatory_network();
    for k in 2..=4 {
        for strategy in [Strategy::PathGrowth, Strategy::IncrementalGrowth] {
            for subset in collect_subsets(strategy, &graph, k).unwrap() {
                let graphlet = Graphlet::new(&graph, subset.iter().copied());
                assert_eq!(graphlet.size(), k);
                assert!(graphlet.is_connected(), "{strategy}: {}", graphlet.snapshot());
            }
        }
    }
}

#[test]
fn triples_agree_with_exhaustive_reference() {
    let graph = regulatory_network();
    let reference: HashSet<Vec<NodeId>> = collect_subsets(Strategy::ExhaustiveCombination, &graph, 3)
        .unwrap()
        .into_iter()
        .collect();
    for strategy in [Strategy::PathGrowth, Strategy::IncrementalGrowth] {
        for subset in collect_subsets(strategy, &graph, 3).unwrap() {
            assert!(
                reference.contains(&subset),
                "{strategy} emitted {:?}",
                subset_names(&graph, &subset)
            );
        }
    }
}

#[test]
fn incremental_seed_partitions_merge_into_full_run() {
    let graph = regulatory_network();
    let counter = GraphletCounter::new(Strategy::IncrementalGrowth);
    let whole = counter.count(&graph, 3).unwrap();

    let seeds = Strategy::IncrementalGrowth.enumerator().seeds(&graph);
    let mut merged = GraphletBucketMap::new();
    for seed in &seeds {
        merged.merge(counter.count_seeds(&graph, 3, std::slice::from_ref(seed)).unwrap());
    }

    assert_eq!(merged.len(), whole.len());
    assert_eq!(merged.total_count(), whole.total_count());
    for (key, bucket) in whole.iter() {
        assert_eq!(merged.get(key).map(|b| b.count), Some(bucket.count));
    }
}

#[test]
fn parallel_counts_match_sequential_counts() {
    let graph = regulatory_network();
    for strategy in Strategy::ALL {
        for k in 1..=3 {
            let sequential = count_graphlets(&graph, k, strategy).unwrap();
            let parallel = count_graphlets_parallel(&graph, k, strategy).unwrap();
            let left: Vec<_> = sequential.into_iter().collect();
            let right: Vec<_> = parallel.into_iter().collect();
            assert_eq!(left, right, "{strategy} k={k}");
        }
    }
}

#[test]
fn bucket_keys_are_signatures_of_representatives() {
    let graph = regulatory_network();
    let map = count_graphlets(&graph, 3, Strategy::ExhaustiveCombination).unwrap();
    for (key, bucket) in map.iter() {
        let names: Vec<&str> = bucket.representative.nodes.iter().map(String::as_str).collect();
        let graphlet = Graphlet::from_names(&graph, &names).unwrap();
        assert_eq!(signature(&graphlet), *key);
    }
}

fn arbitrary_graph() -> impl proptest::strategy::Strategy<Value = GraphStore> {
    prop::collection::vec((0..7usize, 0..7usize, 0..2usize), 3..18).prop_map(|edges| {
        let mut graph = GraphStore::new();
        for (src, dst, mode) in edges {
            let mode = if mode == 0 { "activation" } else { "repression" };
            graph.add_edge(&format!("n{src}"), &format!("n{dst}"), mode);
        }
        graph
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn incremental_growth_never_repeats_a_subset(graph in arbitrary_graph(), k in 2..5usize) {
        prop_assume!(graph.node_count() >= k);
        let subsets = collect_subsets(Strategy::IncrementalGrowth, &graph, k).unwrap();
        let unique: HashSet<Vec<NodeId>> = subsets.iter().cloned().collect();
        prop_assert!(unique.len() == subsets.len());
    }

    #[test]
    fn incremental_triples_are_exhaustive_triples(graph in arbitrary_graph()) {
        prop_assume!(graph.node_count() >= 3);
        let reference: HashSet<Vec<NodeId>> =
            collect_subsets(Strategy::ExhaustiveCombination, &graph, 3).unwrap().into_iter().collect();
        for subset in collect_subsets(Strategy::IncrementalGrowth, &graph, 3).unwrap() {
            prop_assert!(reference.contains(&subset));
        }
    }
}
