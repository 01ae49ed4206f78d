use graphlet_census::enumeration::collect_subsets;
use graphlet_census::verify::{CollisionAudit, are_isomorphic, are_isomorphic_brute_force};
use graphlet_census::{GraphStore, Graphlet, Strategy, count_graphlets, signature};
use proptest::prelude::{Just, ProptestConfig, prop, prop_assert, prop_assert_eq, proptest};
use proptest::strategy::Strategy as _;

type RawEdges = Vec<(usize, usize, usize)>;

const MODES: [&str; 2] = ["activation", "repression"];

fn build(edges: &RawEdges, label: impl Fn(usize) -> String) -> GraphStore {
    let mut graph = GraphStore::new();
    for (src, dst, mode) in edges {
        graph.add_edge(&label(*src), &label(*dst), MODES[*mode]);
    }
    graph
}

fn edges_and_permutation() -> impl proptest::strategy::Strategy<Value = (RawEdges, Vec<usize>)> {
    (
        prop::collection::vec((0..6usize, 0..6usize, 0..2usize), 3..16),
        Just((0..6usize).collect::<Vec<_>>()).prop_shuffle(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn relabelling_preserves_every_signature((edges, permutation) in edges_and_permutation()) {
        let graph = build(&edges, |node| format!("n{node}"));
        // relabelled names and reversed insertion order change node ids and mode registry order
        let reversed: RawEdges = edges.iter().rev().copied().collect();
        let relabelled = build(&reversed, |node| format!("r{}", permutation[node]));

        for k in 1..=3usize.min(graph.node_count()) {
            for subset in collect_subsets(Strategy::IncrementalGrowth, &graph, k).unwrap() {
                let original = Graphlet::new(&graph, subset.iter().copied());
                let mapped: Vec<String> = original
                    .node_names()
                    .iter()
                    .map(|name| {
                        let index: usize = name[1..].parse().unwrap();
                        format!("r{}", permutation[index])
                    })
                    .collect();
                let image = Graphlet::from_names(&relabelled, &mapped).unwrap();
                prop_assert_eq!(signature(&original), signature(&image));
                prop_assert!(are_isomorphic(&original, &image));
            }
        }
    }

    #[test]
    fn vf2_agrees_with_permutation_search(edges in prop::collection::vec((0..6usize, 0..6usize, 0..2usize), 3..16)) {
        let graph = build(&edges, |node| format!("n{node}"));
        if graph.node_count() < 3 {
            return Ok(());
        }
        let subsets = collect_subsets(Strategy::ExhaustiveCombination, &graph, 3).unwrap();
        let graphlets: Vec<Graphlet<'_>> = subsets
            .iter()
            .map(|subset| Graphlet::new(&graph, subset.iter().copied()))
            .collect();
        for (idx, left) in graphlets.iter().enumerate() {
            for right in &graphlets[idx..] {
                let exact = are_isomorphic_brute_force(left, right);
                prop_assert_eq!(exact, are_isomorphic(left, right));
                if exact {
                    prop_assert_eq!(signature(left), signature(right));
                }
            }
        }
    }
}

#[test]
fn motif_catalogue_has_no_triple_collisions() {
    let mut graph = GraphStore::new();
    let motifs: &[&[(&str, &str, &str)]] = &[
        &[("a1", "a2", "activation"), ("a2", "a3", "activation")],
        &[("b1", "b2", "activation"), ("b1", "b3", "activation")],
        &[("c2", "c1", "activation"), ("c3", "c1", "activation")],
        &[("d1", "d2", "activation"), ("d2", "d3", "activation"), ("d1", "d3", "repression")],
        &[("e1", "e2", "repression"), ("e2", "e3", "activation"), ("e1", "e3", "activation")],
        &[("f1", "f2", "activation"), ("f2", "f3", "activation"), ("f3", "f1", "activation")],
        &[("g1", "g2", "activation"), ("g2", "g1", "repression"), ("g2", "g3", "activation")],
        &[("h1", "h2", "activation"), ("h2", "h3", "activation"), ("h3", "h3", "repression")],
    ];
    for motif in motifs {
        for (src, dst, mode) in motif.iter() {
            graph.add_edge(src, dst, mode);
        }
    }

    let map = count_graphlets(&graph, 3, Strategy::IncrementalGrowth).unwrap();
    assert_eq!(map.len(), motifs.len());
    assert!(map.iter().all(|(_, bucket)| bucket.count == 1));

    let report = CollisionAudit::default()
        .run(&graph, 3, Strategy::ExhaustiveCombination)
        .unwrap();
    assert_eq!(report.graphlets, motifs.len() as u64);
    assert!(report.is_clean(), "{report:?}");
}

#[test]
fn audit_flags_known_four_node_collision() {
    let mut graph = GraphStore::new();
    for (src, dst) in [("A", "D"), ("B", "C"), ("B", "D"), ("C", "A")] {
        graph.add_edge(src, dst, "activation");
    }
    for (src, dst) in [("W", "Z"), ("X", "Z"), ("Y", "W"), ("Y", "X")] {
        graph.add_edge(src, dst, "activation");
    }
    let left = Graphlet::from_names(&graph, &["A", "B", "C", "D"]).unwrap();
    let right = Graphlet::from_names(&graph, &["W", "X", "Y", "Z"]).unwrap();
    assert_eq!(signature(&left), signature(&right));
    assert!(!are_isomorphic_brute_force(&left, &right));

    // neither cycle is reachable through name-ordered growth, so audit the full combination space
    let report = CollisionAudit::new(3)
        .run(&graph, 4, Strategy::ExhaustiveCombination)
        .unwrap();
    assert_eq!(report.collisions.len(), 1);
    assert!(report.collision_rate() > 0.0);
}
