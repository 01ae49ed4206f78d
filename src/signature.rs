use std::fmt;

use crate::graph::{Graphlet, ModeId};

/// Isomorphism-invariant bucket key of a graphlet.
///
/// Equal structures always hash equal; distinct structures are separated as
/// far as the per-node interaction multisets allow.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalSignature([u8; 32]);

impl CanonicalSignature {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|byte| format!("{byte:02x}")).collect()
    }
}

impl fmt::Display for CanonicalSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for CanonicalSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalSignature({})", &self.to_hex()[..16])
    }
}

/// Node-edge-degree signature.
///
/// Every node is described by the sorted list of its per-neighbour
/// in/out-by-mode vectors plus its self-loop counts; the sorted list of node
/// fingerprints is hashed into the final key. Mode columns are the modes that
/// occur inside the graphlet, ordered by name, so the key does not depend on
/// the registry order of the parent store.
pub fn signature(graphlet: &Graphlet<'_>) -> CanonicalSignature {
    let graph = graphlet.graph();
    let nodes = graphlet.nodes();
    let k = nodes.len();

    let mut columns: Vec<ModeId> = graphlet.induced_edges().map(|edge| edge.mode).collect();
    columns.sort_unstable();
    columns.dedup();
    columns.sort_by(|a, b| graph.mode_name(*a).cmp(graph.mode_name(*b)));
    let width = columns.len();
    let column_of = |mode: ModeId| columns.iter().position(|c| *c == mode).unwrap_or(0);

    // interactions[a * k + b]: first `width` entries count b -> a (in), the rest a -> b (out)
    let mut interactions = vec![0u32; k * k * 2 * width];
    let mut loops = vec![0u32; k * width];
    let position = |node| nodes.binary_search(&node).unwrap_or(0);

    for edge in graphlet.induced_edges() {
        let a = position(edge.source);
        let b = position(edge.target);
        let col = column_of(edge.mode);
        if a == b {
            loops[a * width + col] += 1;
            continue;
        }
        interactions[(a * k + b) * 2 * width + width + col] += 1;
        interactions[(b * k + a) * 2 * width + col] += 1;
    }

    let record = |a: usize, b: usize| {
        let start = (a * k + b) * 2 * width;
        &interactions[start..start + 2 * width]
    };

    let mut fingerprints: Vec<[u8; 32]> = (0..k)
        .map(|a| {
            let mut neighbours: Vec<&[u32]> =
                (0..k).filter(|b| *b != a).map(|b| record(a, b)).collect();
            neighbours.sort_unstable();

            let mut hasher = blake3::Hasher::new();
            for row in neighbours {
                for value in row {
                    hasher.update(&value.to_le_bytes());
                }
            }
            for value in &loops[a * width..(a + 1) * width] {
                hasher.update(&value.to_le_bytes());
            }
            *hasher.finalize().as_bytes()
        })
        .collect();
    fingerprints.sort_unstable();

    let mut hasher = blake3::Hasher::new();
    hasher.update(&(k as u64).to_le_bytes());
    hasher.update(&(width as u64).to_le_bytes());
    for mode in &columns {
        let name = graph.mode_name(*mode);
        hasher.update(&(name.len() as u64).to_le_bytes());
        hasher.update(name.as_bytes());
    }
    for fingerprint in &fingerprints {
        hasher.update(fingerprint);
    }
    CanonicalSignature(*hasher.finalize().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphStore;

    fn graph_from(edges: &[(&str, &str, &str)]) -> GraphStore {
        let mut graph = GraphStore::new();
        for (src, dst, mode) in edges {
            graph.add_edge(src, dst, mode);
        }
        graph
    }

    fn signature_of(graph: &GraphStore, names: &[&str]) -> CanonicalSignature {
        signature(&Graphlet::from_names(graph, names).unwrap())
    }

    #[test]
    fn relabelled_copy_has_same_signature() {
        let original = graph_from(&[
            ("A", "B", "activation"),
            ("B", "C", "activation"),
            ("A", "C", "repression"),
        ]);
        // different insertion order flips the registry order of the modes
        let relabelled = graph_from(&[
            ("X", "Z", "repression"),
            ("Y", "Z", "activation"),
            ("X", "Y", "activation"),
        ]);
        assert_eq!(
            signature_of(&original, &["A", "B", "C"]),
            signature_of(&relabelled, &["X", "Y", "Z"])
        );
    }

    #[test]
    fn mode_and_direction_are_distinguished() {
        let graph = graph_from(&[
            ("A", "B", "activation"),
            ("C", "D", "repression"),
            ("F", "E", "activation"),
        ]);
        let ab = signature_of(&graph, &["A", "B"]);
        let cd = signature_of(&graph, &["C", "D"]);
        let ef = signature_of(&graph, &["E", "F"]);
        assert_ne!(ab, cd);
        // a single directed edge is the same shape whichever name is the source
        assert_eq!(ab, ef);
    }

    #[test]
    fn mutual_edge_differs_from_single_edge() {
        let graph = graph_from(&[
            ("A", "B", "activation"),
            ("B", "A", "activation"),
            ("C", "D", "activation"),
        ]);
        assert_ne!(signature_of(&graph, &["A", "B"]), signature_of(&graph, &["C", "D"]));
    }

    #[test]
    fn path_orientations_are_distinguished() {
        // A -> B -> C (chain), D <- E -> F (fan-out), G -> H <- I (fan-in)
        let graph = graph_from(&[
            ("A", "B", "m"),
            ("B", "C", "m"),
            ("E", "D", "m"),
            ("E", "F", "m"),
            ("G", "H", "m"),
            ("I", "H", "m"),
        ]);
        let chain = signature_of(&graph, &["A", "B", "C"]);
        let fan_out = signature_of(&graph, &["D", "E", "F"]);
        let fan_in = signature_of(&graph, &["G", "H", "I"]);
        assert_ne!(chain, fan_out);
        assert_ne!(chain, fan_in);
        assert_ne!(fan_out, fan_in);
    }

    #[test]
    fn singleton_signature_reflects_self_loops() {
        let graph = graph_from(&[
            ("A", "A", "activation"),
            ("B", "C", "activation"),
            ("D", "D", "repression"),
        ]);
        let looped = signature_of(&graph, &["A"]);
        let plain_b = signature_of(&graph, &["B"]);
        let plain_c = signature_of(&graph, &["C"]);
        assert_eq!(plain_b, plain_c);
        assert_ne!(looped, plain_b);
        assert_ne!(looped, signature_of(&graph, &["D"]));
    }

    #[test]
    fn hex_rendering_is_full_width() {
        let graph = graph_from(&[("A", "B", "activation")]);
        let sig = signature_of(&graph, &["A", "B"]);
        assert_eq!(sig.to_hex().len(), 64);
        assert_eq!(sig.to_string(), sig.to_hex());
    }
}
