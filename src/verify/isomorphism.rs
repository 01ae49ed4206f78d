use petgraph::algo::isomorphism::is_isomorphic_matching;
use petgraph::graph::DiGraph;

use crate::graph::Graphlet;

/// Mode-labelled adjacency of a graphlet, indexed by position in its sorted
/// node list. `pairs[i][j]` holds the sorted mode names of every `i -> j` edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelledStructure {
    loops: Vec<Vec<String>>,
    pairs: Vec<Vec<Vec<String>>>,
}

impl LabelledStructure {
    pub fn of(graphlet: &Graphlet<'_>) -> Self {
        let graph = graphlet.graph();
        let nodes = graphlet.nodes();
        let k = nodes.len();
        let mut loops = vec![Vec::new(); k];
        let mut pairs = vec![vec![Vec::new(); k]; k];
        for edge in graphlet.induced_edges() {
            let (Ok(a), Ok(b)) = (
                nodes.binary_search(&edge.source),
                nodes.binary_search(&edge.target),
            ) else {
                continue;
            };
            let mode = graph.mode_name(edge.mode).to_string();
            if a == b {
                loops[a].push(mode);
            } else {
                pairs[a][b].push(mode);
            }
        }
        for modes in loops.iter_mut().chain(pairs.iter_mut().flatten()) {
            modes.sort();
        }
        Self { loops, pairs }
    }

    pub fn size(&self) -> usize {
        self.loops.len()
    }

    /// Node weights are loop modes, one edge per ordered pair weighted by its mode set.
    fn to_digraph(&self) -> DiGraph<Vec<String>, Vec<String>> {
        let mut digraph = DiGraph::with_capacity(self.size(), 0);
        let indices: Vec<_> = self
            .loops
            .iter()
            .map(|modes| digraph.add_node(modes.clone()))
            .collect();
        for (a, row) in self.pairs.iter().enumerate() {
            for (b, modes) in row.iter().enumerate() {
                if !modes.is_empty() {
                    digraph.add_edge(indices[a], indices[b], modes.clone());
                }
            }
        }
        digraph
    }

    /// Sorted mode labels over all edges; a cheap necessary condition.
    fn label_multiset(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .loops
            .iter()
            .chain(self.pairs.iter().flatten())
            .flatten()
            .map(String::as_str)
            .collect();
        labels.sort_unstable();
        labels
    }
}

/// Exact check by searching every node bijection. Only feasible for small k.
pub fn are_isomorphic_brute_force(a: &Graphlet<'_>, b: &Graphlet<'_>) -> bool {
    structures_match_brute_force(&LabelledStructure::of(a), &LabelledStructure::of(b))
}

/// Exact check with VF2.
pub fn are_isomorphic(a: &Graphlet<'_>, b: &Graphlet<'_>) -> bool {
    structures_match(&LabelledStructure::of(a), &LabelledStructure::of(b))
}

pub fn structures_match(a: &LabelledStructure, b: &LabelledStructure) -> bool {
    if a.size() != b.size() || a.label_multiset() != b.label_multiset() {
        return false;
    }
    is_isomorphic_matching(
        &a.to_digraph(),
        &b.to_digraph(),
        |left: &Vec<String>, right: &Vec<String>| left == right,
        |left: &Vec<String>, right: &Vec<String>| left == right,
    )
}

pub fn structures_match_brute_force(a: &LabelledStructure, b: &LabelledStructure) -> bool {
    if a.size() != b.size() {
        return false;
    }
    let mut mapping = Vec::with_capacity(a.size());
    let mut used = vec![false; b.size()];
    extend_mapping(a, b, &mut mapping, &mut used)
}

/// Depth-first bijection search; `mapping[i]` is the image of node `i` of `a`.
fn extend_mapping(
    a: &LabelledStructure,
    b: &LabelledStructure,
    mapping: &mut Vec<usize>,
    used: &mut [bool],
) -> bool {
    let next = mapping.len();
    if next == a.size() {
        return true;
    }
    for candidate in 0..b.size() {
        if used[candidate] || a.loops[next] != b.loops[candidate] {
            continue;
        }
        let consistent = mapping.iter().enumerate().all(|(prev, &image)| {
            a.pairs[prev][next] == b.pairs[image][candidate]
                && a.pairs[next][prev] == b.pairs[candidate][image]
        });
        if !consistent {
            continue;
        }
        used[candidate] = true;
        mapping.push(candidate);
        if extend_mapping(a, b, mapping, used) {
            return true;
        }
        mapping.pop();
        used[candidate] = false;
    }
    false
}
