use std::collections::VecDeque;
use std::fmt;

use crate::error::GraphletResult;
use crate::graph::model::{Edge, GraphStore, NodeId};

/// Induced subgraph over a node subset; edges are read from the parent store on demand.
#[derive(Debug, Clone)]
pub struct Graphlet<'g> {
    graph: &'g GraphStore,
    nodes: Vec<NodeId>,
}

impl<'g> Graphlet<'g> {
    pub fn new(graph: &'g GraphStore, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let mut nodes: Vec<NodeId> = nodes.into_iter().collect();
        nodes.sort_unstable();
        nodes.dedup();
        Self { graph, nodes }
    }

    pub fn from_names<S: AsRef<str>>(graph: &'g GraphStore, names: &[S]) -> GraphletResult<Self> {
        let ids = names
            .iter()
            .map(|name| graph.get_node(name.as_ref()))
            .collect::<GraphletResult<Vec<_>>>()?;
        Ok(Self::new(graph, ids))
    }

    pub fn graph(&self) -> &'g GraphStore {
        self.graph
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.binary_search(&node).is_ok()
    }

    pub fn node_names(&self) -> Vec<&'g str> {
        self.nodes
            .iter()
            .map(|node| self.graph.node_name(*node))
            .collect()
    }

    /// Parent edges with both endpoints inside the subset.
    pub fn induced_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.nodes.iter().flat_map(move |source| {
            self.nodes.iter().flat_map(move |target| {
                self.graph
                    .modes_between(*source, *target)
                    .map(move |mode| Edge {
                        source: *source,
                        target: *target,
                        mode,
                    })
            })
        })
    }

    /// Connectivity of the subset under undirected adjacency.
    pub fn is_connected(&self) -> bool {
        let Some(&start) = self.nodes.first() else {
            return true;
        };
        let mut seen = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([start]);
        seen[0] = true;
        let mut reached = 1;
        while let Some(node) = queue.pop_front() {
            for neighbor in self.graph.undirected_neighbors(node) {
                if let Ok(pos) = self.nodes.binary_search(neighbor) {
                    if !seen[pos] {
                        seen[pos] = true;
                        reached += 1;
                        queue.push_back(*neighbor);
                    }
                }
            }
        }
        reached == self.nodes.len()
    }

    /// Owned copy that outlives the parent store.
    pub fn snapshot(&self) -> GraphletSnapshot {
        GraphletSnapshot {
            nodes: self.node_names().into_iter().map(str::to_string).collect(),
            edges: self
                .induced_edges()
                .map(|edge| SnapshotEdge {
                    source: self.graph.node_name(edge.source).to_string(),
                    target: self.graph.node_name(edge.target).to_string(),
                    mode: self.graph.mode_name(edge.mode).to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotEdge {
    pub source: String,
    pub target: String,
    pub mode: String,
}

/// Node names and induced edges of one graphlet, detached from its graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphletSnapshot {
    pub nodes: Vec<String>,
    pub edges: Vec<SnapshotEdge>,
}

impl GraphletSnapshot {
    /// Rebuild the snapshot as a standalone store.
    pub fn to_graph(&self) -> GraphStore {
        let mut graph = GraphStore::new();
        for node in &self.nodes {
            graph.add_node(node);
        }
        for edge in &self.edges {
            graph.add_edge(&edge.source, &edge.target, &edge.mode);
        }
        graph
    }
}

impl fmt::Display for GraphletSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.nodes.join(", "))?;
        if !self.edges.is_empty() {
            let edges: Vec<String> = self
                .edges
                .iter()
                .map(|edge| format!("{}-[{}]->{}", edge.source, edge.mode, edge.target))
                .collect();
            write!(f, " [{}]", edges.join(", "))?;
        }
        Ok(())
    }
}
