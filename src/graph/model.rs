use indexmap::{IndexMap, IndexSet};

use crate::error::{GraphletError, GraphletResult};

pub type NodeName = String;

/// Dense handle of a node inside one [`GraphStore`]; equal to its insertion index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Index assigned to a mode string on first sight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModeId(usize);

impl ModeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub mode: ModeId,
}

/// Stable mode string -> index table. Any string is a valid mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeRegistry {
    modes: IndexSet<String>,
}

impl ModeRegistry {
    pub fn register(&mut self, mode: &str) -> ModeId {
        if let Some(idx) = self.modes.get_index_of(mode) {
            return ModeId(idx);
        }
        let (idx, _) = self.modes.insert_full(mode.to_string());
        ModeId(idx)
    }

    pub fn lookup(&self, mode: &str) -> Option<ModeId> {
        self.modes.get_index_of(mode).map(ModeId)
    }

    pub fn name(&self, mode: ModeId) -> Option<&str> {
        self.modes.get_index(mode.0).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModeId, &str)> {
        self.modes
            .iter()
            .enumerate()
            .map(|(idx, name)| (ModeId(idx), name.as_str()))
    }
}

#[derive(Debug, Clone, Default)]
struct NodeEntry {
    outgoing: IndexMap<ModeId, IndexSet<NodeId>>,
    undirected: IndexSet<NodeId>,
}

/// Directed multi-mode graph with a derived undirected adjacency view.
///
/// Node and neighbour iteration follows insertion order, so two stores built
/// from the same edge sequence enumerate identically.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: IndexMap<NodeName, NodeEntry>,
    modes: ModeRegistry,
    edge_count: usize,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same node names (in the same order) and the same mode registry, no edges.
    ///
    /// Node and mode ids of `self` stay valid for the returned store.
    pub fn empty_like(&self) -> Self {
        let nodes = self
            .nodes
            .keys()
            .map(|name| (name.clone(), NodeEntry::default()))
            .collect();
        Self {
            nodes,
            modes: self.modes.clone(),
            edge_count: 0,
        }
    }

    pub fn add_node(&mut self, name: &str) -> NodeId {
        if let Some(idx) = self.nodes.get_index_of(name) {
            return NodeId(idx);
        }
        let (idx, _) = self
            .nodes
            .insert_full(name.to_string(), NodeEntry::default());
        NodeId(idx)
    }

    /// Insert `src -> dst` with `mode`. Returns `false` when the triple was already present.
    pub fn add_edge(&mut self, src: &str, dst: &str, mode: &str) -> bool {
        let source = self.add_node(src);
        let target = self.add_node(dst);
        let mode = self.modes.register(mode);
        self.insert_edge(Edge {
            source,
            target,
            mode,
        })
    }

    /// Id-level insertion; `edge` must reference ids and modes of this store.
    pub(crate) fn insert_edge(&mut self, edge: Edge) -> bool {
        let Edge {
            source,
            target,
            mode,
        } = edge;
        let inserted = self.nodes[source.0]
            .outgoing
            .entry(mode)
            .or_default()
            .insert(target);
        if !inserted {
            return false;
        }
        self.edge_count += 1;
        // self-loops never make a node its own undirected neighbour
        if source != target {
            self.nodes[source.0].undirected.insert(target);
            self.nodes[target.0].undirected.insert(source);
        }
        true
    }

    pub fn get_node(&self, name: &str) -> GraphletResult<NodeId> {
        self.nodes
            .get_index_of(name)
            .map(NodeId)
            .ok_or_else(|| GraphletError::NodeNotFound(name.to_string()))
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Name of a node of this store.
    ///
    /// Panics if `id` was issued by a different store with more nodes.
    pub fn node_name(&self, id: NodeId) -> &str {
        self.nodes
            .get_index(id.0)
            .map(|(name, _)| name.as_str())
            .unwrap_or_else(|| panic!("node id {} out of range", id.0))
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn neighbors_undirected(&self, name: &str) -> GraphletResult<Vec<&str>> {
        let id = self.get_node(name)?;
        Ok(self
            .undirected_neighbors(id)
            .iter()
            .map(|neighbor| self.node_name(*neighbor))
            .collect())
    }

    /// Targets of `name` over edges of `mode`; an unseen mode yields an empty view.
    pub fn neighbors_directed(&self, name: &str, mode: &str) -> GraphletResult<Vec<&str>> {
        let id = self.get_node(name)?;
        let Some(mode) = self.modes.lookup(mode) else {
            return Ok(Vec::new());
        };
        Ok(self
            .targets(id, mode)
            .map(|targets| targets.iter().map(|t| self.node_name(*t)).collect())
            .unwrap_or_default())
    }

    pub fn undirected_neighbors(&self, id: NodeId) -> &IndexSet<NodeId> {
        &self.nodes[id.0].undirected
    }

    pub fn are_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.nodes[a.0].undirected.contains(&b)
    }

    pub fn targets(&self, id: NodeId, mode: ModeId) -> Option<&IndexSet<NodeId>> {
        self.nodes[id.0].outgoing.get(&mode)
    }

    pub fn has_edge(&self, edge: &Edge) -> bool {
        self.targets(edge.source, edge.mode)
            .is_some_and(|targets| targets.contains(&edge.target))
    }

    /// Modes of every `source -> target` edge, in mode registration order of `source`.
    pub fn modes_between(
        &self,
        source: NodeId,
        target: NodeId,
    ) -> impl Iterator<Item = ModeId> + '_ {
        self.nodes[source.0]
            .outgoing
            .iter()
            .filter(move |(_, targets)| targets.contains(&target))
            .map(|(mode, _)| *mode)
    }

    /// Every directed edge, grouped by source in node order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.nodes
            .values()
            .enumerate()
            .flat_map(|(idx, entry)| {
                entry.outgoing.iter().flat_map(move |(mode, targets)| {
                    targets.iter().map(move |target| Edge {
                        source: NodeId(idx),
                        target: *target,
                        mode: *mode,
                    })
                })
            })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }

    pub fn modes(&self) -> &ModeRegistry {
        &self.modes
    }

    pub(crate) fn modes_mut(&mut self) -> &mut ModeRegistry {
        &mut self.modes
    }

    pub fn mode_name(&self, mode: ModeId) -> &str {
        self.modes.name(mode).unwrap_or_default()
    }

    /// `(in_degree, out_degree)` per node, counting every mode separately.
    pub fn degrees(&self) -> Vec<(usize, usize)> {
        let mut degrees = vec![(0usize, 0usize); self.nodes.len()];
        for edge in self.edges() {
            degrees[edge.source.0].1 += 1;
            degrees[edge.target.0].0 += 1;
        }
        degrees
    }

    pub fn edge_count_by_mode(&self) -> IndexMap<String, usize> {
        let mut counts: IndexMap<String, usize> = self
            .modes
            .iter()
            .map(|(_, name)| (name.to_string(), 0))
            .collect();
        for edge in self.edges() {
            counts[edge.mode.0] += 1;
        }
        counts
    }
}
