use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use csv::{ReaderBuilder, Trim};
use indexmap::IndexSet;
use serde::Deserialize;

use crate::graph::model::{Edge, GraphStore, NodeId};

/// Mode value the upstream interaction tables use for unclassified rows.
const UNKNOWN_MODE: &str = "unknown";

#[derive(Debug, Clone, Deserialize)]
struct RawEdge {
    source: String,
    target: String,
    mode: String,
}

/// Turns external `(source, target, mode)` rows into a [`GraphStore`].
#[derive(Debug, Default)]
pub struct EdgeListLoader;

impl EdgeListLoader {
    /// Load a CSV edge list; the extension picks the format (`.json` or anything else as CSV).
    pub fn from_path(path: &Path) -> Result<GraphStore> {
        let file = File::open(path).with_context(|| format!("open edge list {:?}", path))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            let mut buf = String::new();
            BufReader::new(file).read_to_string(&mut buf)?;
            Self::from_json_str(&buf).with_context(|| format!("parse json edge list {:?}", path))
        } else {
            Self::from_csv_reader(file)
                .with_context(|| format!("parse csv edge list {:?}", path))
        }
    }

    /// Parse `source,target,mode` rows. The first record is a header and is skipped.
    ///
    /// Columns are read by position; quoted fields may contain commas.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<GraphStore> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);
        let mut graph = GraphStore::new();
        for result in rdr.records() {
            let record = result?;
            let line = record.position().map_or(0, |pos| pos.line());
            let edge = match (record.get(0), record.get(1), record.get(2)) {
                (Some(source), Some(target), Some(mode)) => RawEdge {
                    source: source.to_string(),
                    target: target.to_string(),
                    mode: mode.to_string(),
                },
                _ => {
                    return Err(anyhow!(
                        "line {}: expected source,target,mode but found {} field(s)",
                        line,
                        record.len()
                    ));
                }
            };
            insert_raw(&mut graph, &edge);
        }
        Ok(graph)
    }

    pub fn from_csv_str(csv: &str) -> Result<GraphStore> {
        Self::from_csv_reader(csv.as_bytes())
    }

    /// Parse a JSON array of `{"source", "target", "mode"}` objects.
    pub fn from_json_str(json: &str) -> Result<GraphStore> {
        let raw: Vec<RawEdge> = serde_json::from_str(json)?;
        let mut graph = GraphStore::new();
        for edge in &raw {
            insert_raw(&mut graph, edge);
        }
        Ok(graph)
    }

    /// Extract the subgraph induced by `node_names`, keeping the parent's mode registry.
    pub fn induced_subgraph<S: AsRef<str>>(
        graph: &GraphStore,
        node_names: &[S],
    ) -> Result<GraphStore> {
        let mut retain: IndexSet<NodeId> = IndexSet::new();
        for name in node_names {
            let id = graph
                .get_node(name.as_ref())
                .map_err(|_| anyhow!("Node id '{}' not found in graph", name.as_ref()))?;
            retain.insert(id);
        }
        Ok(induced_by_ids(graph, &retain))
    }
}

fn insert_raw(graph: &mut GraphStore, edge: &RawEdge) {
    if edge.mode != UNKNOWN_MODE {
        graph.add_edge(&edge.source, &edge.target, &edge.mode);
    }
}

/// Id-level induced subgraph; nodes keep the order of `retain`.
pub(crate) fn induced_by_ids(graph: &GraphStore, retain: &IndexSet<NodeId>) -> GraphStore {
    let mut sub = GraphStore::new();
    for (_, mode) in graph.modes().iter() {
        sub.modes_mut().register(mode);
    }
    for id in retain {
        sub.add_node(graph.node_name(*id));
    }
    for edge in graph.edges() {
        let (Some(source), Some(target)) = (
            retain.get_index_of(&edge.source),
            retain.get_index_of(&edge.target),
        ) else {
            continue;
        };
        sub.insert_edge(Edge {
            source: NodeId::new(source),
            target: NodeId::new(target),
            mode: edge.mode,
        });
    }
    sub
}
