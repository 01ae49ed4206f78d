pub mod construction;
pub mod graphlet;
pub mod model;

pub use construction::EdgeListLoader;
pub use graphlet::{Graphlet, GraphletSnapshot, SnapshotEdge};
pub use model::{Edge, GraphStore, ModeId, ModeRegistry, NodeId, NodeName};
