pub mod collision;
pub mod isomorphism;

pub use collision::{AuditReport, Collision, CollisionAudit};
pub use isomorphism::{LabelledStructure, are_isomorphic, are_isomorphic_brute_force};
