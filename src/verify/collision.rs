use indexmap::IndexMap;
use log::{debug, warn};

use crate::enumeration::Strategy;
use crate::error::GraphletResult;
use crate::graph::{GraphStore, Graphlet, GraphletSnapshot, NodeId};
use crate::signature::{CanonicalSignature, signature};
use crate::verify::isomorphism::{LabelledStructure, structures_match};

/// Signature shared by graphlets that are not isomorphic.
#[derive(Debug, Clone)]
pub struct Collision {
    pub signature: CanonicalSignature,
    pub leaders: Vec<GraphletSnapshot>,
}

#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    pub graphlets: u64,
    pub signatures: usize,
    pub collisions: Vec<Collision>,
    /// Isomorphic leaders that landed under different signatures.
    pub invariance_violations: Vec<(GraphletSnapshot, GraphletSnapshot)>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.collisions.is_empty() && self.invariance_violations.is_empty()
    }

    /// Share of signatures that hold more than one isomorphism class.
    pub fn collision_rate(&self) -> f64 {
        if self.signatures == 0 {
            return 0.0;
        }
        self.collisions.len() as f64 / self.signatures as f64
    }
}

struct Leader {
    snapshot: GraphletSnapshot,
    structure: LabelledStructure,
}

/// Checks signature bucketing against exact isomorphism on one graph.
///
/// Each bucket keeps up to `max_leaders` pairwise non-isomorphic graphlets;
/// every enumerated graphlet is compared against its bucket's leaders. Meant
/// for tests and diagnostics, never for the counting path.
#[derive(Debug, Clone, Copy)]
pub struct CollisionAudit {
    max_leaders: usize,
}

impl Default for CollisionAudit {
    fn default() -> Self {
        Self { max_leaders: 4 }
    }
}

impl CollisionAudit {
    pub fn new(max_leaders: usize) -> Self {
        Self {
            max_leaders: max_leaders.max(1),
        }
    }

    pub fn run(&self, graph: &GraphStore, k: usize, strategy: Strategy) -> GraphletResult<AuditReport> {
        let mut buckets: IndexMap<CanonicalSignature, Vec<Leader>> = IndexMap::new();
        let mut graphlets = 0u64;
        let max_leaders = self.max_leaders;

        strategy.enumerator().enumerate(graph, k, &mut |subset: &[NodeId]| {
            graphlets += 1;
            let graphlet = Graphlet::new(graph, subset.iter().copied());
            let leaders = buckets.entry(signature(&graphlet)).or_default();
            if leaders.len() >= max_leaders {
                return;
            }
            let structure = LabelledStructure::of(&graphlet);
            if leaders
                .iter()
                .any(|leader| structures_match(&leader.structure, &structure))
            {
                return;
            }
            leaders.push(Leader {
                snapshot: graphlet.snapshot(),
                structure,
            });
        })?;

        let mut report = AuditReport {
            graphlets,
            signatures: buckets.len(),
            ..AuditReport::default()
        };

        for (key, leaders) in &buckets {
            if leaders.len() > 1 {
                report.collisions.push(Collision {
                    signature: *key,
                    leaders: leaders.iter().map(|leader| leader.snapshot.clone()).collect(),
                });
            }
        }

        let flat: Vec<(usize, &Leader)> = buckets
            .values()
            .enumerate()
            .flat_map(|(bucket, leaders)| leaders.iter().map(move |leader| (bucket, leader)))
            .collect();
        for (idx, (bucket, leader)) in flat.iter().enumerate() {
            for (other_bucket, other) in &flat[idx + 1..] {
                if bucket != other_bucket && structures_match(&leader.structure, &other.structure) {
                    report
                        .invariance_violations
                        .push((leader.snapshot.clone(), other.snapshot.clone()));
                }
            }
        }

        if report.is_clean() {
            debug!(
                "Audit of {} graphlets (k={}, {}): {} signatures, no collisions",
                report.graphlets, k, strategy, report.signatures
            );
        } else {
            warn!(
                "Audit of {} graphlets (k={}, {}): {} collision(s), {} invariance violation(s)",
                report.graphlets,
                k,
                strategy,
                report.collisions.len(),
                report.invariance_violations.len()
            );
        }
        Ok(report)
    }
}
