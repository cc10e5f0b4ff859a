use std::fmt;

use thiserror::Error;

use crate::graph::{ExpansionTracker, GraphStore, Node, NodeStatus};

/// One child row as reported by the query collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildRecord {
    pub id: String,
    pub label: String,
    pub child_count: Option<u64>,
}

/// The remote query boundary. Implementations must be idempotent and must
/// absorb transport or decode failures into an empty list; the tracker in
/// [`Session`] is the only de-dup gate above this seam.
pub trait QueryService {
    fn fetch_children(&self, node_id: &str, relation: &str, limit: usize) -> Vec<ChildRecord>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExploreError {
    #[error("no root initialized, start with a topic first")]
    NoRoot,
    #[error("no relation types selected")]
    NoRelationsSelected,
    #[error("unknown node: {0}")]
    UnknownNode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandOutcome {
    Expanded,
    AlreadyExpandedOrEmpty,
}

/// What one relation contributed to an expansion. `children` holds display
/// labels in the order the collaborator returned them; empty means no results.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationReport {
    pub relation: String,
    pub children: Vec<String>,
}

/// Human-readable record of one `expand` call, for the surrounding UI to
/// display. Relations skipped by the tracker produce no report.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionSummary {
    pub node_id: String,
    pub outcome: ExpandOutcome,
    pub reports: Vec<RelationReport>,
    pub new_nodes: usize,
}

impl fmt::Display for ExpansionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            ExpandOutcome::Expanded => {
                writeln!(f, "{} expanded with relations:", self.node_id)?
            }
            ExpandOutcome::AlreadyExpandedOrEmpty => writeln!(
                f,
                "{} already expanded for selected relations, or no results:",
                self.node_id
            )?,
        }
        for report in &self.reports {
            if report.children.is_empty() {
                writeln!(f, "- {} -> no results", report.relation)?;
            } else {
                writeln!(
                    f,
                    "- {} -> {} children: {}",
                    report.relation,
                    report.children.len(),
                    report.children.join(", ")
                )?;
            }
        }
        Ok(())
    }
}

/// One exploration session: the graph being grown plus the record of which
/// (node, relation) pairs were already queried. Created once per root and
/// threaded through every controller call; there is no ambient state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    store: GraphStore,
    tracker: ExpansionTracker,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts over: clears the tracker and replaces the graph with a single
    /// root node in status `New`.
    pub fn init_root(&mut self, root_id: &str, root_label: &str) {
        self.tracker.clear();
        self.store.reset(root_id, root_label);
        tracing::info!(root = root_id, label = root_label, "root initialized");
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Expands `node_id` along each relation in the given order, skipping
    /// pairs the tracker already holds. Each remaining relation triggers one
    /// collaborator call; its results are merged and the pair marked. The node
    /// becomes `Expanded` if anything new (node or edge) was merged, and
    /// `Empty` if nothing was and it still has no outgoing edges at all.
    pub fn expand(
        &mut self,
        service: &dyn QueryService,
        node_id: &str,
        relations: &[&str],
        limit: usize,
    ) -> Result<ExpansionSummary, ExploreError> {
        if self.store.root().is_none() {
            return Err(ExploreError::NoRoot);
        }
        if relations.is_empty() {
            return Err(ExploreError::NoRelationsSelected);
        }
        if !self.store.contains(node_id) {
            return Err(ExploreError::UnknownNode(node_id.to_string()));
        }

        let mut reports = Vec::new();
        let mut new_nodes = 0;
        let mut new_edges = 0;
        for &relation in relations {
            if self.tracker.has(node_id, relation) {
                tracing::debug!(node = node_id, relation, "pair already expanded, skipping");
                continue;
            }

            let children = service.fetch_children(node_id, relation, limit);
            let labels: Vec<String> = children.iter().map(|c| c.label.clone()).collect();
            let nodes: Vec<Node> = children
                .into_iter()
                .map(|c| Node {
                    id: c.id,
                    label: c.label,
                    status: NodeStatus::New,
                    child_count: c.child_count,
                })
                .collect();

            let delta = self.store.merge_expansion(node_id, relation, &nodes);
            tracing::debug!(
                node = node_id,
                relation,
                new_nodes = delta.new_nodes,
                new_edges = delta.new_edges,
                "merged expansion"
            );
            new_nodes += delta.new_nodes;
            new_edges += delta.new_edges;
            self.tracker.mark(node_id, relation);
            reports.push(RelationReport {
                relation: relation.to_string(),
                children: labels,
            });
        }

        let outcome = if new_nodes + new_edges > 0 {
            self.store.mark_status(node_id, NodeStatus::Expanded);
            ExpandOutcome::Expanded
        } else {
            if self.store.out_degree(node_id) == 0 {
                self.store.mark_status(node_id, NodeStatus::Empty);
            }
            ExpandOutcome::AlreadyExpandedOrEmpty
        };

        Ok(ExpansionSummary {
            node_id: node_id.to_string(),
            outcome,
            reports,
            new_nodes,
        })
    }
}
