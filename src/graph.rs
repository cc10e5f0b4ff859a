use std::collections::{HashMap, HashSet};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    New,
    Expanded,
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub status: NodeStatus,
    pub child_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub relation: String,
}

/// What a single merge changed. An expansion counts as progress when either
/// number is non-zero: a re-discovered node still produces a fresh edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeDelta {
    pub new_nodes: usize,
    pub new_edges: usize,
}

impl MergeDelta {
    pub fn is_empty(&self) -> bool {
        self.new_nodes == 0 && self.new_edges == 0
    }
}

/// Canonical node/edge collection for one exploration session.
///
/// Nodes and edges are stored in first-seen order; layout and rendering both
/// depend on that order staying stable across merges.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<String, usize>,
    edge_keys: HashSet<(String, String, String)>,
    root: Option<String>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops everything and starts over with a single root node, status `New`.
    pub fn reset(&mut self, root_id: &str, root_label: &str) {
        self.nodes.clear();
        self.edges.clear();
        self.index.clear();
        self.edge_keys.clear();
        self.index.insert(root_id.to_string(), 0);
        self.nodes.push(Node {
            id: root_id.to_string(),
            label: root_label.to_string(),
            status: NodeStatus::New,
            child_count: None,
        });
        self.root = Some(root_id.to_string());
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Merges one relation's worth of freshly fetched children under `source`.
    ///
    /// A child whose id is already present keeps its existing status and label;
    /// an edge is inserted unless the same `(source, target, relation)` triple
    /// exists already, so re-merging the same fragments is a no-op.
    pub fn merge_expansion(&mut self, source: &str, relation: &str, children: &[Node]) -> MergeDelta {
        let mut delta = MergeDelta::default();
        if !self.index.contains_key(source) {
            return delta;
        }

        for child in children {
            if !self.index.contains_key(&child.id) {
                self.index.insert(child.id.clone(), self.nodes.len());
                self.nodes.push(Node {
                    status: NodeStatus::New,
                    ..child.clone()
                });
                delta.new_nodes += 1;
            }

            let key = (
                source.to_string(),
                child.id.clone(),
                relation.to_string(),
            );
            if self.edge_keys.insert(key) {
                self.edges.push(Edge {
                    source: source.to_string(),
                    target: child.id.clone(),
                    relation: relation.to_string(),
                });
                delta.new_edges += 1;
            }
        }

        delta
    }

    /// Sets a node's status. `Expanded` and `Empty` are sticky: a node never
    /// goes back to `New`, and a settled status only changes via re-marking
    /// itself (callers re-mark `Expanded` after a later successful merge).
    pub fn mark_status(&mut self, id: &str, status: NodeStatus) {
        if let Some(&i) = self.index.get(id) {
            let node = &mut self.nodes[i];
            if node.status == NodeStatus::New || node.status == status {
                node.status = status;
            }
        }
    }

    pub fn out_degree(&self, id: &str) -> usize {
        self.edges.iter().filter(|e| e.source == id).count()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// Which `(node, relation)` pairs have already been queried. The set only
/// grows; it is cleared as a whole when a new root is initialized.
#[derive(Debug, Clone, Default)]
pub struct ExpansionTracker {
    seen: HashSet<(String, String)>,
}

impl ExpansionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, node_id: &str, relation: &str) -> bool {
        self.seen
            .contains(&(node_id.to_string(), relation.to_string()))
    }

    pub fn mark(&mut self, node_id: &str, relation: &str) {
        self.seen
            .insert((node_id.to_string(), relation.to_string()));
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
