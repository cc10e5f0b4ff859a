use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::{
    Relation, SELECTED_BORDER_COLOR, SELECTED_BORDER_WIDTH, SELECTED_COLOR, status_color,
};
use crate::graph::{GraphStore, NodeStatus};
use crate::layout::{self, LayoutParams, Position};

/// A positioned node as handed to the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeElement {
    pub id: String,
    pub label: String,
    pub status: NodeStatus,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeElement {
    pub source: String,
    pub target: String,
    pub relation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ElementList {
    pub nodes: Vec<NodeElement>,
    pub edges: Vec<EdgeElement>,
}

/// What the rendering collaborator reports back after a click.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClickReport {
    pub selected_node_id: Option<String>,
}

/// Snapshots the store and runs the layout over it. Nodes without a position
/// (unreachable from the root) are left out; edges are passed through as-is.
pub fn positioned_elements(store: &GraphStore, params: &LayoutParams) -> ElementList {
    let Some(root) = store.root() else {
        return ElementList::default();
    };
    let positions = layout::layout(store.nodes(), store.edges(), root, params);

    let nodes = store
        .nodes()
        .iter()
        .filter_map(|n| {
            positions.get(n.id.as_str()).map(|&position| NodeElement {
                id: n.id.clone(),
                label: n.label.clone(),
                status: n.status,
                position,
            })
        })
        .collect();
    let edges = store
        .edges()
        .iter()
        .map(|e| EdgeElement {
            source: e.source.clone(),
            target: e.target.clone(),
            relation: e.relation.clone(),
        })
        .collect();

    ElementList { nodes, edges }
}

/// One selector/style pair in the rendering collaborator's stylesheet format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRule {
    pub selector: String,
    pub style: Value,
}

/// Static visual mapping: node color per status, selection highlight, and one
/// edge color per relation type.
pub fn stylesheet() -> Vec<StyleRule> {
    let mut rules = vec![
        StyleRule {
            selector: "node".to_string(),
            style: json!({"label": "data(label)", "color": "white"}),
        },
        StyleRule {
            selector: r#"node[status = "new"]"#.to_string(),
            style: json!({"background-color": status_color(NodeStatus::New)}),
        },
        StyleRule {
            selector: r#"node[status = "expanded"]"#.to_string(),
            style: json!({"background-color": status_color(NodeStatus::Expanded)}),
        },
        StyleRule {
            selector: r#"node[status = "empty"]"#.to_string(),
            style: json!({"background-color": status_color(NodeStatus::Empty)}),
        },
        StyleRule {
            selector: "node:selected".to_string(),
            style: json!({
                "background-color": SELECTED_COLOR,
                "border-width": SELECTED_BORDER_WIDTH,
                "border-color": SELECTED_BORDER_COLOR,
            }),
        },
    ];
    for relation in Relation::ALL {
        rules.push(StyleRule {
            selector: format!(r#"edge[relation = "{}"]"#, relation.pid()),
            style: json!({"line-color": relation.color(), "width": 2}),
        });
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_store_yields_no_elements() {
        let store = GraphStore::new();
        let elements = positioned_elements(&store, &LayoutParams::default());
        assert_eq!(elements, ElementList::default());
    }

    #[test]
    fn every_reachable_node_is_positioned() {
        let mut store = GraphStore::new();
        store.reset("Q395", "Mathematics");
        store.merge_expansion(
            "Q395",
            "P279",
            &[crate::graph::Node {
                id: "Q1".to_string(),
                label: "algebra".to_string(),
                status: NodeStatus::New,
                child_count: Some(3),
            }],
        );

        let elements = positioned_elements(&store, &LayoutParams::default());
        assert_eq!(elements.nodes.len(), 2);
        assert_eq!(elements.edges.len(), 1);
        assert_eq!(elements.nodes[0].id, "Q395");
        assert_eq!(elements.nodes[0].position, Position { x: 600.0, y: 115.0 });
        assert_eq!(elements.edges[0].relation, "P279");
    }

    #[test]
    fn node_element_serializes_with_lowercase_status() {
        let element = NodeElement {
            id: "Q395".to_string(),
            label: "Mathematics".to_string(),
            status: NodeStatus::New,
            position: Position { x: 600.0, y: 115.0 },
        };
        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(value["status"], "new");
        assert_eq!(value["position"]["x"], 600.0);
    }

    #[test]
    fn stylesheet_covers_statuses_and_relations() {
        let rules = stylesheet();
        let selectors: Vec<&str> = rules.iter().map(|r| r.selector.as_str()).collect();
        assert!(selectors.contains(&r#"node[status = "empty"]"#));
        assert!(selectors.contains(&"node:selected"));
        for relation in Relation::ALL {
            let selector = format!(r#"edge[relation = "{}"]"#, relation.pid());
            let rule = rules.iter().find(|r| r.selector == selector).unwrap();
            assert_eq!(rule.style["line-color"], relation.color());
        }
    }

    #[test]
    fn click_report_decodes_optional_selection() {
        let report: ClickReport =
            serde_json::from_str(r#"{"selected_node_id": "Q395"}"#).unwrap();
        assert_eq!(report.selected_node_id.as_deref(), Some("Q395"));

        let report: ClickReport = serde_json::from_str("{}").unwrap();
        assert_eq!(report, ClickReport::default());
    }
}
