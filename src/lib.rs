pub mod config;
pub mod elements;
pub mod explore;
pub mod graph;
pub mod layout;
pub mod query;

pub use elements::{ClickReport, ElementList, positioned_elements, stylesheet};
pub use explore::{
    ChildRecord, ExpandOutcome, ExpansionSummary, ExploreError, QueryService, Session,
};
pub use graph::NodeStatus;
pub use layout::LayoutParams;
pub use query::WikidataClient;

/// Runs the layout over a session's current graph with default parameters.
pub fn render_elements(session: &Session) -> ElementList {
    positioned_elements(session.store(), &LayoutParams::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoResults;

    impl QueryService for NoResults {
        fn fetch_children(&self, _node_id: &str, _relation: &str, _limit: usize) -> Vec<ChildRecord> {
            Vec::new()
        }
    }

    #[test]
    fn render_elements_reflects_the_session_graph() {
        let mut session = Session::new();
        session.init_root("Q395", "Mathematics");
        let elements = render_elements(&session);
        assert_eq!(elements.nodes.len(), 1);
        assert_eq!(elements.nodes[0].id, "Q395");
    }

    #[test]
    fn fresh_session_renders_nothing() {
        let session = Session::new();
        assert!(render_elements(&session).nodes.is_empty());
    }

    #[test]
    fn empty_expansion_marks_root_empty() {
        let mut session = Session::new();
        session.init_root("Q395", "Mathematics");
        session.expand(&NoResults, "Q395", &["P279"], 10).unwrap();
        let elements = render_elements(&session);
        assert_eq!(elements.nodes[0].status, NodeStatus::Empty);
    }
}
