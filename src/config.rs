use std::fmt;

use crate::graph::NodeStatus;

/// The closed set of Wikidata relations offered for expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    SubclassOf,
    InstanceOf,
    PartOf,
    HasPart,
}

impl Relation {
    pub const ALL: [Relation; 4] = [
        Relation::SubclassOf,
        Relation::InstanceOf,
        Relation::PartOf,
        Relation::HasPart,
    ];

    /// Wikidata property id, also the relation identifier stored on edges.
    pub fn pid(self) -> &'static str {
        match self {
            Relation::SubclassOf => "P279",
            Relation::InstanceOf => "P31",
            Relation::PartOf => "P361",
            Relation::HasPart => "P527",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Relation::SubclassOf => "Subclass of",
            Relation::InstanceOf => "Instance of",
            Relation::PartOf => "Part of",
            Relation::HasPart => "Has part",
        }
    }

    /// Edge color in the rendered graph.
    pub fn color(self) -> &'static str {
        match self {
            Relation::SubclassOf => "#1f77b4",
            Relation::InstanceOf => "#ff7f0e",
            Relation::PartOf => "#2ca02c",
            Relation::HasPart => "#d62728",
        }
    }

    pub fn from_pid(pid: &str) -> Option<Relation> {
        Relation::ALL.into_iter().find(|r| r.pid() == pid)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.pid())
    }
}

/// Node fill color per status.
pub fn status_color(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::New => "purple",
        NodeStatus::Expanded => "green",
        NodeStatus::Empty => "red",
    }
}

/// Fill and border for the node the user currently has selected.
pub const SELECTED_COLOR: &str = "yellow";
pub const SELECTED_BORDER_COLOR: &str = "black";
pub const SELECTED_BORDER_WIDTH: u32 = 3;

/// Root topics offered to the user, with their Wikidata entity ids.
pub const TOPICS: [(&str, &str); 6] = [
    ("Mathematics", "Q395"),
    ("Physics", "Q413"),
    ("Biology", "Q420"),
    ("Computer Science", "Q21198"),
    ("History", "Q309"),
    ("Chemistry", "Q2329"),
];

pub fn topic_id(name: &str) -> Option<&'static str> {
    TOPICS
        .iter()
        .find(|(topic, _)| topic.eq_ignore_ascii_case(name))
        .map(|&(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pids_round_trip() {
        for relation in Relation::ALL {
            assert_eq!(Relation::from_pid(relation.pid()), Some(relation));
        }
        assert_eq!(Relation::from_pid("P999"), None);
    }

    #[test]
    fn topic_lookup_ignores_case() {
        assert_eq!(topic_id("Mathematics"), Some("Q395"));
        assert_eq!(topic_id("computer science"), Some("Q21198"));
        assert_eq!(topic_id("Alchemy"), None);
    }

    #[test]
    fn relation_display_names_the_property() {
        assert_eq!(Relation::SubclassOf.to_string(), "Subclass of (P279)");
    }
}
