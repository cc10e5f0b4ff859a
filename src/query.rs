use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::explore::{ChildRecord, QueryService};

pub const WIKIDATA_ENDPOINT: &str = "https://query.wikidata.org/sparql";

const USER_AGENT: &str = "ontograph/0.1 (ontology graph explorer)";
const TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Blocking SPARQL client for the Wikidata query service.
///
/// This is the concrete [`QueryService`]: failures of any kind are logged and
/// degrade to an empty child list, so one slow or broken relation never aborts
/// an expansion.
#[derive(Debug, Clone)]
pub struct WikidataClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl WikidataClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_endpoint(WIKIDATA_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    fn query(&self, qid: &str, prop: &str, limit: usize) -> Result<Vec<ChildRecord>, QueryError> {
        let query = children_query(qid, prop, limit);
        let body = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query.as_str()), ("format", "json")])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()?
            .error_for_status()?
            .text()?;
        parse_response(&body)
    }
}

impl QueryService for WikidataClient {
    fn fetch_children(&self, node_id: &str, relation: &str, limit: usize) -> Vec<ChildRecord> {
        match self.query(node_id, relation, limit) {
            Ok(children) => children,
            Err(e) => {
                tracing::warn!(
                    node = node_id,
                    relation,
                    error = %e,
                    "query failed, treating as no results"
                );
                Vec::new()
            }
        }
    }
}

/// Children of `qid` under property `prop`, busiest subtrees first. The
/// grandchild count doubles as a display hint on the child label.
fn children_query(qid: &str, prop: &str, limit: usize) -> String {
    format!(
        "SELECT ?child ?childLabel (COUNT(?grandchild) AS ?childCount) WHERE {{\n\
         \x20 ?child wdt:{prop} wd:{qid}.\n\
         \x20 OPTIONAL {{ ?grandchild wdt:{prop} ?child. }}\n\
         \x20 SERVICE wikibase:label {{ bd:serviceParam wikibase:language \"[AUTO_LANGUAGE],en\". }}\n\
         }}\n\
         GROUP BY ?child ?childLabel\n\
         ORDER BY DESC(?childCount)\n\
         LIMIT {limit}\n"
    )
}

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<Binding>,
}

#[derive(Debug, Deserialize)]
struct Binding {
    child: Term,
    #[serde(rename = "childLabel")]
    child_label: Term,
    #[serde(rename = "childCount")]
    child_count: Option<Term>,
}

#[derive(Debug, Deserialize)]
struct Term {
    value: String,
}

fn parse_response(body: &str) -> Result<Vec<ChildRecord>, QueryError> {
    let response: SparqlResponse = serde_json::from_str(body)?;
    Ok(response
        .results
        .bindings
        .into_iter()
        .map(|binding| {
            // Entity IRIs look like http://www.wikidata.org/entity/Q395.
            let id = binding
                .child
                .value
                .rsplit('/')
                .next()
                .unwrap_or(binding.child.value.as_str())
                .to_string();
            let child_count = binding
                .child_count
                .and_then(|term| term.value.parse::<u64>().ok());
            let label = match child_count {
                Some(count) => format!("{} ({count})", binding.child_label.value),
                None => binding.child_label.value,
            };
            ChildRecord {
                id,
                label,
                child_count,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn query_names_property_entity_and_limit() {
        let query = children_query("Q395", "P279", 10);
        assert!(query.contains("?child wdt:P279 wd:Q395."), "got: {query}");
        assert!(query.contains("LIMIT 10"), "got: {query}");
        assert!(query.contains("ORDER BY DESC(?childCount)"), "got: {query}");
    }

    #[test]
    fn parses_bindings_into_child_records() {
        let body = r#"{
            "results": {
                "bindings": [
                    {
                        "child": {"type": "uri", "value": "http://www.wikidata.org/entity/Q3968"},
                        "childLabel": {"type": "literal", "value": "algebra"},
                        "childCount": {"type": "literal", "value": "12"}
                    }
                ]
            }
        }"#;
        let records = parse_response(body).unwrap();
        assert_eq!(
            records,
            vec![ChildRecord {
                id: "Q3968".to_string(),
                label: "algebra (12)".to_string(),
                child_count: Some(12),
            }]
        );
    }

    #[test]
    fn missing_count_keeps_plain_label() {
        let body = r#"{
            "results": {
                "bindings": [
                    {
                        "child": {"type": "uri", "value": "http://www.wikidata.org/entity/Q8087"},
                        "childLabel": {"type": "literal", "value": "geometry"}
                    }
                ]
            }
        }"#;
        let records = parse_response(body).unwrap();
        assert_eq!(records[0].label, "geometry");
        assert_eq!(records[0].child_count, None);
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(parse_response("not json").is_err());
        assert!(parse_response(r#"{"results": {}}"#).is_err());
    }

    #[test]
    fn empty_bindings_give_no_records() {
        let body = r#"{"results": {"bindings": []}}"#;
        assert_eq!(parse_response(body).unwrap(), vec![]);
    }
}
