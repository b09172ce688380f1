use crate::models::{MatchResponse, MatchResult, RawMatchResult};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// The response body did not have the shape the match API promises
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("response is missing the responses object")]
    MissingResponses,

    #[error("no response for query {0}")]
    MissingQuery(String),

    #[error("response for query {0} has no results array")]
    MissingResults(String),

    #[error("result {index} of query {query} is malformed: {source}")]
    MalformedResult {
        query: String,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a raw response body and normalize it for the given query names
pub fn parse_response<'a>(
    body: &[u8],
    query_names: impl IntoIterator<Item = &'a str>,
) -> Result<MatchResponse, ProtocolError> {
    let json: Value = serde_json::from_slice(body).map_err(ProtocolError::InvalidJson)?;
    normalize_response(&json, query_names)
}

/// Extract the results of every submitted query from a decoded response
///
/// Keys in `responses` that were not submitted are ignored. Result order
/// within a query is kept exactly as received.
pub fn normalize_response<'a>(
    json: &Value,
    query_names: impl IntoIterator<Item = &'a str>,
) -> Result<MatchResponse, ProtocolError> {
    let responses = json
        .get("responses")
        .and_then(Value::as_object)
        .ok_or(ProtocolError::MissingResponses)?;

    let mut results_by_query = BTreeMap::new();

    for query in query_names {
        let results = responses
            .get(query)
            .ok_or_else(|| ProtocolError::MissingQuery(query.to_string()))?
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| ProtocolError::MissingResults(query.to_string()))?;

        let normalized = results
            .iter()
            .enumerate()
            .map(|(index, raw)| normalize_result(query, index, raw))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Query {} returned {} results", query, normalized.len());
        results_by_query.insert(query.to_string(), normalized);
    }

    Ok(MatchResponse { results_by_query })
}

fn normalize_result(query: &str, index: usize, raw: &Value) -> Result<MatchResult, ProtocolError> {
    RawMatchResult::deserialize(raw)
        .map(MatchResult::from)
        .map_err(|source| ProtocolError::MalformedResult {
            query: query.to_string(),
            index,
            source,
        })
}
