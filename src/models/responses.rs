use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A normalized candidate returned for one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub id: String,
    pub name: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Full property bag as returned by the service
    #[serde(skip_serializing)]
    pub properties: Map<String, Value>,
    #[serde(rename = "match")]
    pub is_match: bool,
    pub score: f64,
    /// Score components, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Map<String, Value>>,
}

/// Results of one call, keyed by the submitted query names
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchResponse {
    pub results_by_query: BTreeMap<String, Vec<MatchResult>>,
}

impl MatchResponse {
    pub fn results(&self, query_name: &str) -> Option<&[MatchResult]> {
        self.results_by_query.get(query_name).map(Vec::as_slice)
    }

    pub fn total_results(&self) -> usize {
        self.results_by_query.values().map(Vec::len).sum()
    }
}

/// Result entry as it appears on the wire
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawMatchResult {
    pub id: String,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(rename = "match")]
    pub is_match: bool,
    pub score: f64,
    #[serde(default)]
    pub features: Option<Map<String, Value>>,
}

impl From<RawMatchResult> for MatchResult {
    fn from(raw: RawMatchResult) -> Self {
        let properties = raw.properties.unwrap_or_default();

        // Non-string name values are skipped; they stay visible in `properties`
        let name = properties
            .get("name")
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: raw.id,
            name,
            schema: raw.schema,
            properties,
            is_match: raw.is_match,
            score: raw.score,
            features: raw.features,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_extracted_from_properties() {
        let raw: RawMatchResult = serde_json::from_value(json!({
            "id": "Q76",
            "schema": "Person",
            "properties": {"name": ["Barack Obama", "Барак Обама"], "country": ["us"]},
            "match": true,
            "score": 0.98
        }))
        .unwrap();

        let result = MatchResult::from(raw);

        assert_eq!(result.name, vec!["Barack Obama", "Барак Обама"]);
        assert_eq!(result.properties["country"], json!(["us"]));
        assert_eq!(result.features, None);
    }

    #[test]
    fn test_missing_name_is_empty() {
        let raw: RawMatchResult =
            serde_json::from_value(json!({"id": "X", "match": false, "score": 0.1})).unwrap();

        assert!(MatchResult::from(raw).name.is_empty());
    }

    #[test]
    fn test_null_properties_is_empty_bag() {
        let raw: RawMatchResult = serde_json::from_value(json!({
            "id": "X", "properties": null, "match": false, "score": 0.1
        }))
        .unwrap();

        let result = MatchResult::from(raw);

        assert!(result.properties.is_empty());
        assert!(result.name.is_empty());
    }

    #[test]
    fn test_non_string_names_skipped_but_kept_in_properties() {
        let raw: RawMatchResult = serde_json::from_value(json!({
            "id": "X",
            "properties": {"name": ["Barack Obama", null, 42]},
            "match": true,
            "score": 0.9
        }))
        .unwrap();

        let result = MatchResult::from(raw);

        assert_eq!(result.name, vec!["Barack Obama"]);
        assert_eq!(result.properties["name"], json!(["Barack Obama", null, 42]));
    }

    #[test]
    fn test_serialized_shape() {
        let result = MatchResult {
            id: "X1".to_string(),
            name: vec!["Barack Obama".to_string()],
            schema: None,
            properties: Map::new(),
            is_match: true,
            score: 0.98,
            features: None,
        };

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"id": "X1", "name": ["Barack Obama"], "match": true, "score": 0.98})
        );
    }
}
