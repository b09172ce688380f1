use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

/// A single named query: an entity schema plus the property values to match on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct QuerySpec {
    /// Key of the query within its request. Travels as the map key on the wire.
    #[serde(skip)]
    pub name: String,
    #[validate(length(min = 1))]
    pub schema: String,
    #[validate(custom(function = "has_property_values"))]
    pub properties: BTreeMap<String, Vec<String>>,
}

impl QuerySpec {
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Append values to a property, creating it if needed
    pub fn property<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties
            .entry(key.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }
}

fn has_property_values(properties: &BTreeMap<String, Vec<String>>) -> Result<(), ValidationError> {
    if properties.values().any(|values| !values.is_empty()) {
        Ok(())
    } else {
        Err(ValidationError::new("no_property_values"))
    }
}

/// A batch of named queries sent in one call
///
/// Only `queries` is part of the JSON body; the algorithm is sent as a URL
/// query parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub queries: BTreeMap<String, QuerySpec>,
    #[serde(skip)]
    pub algorithm: Option<String>,
}

impl MatchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query keyed by its name, replacing any query with the same name
    pub fn with_query(mut self, query: QuerySpec) -> Self {
        self.queries.insert(query.name.clone(), query);
        self
    }

    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    /// Parse a wire-format body (`{"queries": {...}}`), restoring query names from the keys
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let mut request: MatchRequest = serde_json::from_str(body)?;
        for (name, query) in request.queries.iter_mut() {
            query.name = name.clone();
        }
        Ok(request)
    }

    pub fn query_names(&self) -> impl Iterator<Item = &str> {
        self.queries.keys().map(String::as_str)
    }
}
