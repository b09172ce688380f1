use crate::config::ApiSettings;
use crate::core::{parse_response, ProtocolError};
use crate::models::{MatchRequest, MatchResponse};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur when calling the match API
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP error {status} {reason}: {body}")]
    HttpStatus {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Invalid response format: {0}")]
    Protocol(#[from] ProtocolError),
}

impl From<reqwest::Error> for MatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MatchError::Timeout
        } else {
            MatchError::Transport(err)
        }
    }
}

/// Client for the entity match API
///
/// Each call to [`MatchClient::match_entities`] issues exactly one POST to
/// `<endpoint>/match/<profile>`. Cloning is cheap and clones share the
/// connection pool.
#[derive(Clone)]
pub struct MatchClient {
    endpoint: String,
    profile: String,
    api_key: String,
    client: Client,
}

impl std::fmt::Debug for MatchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchClient")
            .field("endpoint", &self.endpoint)
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

impl MatchClient {
    /// Create a new match client
    pub fn new(
        endpoint: String,
        profile: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, MatchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(MatchError::Transport)?;

        Ok(Self {
            endpoint,
            profile,
            api_key,
            client,
        })
    }

    pub fn from_settings(settings: &ApiSettings) -> Result<Self, MatchError> {
        Self::new(
            settings.endpoint.clone(),
            settings.profile.clone(),
            settings.api_key.clone().unwrap_or_default(),
            Duration::from_secs(settings.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        )
    }

    /// Full URL for a request, including the algorithm parameter when set
    pub fn url(&self, algorithm: Option<&str>) -> String {
        let mut url = format!(
            "{}/match/{}",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(&self.profile)
        );

        if let Some(algorithm) = algorithm {
            url.push_str("?algorithm=");
            url.push_str(&urlencoding::encode(algorithm));
        }

        url
    }

    /// Run every query of `request` against the match API in a single call
    ///
    /// The returned response has exactly one entry per submitted query name,
    /// in which the service's ranking order is preserved.
    pub async fn match_entities(&self, request: &MatchRequest) -> Result<MatchResponse, MatchError> {
        if self.api_key.trim().is_empty() {
            return Err(MatchError::Configuration(
                "API key is not set (ENTITY_MATCH__API__API_KEY or OS_API_KEY)".to_string(),
            ));
        }

        check_request(request)?;

        let url = self.url(request.algorithm.as_deref());

        tracing::debug!("Submitting {} queries to: {}", request.queries.len(), url);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("Match request failed: {} - {}", status, body);
            return Err(MatchError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let body = response.bytes().await?;
        let matches = parse_response(&body, request.query_names())?;

        tracing::debug!(
            "Received {} results for {} queries",
            matches.total_results(),
            matches.results_by_query.len()
        );

        Ok(matches)
    }
}

/// Presence checks only; the service does the real schema validation
fn check_request(request: &MatchRequest) -> Result<(), MatchError> {
    if request.queries.is_empty() {
        return Err(MatchError::InvalidRequest("no queries given".to_string()));
    }

    for (name, query) in &request.queries {
        query
            .validate()
            .map_err(|e| MatchError::InvalidRequest(format!("query {}: {}", name, e)))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuerySpec;

    fn client(api_key: &str) -> MatchClient {
        MatchClient::new(
            "https://api.opensanctions.test/".to_string(),
            "default".to_string(),
            api_key.to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_url_without_algorithm() {
        assert_eq!(
            client("key").url(None),
            "https://api.opensanctions.test/match/default"
        );
    }

    #[test]
    fn test_url_encodes_algorithm() {
        assert_eq!(
            client("key").url(Some("regression v1")),
            "https://api.opensanctions.test/match/default?algorithm=regression%20v1"
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let debug = format!("{:?}", client("secret-key"));
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn test_check_request_rejects_empty() {
        let err = check_request(&MatchRequest::new()).unwrap_err();
        assert!(matches!(err, MatchError::InvalidRequest(_)));
    }

    #[test]
    fn test_check_request_rejects_query_without_values() {
        let request = MatchRequest::new().with_query(QuerySpec::new("q1", "Person"));
        let err = check_request(&request).unwrap_err();
        assert!(err.to_string().contains("q1"));
    }

    #[tokio::test]
    async fn test_blank_api_key_is_configuration_error() {
        let request = MatchRequest::new()
            .with_query(QuerySpec::new("q1", "Person").property("name", ["Barack Obama"]));

        let err = client("   ").match_entities(&request).await.unwrap_err();

        assert!(matches!(err, MatchError::Configuration(_)));
    }
}
