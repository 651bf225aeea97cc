//! Hunter.io domain search.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{CollaboratorError, CollaboratorResult};
use crate::security::{ExposeSecret, SecretString};
use crate::traits::directory::{DirectoryContact, DirectoryLookup};

pub const HUNTER_API_URL: &str = "https://api.hunter.io";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct DomainSearchResponse {
    data: DomainSearchData,
}

#[derive(Debug, Deserialize)]
struct DomainSearchData {
    #[serde(default)]
    emails: Vec<HunterEmail>,
}

#[derive(Debug, Deserialize)]
struct HunterEmail {
    value: Option<String>,
    confidence: Option<u32>,
}

/// [`DirectoryLookup`] over Hunter's `/v2/domain-search`.
#[derive(Clone)]
pub struct HunterClient {
    http_client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl HunterClient {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
            base_url: HUNTER_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl DirectoryLookup for HunterClient {
    async fn domain_search(&self, domain: &str) -> CollaboratorResult<Vec<DirectoryContact>> {
        let response = self
            .http_client
            .get(format!("{}/v2/domain-search", self.base_url))
            .query(&[("domain", domain), ("api_key", self.api_key.expose_secret())])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                warn!(domain, error = %e, "Hunter request failed");
                if e.is_timeout() {
                    CollaboratorError::Timeout(REQUEST_TIMEOUT)
                } else {
                    CollaboratorError::from(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(domain, status = %status, "Hunter API error");
            return Err(CollaboratorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: DomainSearchResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Parse(e.to_string()))?;

        let contacts: Vec<DirectoryContact> = body
            .data
            .emails
            .into_iter()
            .filter_map(|e| {
                let value = e.value?;
                let confidence = e.confidence.unwrap_or(0).min(100) as u8;
                Some(DirectoryContact { value, confidence })
            })
            .collect();

        debug!(domain, contacts = contacts.len(), "Hunter domain search");
        Ok(contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HunterClient {
        HunterClient::new(SecretString::from("h-key")).with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_domain_search_maps_contacts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/domain-search"))
            .and(query_param("domain", "acme.com"))
            .and(query_param("api_key", "h-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"domain": "acme.com", "emails": [
                    {"value": "jane@acme.com", "confidence": 94, "type": "personal"},
                    {"value": "info@acme.com", "confidence": null},
                    {"value": null, "confidence": 50}
                ]},
                "meta": {"results": 3}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let contacts = client(&server).domain_search("acme.com").await.unwrap();
        assert_eq!(
            contacts,
            vec![
                DirectoryContact::new("jane@acme.com", 94),
                DirectoryContact::new("info@acme.com", 0),
            ]
        );
    }

    #[tokio::test]
    async fn test_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let err = client(&server).domain_search("acme.com").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Api { status: 401, ref message } if message == "invalid key"));
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errors": []})))
            .mount(&server)
            .await;

        let err = client(&server).domain_search("acme.com").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Parse(_)));
    }
}
