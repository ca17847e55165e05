//! HTTP client for the class list endpoint

use serde_json::Value;
use thiserror::Error;

use super::{records_from_payload, ClassRecord};

/// Default class data endpoint
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";

/// Errors fetching the class list. Never shown to the user verbatim.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of records")]
    UnexpectedShape,
}

/// Fetches class records from a fixed endpoint
#[derive(Debug, Clone)]
pub struct ClassesClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ClassesClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Issue one GET and map the response into records
    pub async fn fetch(&self) -> Result<Vec<ClassRecord>, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, "Fetching classes");

        let response = self.http.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&body)?;
        let records = records_from_payload(&payload)?;

        tracing::info!(count = records.len(), "Classes loaded");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ClassesClient {
        ClassesClient::new(format!("{}/users", server.uri()))
    }

    #[tokio::test]
    async fn test_fetch_maps_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "name": "Leanne Graham",
                  "company": { "name": "Romaguera-Crona" },
                  "address": { "suite": "Apt. 556" } },
                { "id": 2, "name": "Ervin Howell" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let records = client_for(&server).await.fetch().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].teacher, "Romaguera-Crona");
        assert_eq!(records[1].id, "U-2");
        assert_eq!(records[1].room, "Unknown Room");
    }

    #[tokio::test]
    async fn test_fetch_empty_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let records = client_for(&server).await.fetch().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Status(500)));
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Json(_)));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        let client = ClassesClient::new("http://127.0.0.1:9/users");
        let err = client.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}
