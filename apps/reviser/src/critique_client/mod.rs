/// Critique client — the single point of entry for calls to the critique service.
///
/// No other module talks to the service directly; the session goes through the
/// `CritiqueService` trait so tests and embedders can swap the transport.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const REVISE_PATH: &str = "/api/revise";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Critique service error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Undecodable critique response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct ReviseRequest<'a> {
    job_description: &'a str,
    essay_text: &'a str,
}

/// Successful response body of `POST /api/revise`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CritiqueResponse {
    /// JSON-encoded feedback document; opaque at this layer.
    pub feedback_result: String,
    pub cheer_message: String,
    pub feedback_rewrite: String,
}

/// Anything that can turn an essay and job description into a critique.
#[async_trait]
pub trait CritiqueService: Send + Sync {
    async fn revise(
        &self,
        essay_text: &str,
        job_description: &str,
    ) -> Result<CritiqueResponse, TransportError>;
}

/// HTTP implementation of [`CritiqueService`].
#[derive(Clone)]
pub struct CritiqueClient {
    client: Client,
    base_url: String,
}

impl CritiqueClient {
    /// `timeout = None` leaves requests unbounded; a hung service keeps the
    /// session submitting.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, REVISE_PATH)
    }
}

#[async_trait]
impl CritiqueService for CritiqueClient {
    async fn revise(
        &self,
        essay_text: &str,
        job_description: &str,
    ) -> Result<CritiqueResponse, TransportError> {
        let request_body = ReviseRequest {
            job_description,
            essay_text,
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Critique service returned {}: {}", status, body);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let critique: CritiqueResponse = serde_json::from_str(&body)?;
        debug!(
            "Critique received: rewrite_len={}, feedback_len={}",
            critique.feedback_rewrite.len(),
            critique.feedback_result.len()
        );

        Ok(critique)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ok_body() -> serde_json::Value {
        json!({
            "feedback_result": "{\"score\":85}",
            "cheer_message": "Good job",
            "feedback_rewrite": "Revised essay text"
        })
    }

    #[test]
    fn test_strips_trailing_slash() {
        let client = CritiqueClient::new("https://example.com/", None).unwrap();
        assert_eq!(client.endpoint(), "https://example.com/api/revise");
    }

    #[test]
    fn test_request_serializes_with_wire_names() {
        let req = ReviseRequest {
            job_description: "backend role",
            essay_text: "my essay",
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({"job_description": "backend role", "essay_text": "my essay"})
        );
    }

    #[tokio::test]
    async fn test_posts_body_and_decodes_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/revise"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "job_description": "backend role",
                "essay_text": "my essay"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = CritiqueClient::new(&server.uri(), None).unwrap();
        let critique = client.revise("my essay", "backend role").await.unwrap();
        assert_eq!(critique.cheer_message, "Good job");
        assert_eq!(critique.feedback_rewrite, "Revised essay text");
        assert_eq!(critique.feedback_result, "{\"score\":85}");
    }

    #[tokio::test]
    async fn test_non_2xx_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/revise"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client = CritiqueClient::new(&server.uri(), None).unwrap();
        let err = client.revise("my essay", "backend role").await.unwrap_err();
        match err {
            TransportError::Status { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "upstream down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_success_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/revise"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = CritiqueClient::new(&server.uri(), None).unwrap();
        let err = client.revise("my essay", "backend role").await.unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_http_error() {
        // Port 9 (discard) on localhost is not expected to accept connections.
        let client = CritiqueClient::new("http://127.0.0.1:9", None).unwrap();
        let err = client.revise("my essay", "backend role").await.unwrap_err();
        assert!(matches!(err, TransportError::Http(_)));
    }
}
