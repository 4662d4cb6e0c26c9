//! HTTP client for the evaluation service
//!
//! Posts evaluation requests to the external scoring API with bearer auth.
//! The service scores asynchronously; a successful submission only means the
//! request was accepted.

use crate::eval::{EvalError, EvaluationRequest, Evaluator};
use async_trait::async_trait;

/// Evaluation service client
#[derive(Debug, Clone)]
pub struct HttpEvaluator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl HttpEvaluator {
    /// Create a client for the given base URL
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client (connection pooling)
    /// * `api_key` - Bearer token for the evaluation service
    /// * `base_url` - Service base URL
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Evaluator for HttpEvaluator {
    async fn submit(&self, request: EvaluationRequest) -> Result<(), EvalError> {
        let url = format!("{}/v1/evaluations", self.base_url);

        tracing::debug!(
            url = %url,
            input = %request.input,
            num_scorers = request.scorers.len(),
            "Submitting evaluation request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(EvalError::Api {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Evaluation request accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::ScorerConfig;
    use mockito::{Matcher, Server};
    use serial_test::serial;

    fn request() -> EvaluationRequest {
        EvaluationRequest {
            input: "Why is Nvidia stock outperforming AMD?".to_string(),
            actual_output: "Report text".to_string(),
            scorers: vec![ScorerConfig::answer_relevancy(0.7)],
            model: "gpt-4o".to_string(),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_submit_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/evaluations")
            .match_header("authorization", "Bearer jl-test")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "input": "Why is Nvidia stock outperforming AMD?",
                "model": "gpt-4o",
                "scorers": [{"kind": "answer_relevancy", "threshold": 0.7}]
            })))
            .with_status(202)
            .with_body(r#"{"status": "accepted"}"#)
            .create_async()
            .await;

        let evaluator = HttpEvaluator::new(reqwest::Client::new(), "jl-test", server.url());
        let result = evaluator.submit(request()).await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn test_submit_service_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/evaluations")
            .with_status(500)
            .with_body(r#"{"error": "internal"}"#)
            .create_async()
            .await;

        let evaluator = HttpEvaluator::new(reqwest::Client::new(), "jl-test", server.url());
        let result = evaluator.submit(request()).await;

        mock.assert_async().await;
        match result {
            Err(EvalError::Api { status, .. }) => assert_eq!(status, 500),
            other => panic!("Expected Api error, got: {:?}", other),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_submit_auth_rejected() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/evaluations")
            .with_status(401)
            .with_body(r#"{"error": "invalid key"}"#)
            .create_async()
            .await;

        let evaluator = HttpEvaluator::new(reqwest::Client::new(), "wrong-key", server.url());
        let result = evaluator.submit(request()).await;

        mock.assert_async().await;
        match result {
            Err(EvalError::Api { status, .. }) => assert_eq!(status, 401),
            other => panic!("Expected Api error, got: {:?}", other),
        }
    }
}
