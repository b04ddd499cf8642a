//! Gemini API client implementation
//!
//! Implements the RemoteService trait over the Interactions API (research
//! jobs) and the generateContent endpoint (plan generation). Every request
//! carries the `x-goog-api-key` header.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{CreateInteraction, Interaction, RemoteError, RemoteService, resource_id};
use crate::config::ServiceConfig;

/// Gemini API client
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    /// Create a new client with an explicit key
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let http = Client::builder().timeout(timeout).build().map_err(RemoteError::Network)?;
        let base_url: String = base_url.into();

        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Create a new client from service configuration
    ///
    /// Fails when the credential cannot be resolved.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, RemoteError> {
        debug!(base_url = %config.base_url, "from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| RemoteError::MissingCredential(e.to_string()))?;

        Self::new(api_key, config.base_url.clone(), Duration::from_millis(config.timeout_ms))
    }

    fn interactions_url(&self) -> String {
        format!("{}/v1beta/interactions", self.base_url)
    }

    fn interaction_url(&self, identifier: &str) -> String {
        format!("{}/{}", self.interactions_url(), resource_id(identifier))
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    fn build_generate_body(prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        })
    }

    /// Attach auth headers, send, and turn non-2xx responses into `RemoteError::Api`
    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Response, RemoteError> {
        let response = request
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(%status, %action, "send: API error");
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message: format!(
                    "Failed to {}: {} {} - {}",
                    action,
                    status.as_u16(),
                    status.canonical_reason().unwrap_or(""),
                    text
                ),
            });
        }

        Ok(response)
    }
}

/// Pull the first text part of the first candidate
fn extract_text(response: GenerateContentResponse, model: &str) -> Result<String, RemoteError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| RemoteError::Api {
            // An empty answer counts as a server-side failure so the model chain can fall back
            status: 500,
            message: format!("No content in response from {}", model),
        })
}

#[async_trait]
impl RemoteService for GeminiClient {
    async fn create_job(&self, input: &str, agent: &str, background: bool) -> Result<Interaction, RemoteError> {
        debug!(%agent, background, input_len = input.len(), "create_job: called");
        let body = CreateInteraction {
            input,
            agent,
            background,
        };

        let response = self
            .send(self.http.post(self.interactions_url()).json(&body), "create interaction")
            .await?;

        let interaction: Interaction = response.json().await?;
        debug!(name = ?interaction.name, id = ?interaction.id, "create_job: success");
        Ok(interaction)
    }

    async fn get_job(&self, identifier: &str) -> Result<Interaction, RemoteError> {
        debug!(%identifier, "get_job: called");
        let response = self
            .send(self.http.get(self.interaction_url(identifier)), "get interaction")
            .await?;

        let interaction: Interaction = response.json().await?;
        debug!(status = ?interaction.status, "get_job: success");
        Ok(interaction)
    }

    async fn generate_text(&self, prompt: &str, model: &str) -> Result<String, RemoteError> {
        debug!(%model, prompt_len = prompt.len(), "generate_text: called");
        let body = Self::build_generate_body(prompt);
        let action = format!("generate content with {}", model);

        let response = self.send(self.http.post(self.generate_url(model)).json(&body), &action).await?;

        let data: GenerateContentResponse = response.json().await?;
        extract_text(data, model)
    }
}

// API response types

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}
