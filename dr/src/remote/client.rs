//! RemoteService trait definition

use async_trait::async_trait;

use super::{Interaction, RemoteError};

/// Capability for talking to the remote generative-AI service
///
/// Calls never overlap: the job controller awaits each one before issuing the
/// next. Failures must carry the HTTP status where there is one so callers can
/// tell fatal from transient errors.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Create a research job running `agent` over `input`
    async fn create_job(&self, input: &str, agent: &str, background: bool) -> Result<Interaction, RemoteError>;

    /// Fetch the current state of a job by bare ID or resource path
    async fn get_job(&self, identifier: &str) -> Result<Interaction, RemoteError>;

    /// Single-shot text generation with a specific model
    async fn generate_text(&self, prompt: &str, model: &str) -> Result<String, RemoteError>;
}
