//! Remote service module
//!
//! The `RemoteService` capability plus its Gemini implementation.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;
mod types;

pub use client::RemoteService;
pub use error::RemoteError;
pub use gemini::GeminiClient;
pub use types::{CreateInteraction, Interaction, InteractionOutput, JobStatus, resource_id};

use crate::config::ServiceConfig;

/// Create the remote service client from configuration
pub fn create_service(config: &ServiceConfig) -> Result<Arc<dyn RemoteService>, RemoteError> {
    debug!(base_url = %config.base_url, "create_service: called");
    Ok(Arc::new(GeminiClient::from_config(config)?))
}
