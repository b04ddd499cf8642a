//! Wire types for the Interactions API
//!
//! The service is loose about field presence and casing, so every field is
//! optional and status strings are compared case-insensitively.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// An interaction (research job) as returned by the remote service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Resource name, e.g. "interactions/abc123"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Bare interaction ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// "in_progress", "completed", "failed" in any casing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Opaque error payload, only meaningful when the job failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<InteractionOutput>>,
}

impl Interaction {
    /// Identifier for subsequent lookups: resource name first, then bare id
    pub fn identifier(&self) -> Option<&str> {
        debug!(name = ?self.name, id = ?self.id, "Interaction::identifier: called");
        non_empty(&self.name).or_else(|| non_empty(&self.id))
    }

    /// Parsed job status
    pub fn job_status(&self) -> JobStatus {
        JobStatus::parse(self.status.as_deref())
    }

    /// Text of the last output, or an empty string when there are none
    pub fn final_report(&self) -> String {
        self.outputs
            .as_ref()
            .and_then(|outputs| outputs.last())
            .map(|output| output.text.clone())
            .unwrap_or_default()
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

/// A single output item appended by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionOutput {
    #[serde(default)]
    pub text: String,
}

impl InteractionOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Body of a create-interaction request
#[derive(Debug, Clone, Serialize)]
pub struct CreateInteraction<'a> {
    pub input: &'a str,
    pub agent: &'a str,
    pub background: bool,
}

/// Lifecycle status of a remote job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
}

impl JobStatus {
    /// Parse a status string; anything unrecognised is still pending
    pub fn parse(status: Option<&str>) -> Self {
        match status {
            Some(s) if s.eq_ignore_ascii_case("completed") => JobStatus::Completed,
            Some(s) if s.eq_ignore_ascii_case("failed") => JobStatus::Failed,
            _ => JobStatus::Pending,
        }
    }
}

/// Extract the bare identifier from either an ID or a slash-delimited resource path
pub fn resource_id(identifier: &str) -> &str {
    identifier.rsplit('/').next().unwrap_or(identifier)
}
