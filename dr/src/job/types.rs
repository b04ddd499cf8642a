//! Job handle, terminal results and submission errors

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::remote::{Interaction, RemoteError, resource_id};

/// A submitted job, addressable for polling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    /// Bare identifier used for every lookup
    id: String,
    /// Full resource name as returned at creation, if the service sent one
    resource_name: Option<String>,
}

impl JobHandle {
    /// Build a handle from a creation response
    ///
    /// Prefers the resource name over the bare id; only the last path segment
    /// is kept as the identifier.
    pub fn from_interaction(interaction: &Interaction) -> Result<Self, SubmissionError> {
        let identifier = interaction.identifier().ok_or(SubmissionError::MissingIdentifier)?;
        debug!(%identifier, "JobHandle::from_interaction: extracted identifier");

        let id = resource_id(identifier);
        if id.is_empty() {
            return Err(SubmissionError::MissingIdentifier);
        }

        Ok(Self {
            id: id.to_string(),
            resource_name: identifier.contains('/').then(|| identifier.to_string()),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource_name {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Job creation failed; terminal, never retried
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Failed to create interaction: {0}")]
    Remote(#[from] RemoteError),

    #[error("No interaction ID returned")]
    MissingIdentifier,
}

/// Why a job ended without a report
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JobFailure {
    /// The service reported the job itself as failed
    #[error("Research failed: {0}")]
    Remote(serde_json::Value),

    /// Polling hit a client-class error that will not resolve on retry
    #[error("Fatal API error ({status}): {message}")]
    Fatal { status: u16, message: String },
}

/// Terminal outcome of running a job
#[derive(Debug, Clone, PartialEq)]
pub enum ReportResult {
    /// Final report text, possibly empty
    Succeeded(String),
    Failed(JobFailure),
    TimedOut,
}

impl ReportResult {
    /// Short label for logs and events
    pub fn label(&self) -> &'static str {
        match self {
            ReportResult::Succeeded(_) => "succeeded",
            ReportResult::Failed(_) => "failed",
            ReportResult::TimedOut => "timed_out",
        }
    }

    pub fn report(&self) -> Option<&str> {
        match self {
            ReportResult::Succeeded(report) => Some(report.as_str()),
            ReportResult::Failed(_) | ReportResult::TimedOut => None,
        }
    }
}
