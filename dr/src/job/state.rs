//! Job lifecycle state machine
//!
//! ```text
//! Created --Start--> Polling --Polled(Completed)--> Succeeded
//!                      |  ^ --Polled(Failed|FatalError)--> Failed
//!                      |  |
//!                      +--+ Polled(Pending|TransientError)
//!                      |
//!                      +--DeadlineExceeded--> TimedOut
//! ```
//!
//! All transitions go through [`JobState::next`]; terminal states absorb
//! every further trigger.

use std::time::Duration;

use tracing::debug;

use super::JobFailure;
use crate::remote::{Interaction, JobStatus, RemoteError};

/// Classified result of one poll round-trip
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Job finished; carries the last output's text
    Completed(String),
    /// Job reported failure; carries the remote error payload
    Failed(serde_json::Value),
    /// Still running, or a status we do not recognise
    Pending,
    /// Fetch failed but may succeed next tick
    TransientError(String),
    /// Fetch failed with a client-class status
    FatalError { status: u16, message: String },
}

impl PollOutcome {
    /// Classify a fetch result
    pub fn classify(fetched: Result<Interaction, RemoteError>) -> Self {
        match fetched {
            Ok(interaction) => match interaction.job_status() {
                JobStatus::Completed => PollOutcome::Completed(interaction.final_report()),
                JobStatus::Failed => PollOutcome::Failed(
                    interaction
                        .error
                        .unwrap_or_else(|| serde_json::Value::String("Unknown error".to_string())),
                ),
                JobStatus::Pending => PollOutcome::Pending,
            },
            Err(e) if e.is_transient() => PollOutcome::TransientError(e.to_string()),
            Err(e) => PollOutcome::FatalError {
                status: e.status().unwrap_or_default(),
                message: e.to_string(),
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PollOutcome::Completed(_) => "completed",
            PollOutcome::Failed(_) => "failed",
            PollOutcome::Pending => "pending",
            PollOutcome::TransientError(_) => "transient_error",
            PollOutcome::FatalError { .. } => "fatal_error",
        }
    }
}

/// One poll round-trip, as observed by the controller
#[derive(Debug, Clone, PartialEq)]
pub struct PollAttempt {
    /// 1-based attempt number
    pub attempt: u32,
    /// Time since polling began, measured when the fetch resolved
    pub elapsed: Duration,
    pub outcome: PollOutcome,
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    Start,
    Polled(PollOutcome),
    DeadlineExceeded,
}

/// Lifecycle state of a single job
#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    Created,
    Polling { attempts: u32 },
    Succeeded(String),
    Failed(JobFailure),
    TimedOut,
}

impl JobState {
    /// The single transition function
    pub fn next(self, trigger: Trigger) -> JobState {
        if self.is_terminal() {
            debug!(state = self.name(), ?trigger, "JobState::next: terminal state absorbs trigger");
            return self;
        }
        match (self, trigger) {
            (JobState::Created, Trigger::Start) => JobState::Polling { attempts: 0 },
            (JobState::Polling { .. }, Trigger::DeadlineExceeded) => JobState::TimedOut,
            (JobState::Polling { attempts }, Trigger::Polled(outcome)) => match outcome {
                PollOutcome::Completed(report) => JobState::Succeeded(report),
                PollOutcome::Failed(payload) => JobState::Failed(JobFailure::Remote(payload)),
                PollOutcome::FatalError { status, message } => JobState::Failed(JobFailure::Fatal { status, message }),
                PollOutcome::Pending | PollOutcome::TransientError(_) => JobState::Polling { attempts: attempts + 1 },
            },
            (state, trigger) => {
                debug!(state = state.name(), ?trigger, "JobState::next: trigger ignored");
                state
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Succeeded(_) | JobState::Failed(_) | JobState::TimedOut)
    }

    pub fn name(&self) -> &'static str {
        match self {
            JobState::Created => "created",
            JobState::Polling { .. } => "polling",
            JobState::Succeeded(_) => "succeeded",
            JobState::Failed(_) => "failed",
            JobState::TimedOut => "timed_out",
        }
    }
}
