//! Asynchronous job lifecycle
//!
//! Submit a research job, poll it on a fixed interval under a wall-clock
//! budget, and reduce every ending to a [`ReportResult`].

mod controller;
mod state;
mod types;

pub use controller::JobController;
pub use state::{JobState, PollAttempt, PollOutcome, Trigger};
pub use types::{JobFailure, JobHandle, ReportResult, SubmissionError};

/// Wrap a plan as input for the research agent
pub fn research_input(plan: &str) -> String {
    format!("Execute the following research plan:\n\n{}", plan)
}
