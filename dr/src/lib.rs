//! deepresearch - drive a Gemini Deep Research job from topic to report
//!
//! The flow is linear: a topic becomes a research plan, the plan is submitted
//! as a background interaction, the interaction is polled until it completes,
//! fails, or runs out of time, and the final report is written to disk.
//!
//! # Modules
//!
//! - [`remote`] - `RemoteService` trait and the Gemini HTTP client
//! - [`planning`] - plan generation with model fallback
//! - [`job`] - submit/poll lifecycle and its state machine
//! - [`events`] - progress events for the CLI
//! - [`report`] - report file naming and persistence
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod events;
pub mod job;
pub mod planning;
pub mod remote;
pub mod report;

// Re-export commonly used types
pub use config::{Config, PlanConfig, PollConfig, ReportConfig, ServiceConfig};
pub use events::{EventBus, EventEmitter, ResearchEvent};
pub use job::{
    JobController, JobFailure, JobHandle, JobState, PollAttempt, PollOutcome, ReportResult, SubmissionError,
    research_input,
};
pub use planning::PlanGenerator;
pub use remote::{GeminiClient, Interaction, InteractionOutput, JobStatus, RemoteError, RemoteService, create_service};
pub use report::{ReportError, save_report, slugify};
