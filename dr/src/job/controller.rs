//! JobController - submit a research job and poll it to a terminal state

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{JobHandle, JobState, PollAttempt, PollOutcome, ReportResult, SubmissionError, Trigger};
use crate::events::EventEmitter;
use crate::remote::RemoteService;

/// Owns the lifecycle of one remote research job
///
/// One job at a time, one request in flight at a time. The only suspension
/// point besides the remote calls is the fixed sleep between polls.
pub struct JobController {
    remote: Arc<dyn RemoteService>,
    agent: String,
    events: Option<EventEmitter>,
}

impl JobController {
    pub fn new(remote: Arc<dyn RemoteService>, agent: impl Into<String>) -> Self {
        let agent = agent.into();
        debug!(%agent, "JobController::new: called");
        Self {
            remote,
            agent,
            events: None,
        }
    }

    /// Attach an event emitter for progress reporting
    pub fn with_events(mut self, events: EventEmitter) -> Self {
        self.events = Some(events);
        self
    }

    /// Create the remote job in background mode
    ///
    /// Fails without retry if the call errors or no identifier comes back.
    pub async fn submit(&self, input: &str) -> Result<JobHandle, SubmissionError> {
        debug!(agent = %self.agent, input_len = input.len(), "submit: called");
        let interaction = self.remote.create_job(input, &self.agent, true).await?;
        let handle = JobHandle::from_interaction(&interaction)?;

        info!(job = %handle, "submit: research job started");
        if let Some(events) = &self.events {
            events.job_submitted(handle.id());
        }
        Ok(handle)
    }

    /// Poll a submitted job until it succeeds, fails, or exceeds `timeout`
    ///
    /// The deadline is checked before every sleep-and-fetch cycle, so no fetch
    /// starts later than `timeout + poll_interval` after polling began.
    pub async fn run(&self, handle: &JobHandle, poll_interval: Duration, timeout: Duration) -> ReportResult {
        debug!(job = %handle, ?poll_interval, ?timeout, "run: called");
        let started = Instant::now();
        let mut state = JobState::Created.next(Trigger::Start);
        let mut attempt = 0u32;

        let result = loop {
            state = match state {
                JobState::Succeeded(report) => break ReportResult::Succeeded(report),
                JobState::Failed(failure) => break ReportResult::Failed(failure),
                JobState::TimedOut => break ReportResult::TimedOut,
                active => {
                    if started.elapsed() > timeout {
                        warn!(job = %handle, ?timeout, attempts = attempt, "run: research timed out");
                        active.next(Trigger::DeadlineExceeded)
                    } else {
                        tokio::time::sleep(poll_interval).await;
                        attempt += 1;

                        let fetched = self.remote.get_job(handle.id()).await;
                        let poll = PollAttempt {
                            attempt,
                            elapsed: started.elapsed(),
                            outcome: PollOutcome::classify(fetched),
                        };
                        self.observe(handle, &poll);
                        active.next(Trigger::Polled(poll.outcome))
                    }
                }
            };
        };

        let elapsed = started.elapsed();
        info!(job = %handle, outcome = result.label(), ?elapsed, attempts = attempt, "run: finished");
        if let Some(events) = &self.events {
            events.job_finished(handle.id(), result.label(), elapsed.as_millis() as u64);
        }
        result
    }

    /// Submit `input` and poll the resulting job to completion
    pub async fn submit_and_run(
        &self,
        input: &str,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<ReportResult, SubmissionError> {
        let handle = self.submit(input).await?;
        Ok(self.run(&handle, poll_interval, timeout).await)
    }

    fn observe(&self, handle: &JobHandle, poll: &PollAttempt) {
        let elapsed_ms = poll.elapsed.as_millis() as u64;
        match &poll.outcome {
            PollOutcome::TransientError(message) => {
                warn!(job = %handle, attempt = poll.attempt, %message, "observe: retrying after error");
                if let Some(events) = &self.events {
                    events.transient_poll_error(handle.id(), poll.attempt, message);
                }
            }
            PollOutcome::FatalError { status, message } => {
                warn!(job = %handle, %status, %message, "observe: fatal API error, stopping");
            }
            outcome => {
                debug!(job = %handle, attempt = poll.attempt, elapsed_ms, outcome = outcome.label(), "observe: polled");
            }
        }
        if let Some(events) = &self.events {
            events.poll_attempt(handle.id(), poll.attempt, elapsed_ms, poll.outcome.label());
        }
    }
}
