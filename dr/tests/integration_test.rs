//! Integration tests for deepresearch
//!
//! These drive the public API end to end against an in-memory remote service.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use deepresearch::events::{EventBus, ResearchEvent};
use deepresearch::job::{JobController, JobFailure, ReportResult, SubmissionError, research_input};
use deepresearch::planning::PlanGenerator;
use deepresearch::remote::{Interaction, InteractionOutput, RemoteError, RemoteService};
use deepresearch::report::save_report;
use tempfile::TempDir;

/// In-memory stand-in for the Gemini service
#[derive(Default)]
struct FakeService {
    created: Option<Interaction>,
    polls: Mutex<VecDeque<Result<Interaction, RemoteError>>>,
    generations: Mutex<VecDeque<Result<String, RemoteError>>>,
    lookups: Mutex<Vec<String>>,
    inputs: Mutex<Vec<String>>,
    models: Mutex<Vec<String>>,
}

impl FakeService {
    fn created(mut self, interaction: Interaction) -> Self {
        self.created = Some(interaction);
        self
    }

    fn poll(self, response: Result<Interaction, RemoteError>) -> Self {
        self.polls.lock().unwrap().push_back(response);
        self
    }

    fn generation(self, response: Result<String, RemoteError>) -> Self {
        self.generations.lock().unwrap().push_back(response);
        self
    }
}

#[async_trait]
impl RemoteService for FakeService {
    async fn create_job(&self, input: &str, _agent: &str, _background: bool) -> Result<Interaction, RemoteError> {
        self.inputs.lock().unwrap().push(input.to_string());
        self.created
            .clone()
            .ok_or_else(|| RemoteError::Api {
                status: 500,
                message: "create failed".to_string(),
            })
    }

    async fn get_job(&self, identifier: &str) -> Result<Interaction, RemoteError> {
        self.lookups.lock().unwrap().push(identifier.to_string());
        self.polls.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(RemoteError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        })
    }

    async fn generate_text(&self, _prompt: &str, model: &str) -> Result<String, RemoteError> {
        self.models.lock().unwrap().push(model.to_string());
        self.generations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::InvalidResponse("exhausted".to_string())))
    }
}

fn api_error(status: u16) -> RemoteError {
    RemoteError::Api {
        status,
        message: format!("HTTP {}", status),
    }
}

fn with_status(status: &str) -> Interaction {
    Interaction {
        status: Some(status.to_string()),
        ..Default::default()
    }
}

// =============================================================================
// Full flow
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_topic_to_saved_report() {
    let service = Arc::new(
        FakeService::default()
            .generation(Err(api_error(404)))
            .generation(Ok("1. History\n2. Open problems".to_string()))
            .created(Interaction {
                name: Some("interactions/abc123".to_string()),
                ..Default::default()
            })
            .poll(Ok(with_status("in_progress")))
            .poll(Err(api_error(502)))
            .poll(Ok(Interaction {
                status: Some("completed".to_string()),
                outputs: Some(vec![InteractionOutput::text("draft"), InteractionOutput::text("# Final")]),
                ..Default::default()
            })),
    );

    let bus = EventBus::with_default_capacity();
    let mut rx = bus.subscribe();

    let generator =
        PlanGenerator::new(service.clone(), "gemini-3-flash-preview", "gemini-2.0-flash").with_events(bus.emitter());
    let plan = generator.generate_plan("Fermat's last theorem").await;
    assert_eq!(plan, "1. History\n2. Open problems");

    let controller = JobController::new(service.clone(), "deep-research-pro-preview-12-2025").with_events(bus.emitter());
    let result = controller
        .submit_and_run(&research_input(&plan), Duration::from_secs(10), Duration::from_secs(3600))
        .await
        .expect("submission should succeed");
    assert_eq!(result, ReportResult::Succeeded("# Final".to_string()));

    assert_eq!(
        service.inputs.lock().unwrap().clone(),
        vec!["Execute the following research plan:\n\n1. History\n2. Open problems".to_string()]
    );
    assert_eq!(service.lookups.lock().unwrap().clone(), vec!["abc123"; 3]);
    assert_eq!(
        service.models.lock().unwrap().clone(),
        vec!["gemini-3-flash-preview", "gemini-2.0-flash"]
    );

    let mut kinds = Vec::new();
    while let Ok(event) = rx.try_recv() {
        kinds.push(event.event_type());
    }
    assert_eq!(
        kinds,
        vec![
            "PlanModelFallback",
            "PlanGenerated",
            "JobSubmitted",
            "PollAttempt",
            "TransientPollError",
            "PollAttempt",
            "PollAttempt",
            "JobFinished",
        ]
    );

    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = save_report(dir.path(), "Fermat's last theorem", result.report().unwrap(), 50).unwrap();
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("report-fermat-s-last-theorem-"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "# Final");
}

#[tokio::test]
async fn test_plan_generation_never_fails() {
    let service = Arc::new(
        FakeService::default()
            .generation(Err(api_error(500)))
            .generation(Err(api_error(404))),
    );
    let bus = EventBus::with_default_capacity();
    let mut rx = bus.subscribe();
    let generator = PlanGenerator::new(service.clone(), "primary", "secondary").with_events(bus.emitter());

    let plan = generator.generate_plan(r#"a "quoted" topic"#).await;

    assert_eq!(plan, r#"a "quoted" topic"#);
    assert_eq!(service.models.lock().unwrap().len(), 2);
    let last = std::iter::from_fn(|| rx.try_recv().ok()).last();
    assert!(matches!(last, Some(ResearchEvent::PlanFallbackToTopic { .. })));
}

// =============================================================================
// Terminal failures
// =============================================================================

#[tokio::test]
async fn test_submission_without_identifier() {
    let service = Arc::new(FakeService::default().created(with_status("in_progress")));
    let controller = JobController::new(service.clone(), "agent");

    let result = controller
        .submit_and_run("input", Duration::from_millis(1), Duration::from_millis(10))
        .await;

    assert!(matches!(result, Err(SubmissionError::MissingIdentifier)));
    assert!(service.lookups.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_submission_remote_error() {
    let service = Arc::new(FakeService::default());
    let controller = JobController::new(service, "agent");

    let err = controller.submit("input").await.unwrap_err();
    assert!(matches!(err, SubmissionError::Remote(_)));
    assert!(err.to_string().contains("create failed"));
}

#[tokio::test(start_paused = true)]
async fn test_client_error_stops_polling() {
    let service = Arc::new(
        FakeService::default()
            .created(Interaction {
                id: Some("bare-id".to_string()),
                ..Default::default()
            })
            .poll(Err(api_error(403))),
    );
    let controller = JobController::new(service.clone(), "agent");

    let result = controller
        .submit_and_run("input", Duration::from_secs(10), Duration::from_secs(3600))
        .await
        .unwrap();

    assert!(matches!(result, ReportResult::Failed(JobFailure::Fatal { status: 403, .. })));
    assert_eq!(service.lookups.lock().unwrap().clone(), vec!["bare-id"]);
}

#[tokio::test(start_paused = true)]
async fn test_persistent_server_errors_time_out() {
    let service = Arc::new(FakeService::default().created(Interaction {
        id: Some("slow".to_string()),
        ..Default::default()
    }));
    let controller = JobController::new(service.clone(), "agent");

    let result = controller
        .submit_and_run("input", Duration::from_secs(30), Duration::from_secs(120))
        .await
        .unwrap();

    assert_eq!(result, ReportResult::TimedOut);
    // checks at 0, 30, 60, 90, 120 pass; the check at 150 times out
    assert_eq!(service.lookups.lock().unwrap().len(), 5);
}
