//! Event types for research progress streaming

use serde::{Deserialize, Serialize};

/// Everything observable about a research run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResearchEvent {
    // === Planning ===
    /// The primary model was unavailable and the next model is being tried
    PlanModelFallback {
        from_model: String,
        to_model: String,
        reason: String,
    },
    /// A plan was produced
    PlanGenerated { model: String },
    /// Plan generation failed entirely; the raw topic stands in for the plan
    PlanFallbackToTopic { reason: String },

    // === Job lifecycle ===
    /// The remote job was created
    JobSubmitted { job_id: String },
    /// One poll round-trip finished
    PollAttempt {
        job_id: String,
        attempt: u32,
        elapsed_ms: u64,
        outcome: String,
    },
    /// A poll failed in a way that will be retried
    TransientPollError {
        job_id: String,
        attempt: u32,
        message: String,
    },
    /// The job reached a terminal state
    JobFinished {
        job_id: String,
        outcome: String,
        elapsed_ms: u64,
    },
}

impl ResearchEvent {
    /// Get the event type name for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            ResearchEvent::PlanModelFallback { .. } => "PlanModelFallback",
            ResearchEvent::PlanGenerated { .. } => "PlanGenerated",
            ResearchEvent::PlanFallbackToTopic { .. } => "PlanFallbackToTopic",
            ResearchEvent::JobSubmitted { .. } => "JobSubmitted",
            ResearchEvent::PollAttempt { .. } => "PollAttempt",
            ResearchEvent::TransientPollError { .. } => "TransientPollError",
            ResearchEvent::JobFinished { .. } => "JobFinished",
        }
    }

    /// Job the event belongs to, if it is part of the job lifecycle
    pub fn job_id(&self) -> Option<&str> {
        match self {
            ResearchEvent::JobSubmitted { job_id }
            | ResearchEvent::PollAttempt { job_id, .. }
            | ResearchEvent::TransientPollError { job_id, .. }
            | ResearchEvent::JobFinished { job_id, .. } => Some(job_id.as_str()),
            ResearchEvent::PlanModelFallback { .. }
            | ResearchEvent::PlanGenerated { .. }
            | ResearchEvent::PlanFallbackToTopic { .. } => None,
        }
    }

    /// Whether this event signals degraded behaviour worth showing the user
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            ResearchEvent::PlanModelFallback { .. }
                | ResearchEvent::PlanFallbackToTopic { .. }
                | ResearchEvent::TransientPollError { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = ResearchEvent::JobSubmitted {
            job_id: "abc123".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "JobSubmitted");
        assert_eq!(json["job_id"], "abc123");

        let back: ResearchEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_job_id_and_warning() {
        let fallback = ResearchEvent::PlanModelFallback {
            from_model: "a".to_string(),
            to_model: "b".to_string(),
            reason: "404".to_string(),
        };
        assert_eq!(fallback.job_id(), None);
        assert!(fallback.is_warning());

        let poll = ResearchEvent::PollAttempt {
            job_id: "j".to_string(),
            attempt: 1,
            elapsed_ms: 10,
            outcome: "pending".to_string(),
        };
        assert_eq!(poll.job_id(), Some("j"));
        assert!(!poll.is_warning());
        assert_eq!(poll.event_type(), "PollAttempt");
    }
}
