//! Event Bus - pub/sub for research progress
//!
//! The EventBus uses a tokio broadcast channel so the CLI (and tests) can watch
//! plan generation and polling without the core knowing who is listening.

use tokio::sync::broadcast;
use tracing::debug;

use super::types::ResearchEvent;

/// Default channel capacity (events)
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Central event bus for research activity
pub struct EventBus {
    tx: broadcast::Sender<ResearchEvent>,
}

impl EventBus {
    /// Create a new event bus with the given capacity
    pub fn new(capacity: usize) -> Self {
        debug!(capacity, "EventBus::new: creating event bus");
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Create a new event bus with default capacity
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Emit an event to all subscribers
    ///
    /// Fire-and-forget: with no subscribers the event is dropped.
    pub fn emit(&self, event: ResearchEvent) {
        debug!(event_type = event.event_type(), "EventBus::emit");
        let _ = self.tx.send(event);
    }

    /// Subscribe to events emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<ResearchEvent> {
        debug!("EventBus::subscribe: new subscriber");
        self.tx.subscribe()
    }

    /// Create an emitter handle for components that should not own the bus
    pub fn emitter(&self) -> EventEmitter {
        EventEmitter { tx: self.tx.clone() }
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Cheap-to-clone handle for emitting events
#[derive(Clone)]
pub struct EventEmitter {
    tx: broadcast::Sender<ResearchEvent>,
}

impl EventEmitter {
    /// Emit a raw event
    pub fn emit(&self, event: ResearchEvent) {
        debug!(event_type = event.event_type(), "EventEmitter::emit");
        let _ = self.tx.send(event);
    }

    // === Convenience methods ===

    pub fn plan_model_fallback(&self, from_model: &str, to_model: &str, reason: &str) {
        self.emit(ResearchEvent::PlanModelFallback {
            from_model: from_model.to_string(),
            to_model: to_model.to_string(),
            reason: reason.to_string(),
        });
    }

    pub fn plan_generated(&self, model: &str) {
        self.emit(ResearchEvent::PlanGenerated {
            model: model.to_string(),
        });
    }

    pub fn plan_fallback_to_topic(&self, reason: &str) {
        self.emit(ResearchEvent::PlanFallbackToTopic {
            reason: reason.to_string(),
        });
    }

    pub fn job_submitted(&self, job_id: &str) {
        self.emit(ResearchEvent::JobSubmitted {
            job_id: job_id.to_string(),
        });
    }

    pub fn poll_attempt(&self, job_id: &str, attempt: u32, elapsed_ms: u64, outcome: &str) {
        self.emit(ResearchEvent::PollAttempt {
            job_id: job_id.to_string(),
            attempt,
            elapsed_ms,
            outcome: outcome.to_string(),
        });
    }

    pub fn transient_poll_error(&self, job_id: &str, attempt: u32, message: &str) {
        self.emit(ResearchEvent::TransientPollError {
            job_id: job_id.to_string(),
            attempt,
            message: message.to_string(),
        });
    }

    pub fn job_finished(&self, job_id: &str, outcome: &str, elapsed_ms: u64) {
        self.emit(ResearchEvent::JobFinished {
            job_id: job_id.to_string(),
            outcome: outcome.to_string(),
            elapsed_ms,
        });
    }
}
