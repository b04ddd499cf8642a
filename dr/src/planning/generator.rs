//! PlanGenerator - turn a topic into a research plan
//!
//! Tries an ordered list of models. A model that is unavailable (404 or 5xx)
//! hands over to the next one; any other failure ends the chain. If the chain
//! fails, the raw topic is used as the plan.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::events::EventEmitter;
use crate::remote::{RemoteError, RemoteService};

/// Prompt template; `{topic}` is replaced with the escaped topic
pub const PLAN_PROMPT_TEMPLATE: &str = "Create a detailed research plan for: \"{topic}\".
The plan should break down the research into key areas and questions.
Keep it concise but comprehensive enough for an autonomous agent.";

/// Escape a topic for embedding inside the quoted prompt string
pub fn escape_topic(topic: &str) -> String {
    topic.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Build the plan prompt for a topic
pub fn build_plan_prompt(topic: &str) -> String {
    PLAN_PROMPT_TEMPLATE.replace("{topic}", &escape_topic(topic))
}

/// Generates research plans with a primary/fallback model chain
pub struct PlanGenerator {
    remote: Arc<dyn RemoteService>,
    models: Vec<String>,
    events: Option<EventEmitter>,
}

impl PlanGenerator {
    /// Create a generator trying `primary` and then, once, `fallback`
    pub fn new(remote: Arc<dyn RemoteService>, primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        let primary = primary.into();
        let fallback = fallback.into();
        debug!(%primary, %fallback, "PlanGenerator::new: called");

        let mut models = vec![primary];
        if !models.contains(&fallback) {
            models.push(fallback);
        }

        Self {
            remote,
            models,
            events: None,
        }
    }

    /// Attach an event emitter for fallback warnings
    pub fn with_events(mut self, events: EventEmitter) -> Self {
        self.events = Some(events);
        self
    }

    /// Models in the order they are tried
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Generate a plan for `topic`, or return `topic` unchanged on failure
    pub async fn generate_plan(&self, topic: &str) -> String {
        debug!(topic_len = topic.len(), "generate_plan: called");
        let prompt = build_plan_prompt(topic);

        match self.generate_with_fallback(&prompt).await {
            Ok((plan, model)) => {
                info!(%model, plan_len = plan.len(), "generate_plan: plan generated");
                if let Some(events) = &self.events {
                    events.plan_generated(&model);
                }
                plan
            }
            Err(e) => {
                warn!(error = %e, "generate_plan: failed, proceeding with raw topic");
                if let Some(events) = &self.events {
                    events.plan_fallback_to_topic(&e.to_string());
                }
                topic.to_string()
            }
        }
    }

    /// Run the model chain, returning the text and the model that produced it
    pub async fn generate_with_fallback(&self, prompt: &str) -> Result<(String, String), RemoteError> {
        let mut models = self.models.iter().peekable();

        while let Some(model) = models.next() {
            match self.remote.generate_text(prompt, model).await {
                Ok(text) => return Ok((text, model.clone())),
                Err(e) => match models.peek() {
                    Some(next) if e.is_model_unavailable() => {
                        warn!(from = %model, to = %next, error = %e, "generate_with_fallback: model unavailable, falling back");
                        if let Some(events) = &self.events {
                            events.plan_model_fallback(model, next, &e.to_string());
                        }
                    }
                    _ => return Err(e),
                },
            }
        }

        Err(RemoteError::InvalidResponse("No models configured".to_string()))
    }
}
