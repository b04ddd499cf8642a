//! Planning module - topic to research plan
//!
//! ```text
//! topic → escape → prompt → [primary model] ─404/5xx→ [fallback model]
//!                                 ↓ ok                     ↓ ok / err
//!                               plan                 plan / raw topic
//! ```

mod generator;

pub use generator::{PLAN_PROMPT_TEMPLATE, PlanGenerator, build_plan_prompt, escape_topic};
