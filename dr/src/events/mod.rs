//! Event bus for live observability
//!
//! Plan generation and the job controller emit [`ResearchEvent`]s to an
//! [`EventBus`]; the CLI subscribes and renders status lines. Emitting never
//! affects behaviour.
//!
//! ```rust,ignore
//! let bus = EventBus::with_default_capacity();
//! let mut rx = bus.subscribe();
//! let controller = JobController::new(remote, agent).with_events(bus.emitter());
//! ```

mod bus;
mod types;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, EventBus, EventEmitter};
pub use types::ResearchEvent;
