//! Agent-to-agent calling for the AgentMesh bridge.
//!
//! The orchestrated call is the one non-trivial flow in the system: fetch
//! the target's agent card through the registry gateway, build the task
//! payload, POST it to the card's endpoint under a cancellable deadline, and
//! retry transient failures with exponential backoff. Timeouts are terminal;
//! malformed structured input is terminal; everything else transient is
//! retried with a freshly fetched card.

pub mod call;
pub mod card;

pub use call::{
    AgentCaller, CallOptions, CallOutcome, InputMode, RetryPolicy, DEFAULT_MAX_RETRIES,
    DEFAULT_TIMEOUT_MS,
};
pub use card::{AgentCard, Pricing};
