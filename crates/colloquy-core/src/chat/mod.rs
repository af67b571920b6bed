//! Chat turn pipeline.
//!
//! `ChatService` is the entry point used by the HTTP and CLI layers. A turn
//! is validated there, routed to the session's actor, and executed by
//! `TurnRunner`: history read, prompt assembly, generation (with offline
//! fallback), and one atomic append of the user and assistant messages.

pub mod fallback;
pub mod prompt;
pub mod service;
pub mod turn;
