//! Session storage and per-session serialization.
//!
//! - `SessionStore`: the persistence port for per-key message logs
//! - `InMemorySessionStore`: a process-local implementation
//! - `SessionActors`: one owning task per session key that executes
//!   commands for that key strictly one at a time
//! - `SessionKeyAllocator`: fresh random session keys

pub mod actor;
pub mod key;
pub mod memory;
pub mod store;
