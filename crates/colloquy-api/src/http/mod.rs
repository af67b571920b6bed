//! HTTP API layer for Colloquy.
//!
//! Axum router exposing the chat and clear endpoints used by the web UI,
//! plus history lookup, a health check, and static asset serving.

pub mod error;
pub mod handlers;
pub mod router;
