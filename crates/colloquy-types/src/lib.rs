//! Shared domain types for Colloquy.
//!
//! This crate contains the domain types used across the workspace: chat
//! messages, LLM request/response shapes, configuration, and error enums.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
