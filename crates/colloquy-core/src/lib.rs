//! Business logic and port definitions for Colloquy.
//!
//! This crate defines the "ports" (the `SessionStore` and `LlmProvider`
//! traits) that the infrastructure layer implements, plus the chat turn
//! pipeline that runs on top of them. It depends only on `colloquy-types` --
//! never on `colloquy-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
