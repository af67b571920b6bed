//! Infrastructure layer for Colloquy.
//!
//! Implements the ports defined in `colloquy-core`: the SQLite session store,
//! the OpenAI-compatible and offline generation providers, and the
//! `config.toml` loader.

pub mod config;
pub mod llm;
pub mod sqlite;
