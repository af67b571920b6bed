//! Observability setup shared by the Colloquy binaries.

pub mod tracing_setup;
