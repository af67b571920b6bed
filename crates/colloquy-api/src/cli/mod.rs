//! CLI command definitions for the `colloquy` binary.

pub mod chat;
pub mod session;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Session-scoped chat assistant backed by an OpenAI-compatible model.
#[derive(Parser)]
#[command(name = "colloquy", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Address to bind (defaults to `server.host` from config.toml).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to `server.port` from config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Keep sessions in memory instead of SQLite.
        #[arg(long)]
        memory: bool,

        /// Export spans to stdout through OpenTelemetry.
        #[arg(long)]
        otel: bool,
    },

    /// Send one message and print the reply.
    Chat {
        /// The message to send.
        message: String,

        /// Continue an existing session instead of starting a new one.
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Show the stored messages of a session.
    History {
        /// Session ID.
        session: String,
    },

    /// Delete all messages of a session.
    Clear {
        /// Session ID.
        session: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
