//! CLI layer for ga4-mcp.
//!
//! Provides the command-line interface using clap, with commands for
//! serving the report gateway and talking to it through the assistant.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{AgentCommands, Cli, Commands, GatewayArgs, ServeCommands};
