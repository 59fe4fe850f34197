//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// ga4-mcp: Google Analytics 4 reports as MCP tools.
///
/// Serves fixed GA4 report queries over MCP, and runs a conversational
/// assistant that answers analytics questions with them.
#[derive(Parser, Debug)]
#[command(name = "ga4-mcp")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the GA4 report tools over MCP.
    #[command(subcommand)]
    Serve(ServeCommands),

    /// Talk to a running report gateway through the analytics assistant.
    #[command(subcommand)]
    Agent(AgentCommands),
}

/// GA4 connection settings; each falls back to its environment variable.
#[derive(Args, Debug, Clone, Default)]
pub struct GatewayArgs {
    /// GA4 property id (numeric or `properties/<id>`).
    #[arg(long, env = "GA4_PROPERTY_ID")]
    pub property_id: Option<String>,

    /// Service-account JSON key file.
    #[arg(long, env = "GA4_CREDENTIALS_FILE")]
    pub credentials: Option<PathBuf>,

    /// Dimension whitelist source (builtin, metadata).
    #[arg(long, env = "GA4_DIMENSION_SOURCE")]
    pub dimension_source: Option<String>,
}

/// MCP server transports.
#[derive(Subcommand, Debug)]
pub enum ServeCommands {
    /// Serve over stdio.
    ///
    /// Reads JSON-RPC messages from stdin, writes responses to stdout.
    #[command(after_help = r#"Examples:
  ga4-mcp serve stdio --property-id 123456789 --credentials key.json
  GA4_PROPERTY_ID=123456789 GA4_ACCESS_TOKEN=$(gcloud auth print-access-token) ga4-mcp serve stdio
"#)]
    Stdio {
        /// GA4 connection settings.
        #[command(flatten)]
        gateway: GatewayArgs,
    },

    /// Serve over MCP streamable HTTP at `/mcp`.
    #[command(after_help = r#"Examples:
  ga4-mcp serve sse                            # Listen on 0.0.0.0:8080
  ga4-mcp serve sse --host 127.0.0.1 --port 9000
  ga4-mcp serve sse --dimension-source metadata
"#)]
    Sse {
        /// GA4 connection settings.
        #[command(flatten)]
        gateway: GatewayArgs,

        /// Host to bind to.
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to bind to.
        #[arg(long, default_value = "8080")]
        port: u16,
    },
}

/// Agent subcommands.
#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// List the tools a running gateway publishes.
    #[command(after_help = r#"Examples:
  ga4-mcp agent tools
  ga4-mcp agent tools --url http://analytics.internal:8080/mcp
  ga4-mcp --format json agent tools | jq '.[].name'
"#)]
    Tools {
        /// Gateway MCP endpoint.
        #[arg(long, env = "GA4_GATEWAY_URL")]
        url: Option<String>,
    },

    /// Ask the analytics assistant a single question.
    #[command(after_help = r#"Examples:
  ga4-mcp agent ask "How many active users did we have last week?"
  ga4-mcp agent ask "Top 5 countries by 28-day active users in March 2024"
  GEMINI_API_KEY=... ga4-mcp agent ask "Daily active users yesterday by device"
"#)]
    Ask {
        /// The question to answer.
        question: String,

        /// Gateway MCP endpoint.
        #[arg(long, env = "GA4_GATEWAY_URL")]
        url: Option<String>,

        /// Chat model.
        #[arg(long)]
        model: Option<String>,
    },

    /// Start an interactive conversation on stdin.
    ///
    /// Each line is one question; the conversation is kept between
    /// questions. Type `/reset` to start over, `/exit` or EOF to quit.
    Chat {
        /// Gateway MCP endpoint.
        #[arg(long, env = "GA4_GATEWAY_URL")]
        url: Option<String>,

        /// Chat model.
        #[arg(long)]
        model: Option<String>,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_sse_defaults() {
        let cli = Cli::try_parse_from(["ga4-mcp", "serve", "sse"])
            .unwrap_or_else(|e| panic!("parse: {e}"));
        let Commands::Serve(ServeCommands::Sse { host, port, .. }) = cli.command else {
            panic!("expected serve sse");
        };
        assert_eq!(host, "0.0.0.0");
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_agent_ask() {
        let cli = Cli::try_parse_from([
            "ga4-mcp",
            "--format",
            "json",
            "agent",
            "ask",
            "active users yesterday?",
            "--url",
            "http://localhost:9000/mcp",
        ])
        .unwrap_or_else(|e| panic!("parse: {e}"));
        assert_eq!(cli.format, "json");
        let Commands::Agent(AgentCommands::Ask { question, url, .. }) = cli.command else {
            panic!("expected agent ask");
        };
        assert_eq!(question, "active users yesterday?");
        assert_eq!(url.as_deref(), Some("http://localhost:9000/mcp"));
    }

    #[test]
    fn test_stdio_gateway_flags() {
        let cli = Cli::try_parse_from([
            "ga4-mcp",
            "serve",
            "stdio",
            "--property-id",
            "42",
            "--dimension-source",
            "metadata",
        ])
        .unwrap_or_else(|e| panic!("parse: {e}"));
        let Commands::Serve(ServeCommands::Stdio { gateway }) = cli.command else {
            panic!("expected serve stdio");
        };
        assert_eq!(gateway.property_id.as_deref(), Some("42"));
        assert_eq!(gateway.dimension_source.as_deref(), Some("metadata"));
    }
}
