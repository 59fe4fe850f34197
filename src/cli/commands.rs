//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::agent::config::{DEFAULT_GATEWAY_URL, DEFAULT_TIMEOUT_SECS};
use crate::agent::{
    AgentConfig, AnalyticsAssistant, GatewaySession, LlmProvider, McpToolExecutor,
    create_provider,
};
use crate::cli::output::{OutputFormat, format_answer, format_tools};
use crate::cli::parser::{AgentCommands, Cli, Commands, GatewayArgs, ServeCommands};
use crate::error::{CommandError, Result};
use crate::mcp::{Ga4McpServer, GatewayConfig, ReportGateway, serve_sse, serve_stdio};

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if configuration is incomplete, the gateway cannot be
/// reached, or the command fails while running.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Serve(cmd) => cmd_serve(cmd),
        Commands::Agent(cmd) => match cmd {
            AgentCommands::Tools { url } => cmd_agent_tools(url.as_deref(), format),
            AgentCommands::Ask {
                question,
                url,
                model,
            } => {
                let config = agent_config(url.as_deref(), model.as_deref())?;
                cmd_agent_ask(&config, question, format)
            }
            AgentCommands::Chat { url, model } => {
                let config = agent_config(url.as_deref(), model.as_deref())?;
                cmd_agent_chat(&config)
            }
        },
    }
}

/// Creates the tokio runtime used as sync/async bridge.
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to create async runtime: {e}")).into()
    })
}

/// Resolves gateway settings: flags first, then environment.
fn gateway_config(args: &GatewayArgs) -> Result<GatewayConfig> {
    let mut builder = GatewayConfig::builder();
    if let Some(id) = &args.property_id {
        builder = builder.property_id(id);
    }
    if let Some(path) = &args.credentials {
        builder = builder.credentials_file(path);
    }
    if let Some(source) = &args.dimension_source {
        builder = builder.dimension_source(source);
    }
    Ok(builder.from_env().build()?)
}

/// Resolves agent settings: flags first, then environment.
fn agent_config(url: Option<&str>, model: Option<&str>) -> Result<AgentConfig> {
    let mut builder = AgentConfig::builder();
    if let Some(url) = url {
        builder = builder.gateway_url(url);
    }
    if let Some(model) = model {
        builder = builder.model(model);
    }
    Ok(builder.from_env().build()?)
}

/// Starts the report gateway with the specified transport.
///
/// Runs until the client disconnects (stdio) or the server is stopped (SSE).
fn cmd_serve(cmd: &ServeCommands) -> Result<String> {
    let (args, listen) = match cmd {
        ServeCommands::Stdio { gateway } => (gateway, None),
        ServeCommands::Sse {
            gateway,
            host,
            port,
        } => (gateway, Some((host.as_str(), *port))),
    };
    let config = gateway_config(args)?;

    runtime()?.block_on(serve(&config, listen))
}

async fn serve(config: &GatewayConfig, listen: Option<(&str, u16)>) -> Result<String> {
    let gateway = ReportGateway::connect(config).await?;
    let server = Ga4McpServer::new(gateway);

    match listen {
        None => serve_stdio(server).await,
        Some((host, port)) => serve_sse(server, host, port).await,
    }
    .map_err(|e| CommandError::ExecutionFailed(format!("MCP server error: {e}")))?;

    Ok(String::new())
}

/// Lists the tools a running gateway publishes. Needs no LLM key.
fn cmd_agent_tools(url: Option<&str>, format: OutputFormat) -> Result<String> {
    let url = url.unwrap_or(DEFAULT_GATEWAY_URL);
    runtime()?.block_on(list_gateway_tools(url, format))
}

async fn list_gateway_tools(url: &str, format: OutputFormat) -> Result<String> {
    let session = GatewaySession::connect(url, Duration::from_secs(DEFAULT_TIMEOUT_SECS)).await?;
    let tools = session.list_tools().await;
    session.close().await;

    Ok(format_tools(&tools?, format))
}

/// Answers a single question through the analytics assistant.
fn cmd_agent_ask(config: &AgentConfig, question: &str, format: OutputFormat) -> Result<String> {
    let provider = create_provider(config)?;
    runtime()?.block_on(ask(config, provider.as_ref(), question, format))
}

async fn ask(
    config: &AgentConfig,
    provider: &dyn LlmProvider,
    question: &str,
    format: OutputFormat,
) -> Result<String> {
    let session = GatewaySession::connect(&config.gateway_url, config.timeout).await?;
    let tools = match session.tool_set().await {
        Ok(tools) => tools,
        Err(e) => {
            session.close().await;
            return Err(e.into());
        }
    };

    let mut assistant = AnalyticsAssistant::new(config, tools.clone());
    let executor = McpToolExecutor::new(session.peer(), tools);
    let response = assistant.ask(provider, &executor, question).await;
    session.close().await;

    let response = response?;
    debug!(
        total_tokens = response.usage.total_tokens,
        finish_reason = ?response.finish_reason,
        "question answered"
    );
    Ok(format_answer(&response, format))
}

/// Runs an interactive conversation over stdin/stdout.
fn cmd_agent_chat(config: &AgentConfig) -> Result<String> {
    let provider = create_provider(config)?;
    runtime()?.block_on(chat(config, provider.as_ref()))
}

async fn chat(config: &AgentConfig, provider: &dyn LlmProvider) -> Result<String> {
    let session = GatewaySession::connect(&config.gateway_url, config.timeout).await?;
    let outcome = match session.tool_set().await {
        Ok(tools) => {
            let mut assistant = AnalyticsAssistant::new(config, tools.clone());
            let executor = McpToolExecutor::new(session.peer(), tools);
            chat_loop(&mut assistant, provider, &executor, session.url()).await
        }
        Err(e) => Err(e.into()),
    };
    session.close().await;
    outcome
}

/// One line typed into the chat.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput<'a> {
    Blank,
    Exit,
    Reset,
    Question(&'a str),
}

/// Classifies a chat line. Only slash-prefixed words are commands.
fn chat_input(line: &str) -> ChatInput<'_> {
    match line.trim() {
        "" => ChatInput::Blank,
        "/exit" | "/quit" => ChatInput::Exit,
        "/reset" => ChatInput::Reset,
        question => ChatInput::Question(question),
    }
}

/// Reads questions line by line until `/exit` or EOF.
///
/// A failed turn is reported and the conversation continues.
async fn chat_loop(
    assistant: &mut AnalyticsAssistant,
    provider: &dyn LlmProvider,
    executor: &McpToolExecutor,
    gateway_url: &str,
) -> Result<String> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut turns = 0usize;

    let greeting = format!(
        "Connected to {gateway_url} ({} tools). /reset starts over, /exit quits.\n",
        assistant.tool_set().len()
    );
    stdout
        .write_all(greeting.as_bytes())
        .await
        .map_err(CommandError::from)?;

    loop {
        stdout.write_all(b"> ").await.map_err(CommandError::from)?;
        stdout.flush().await.map_err(CommandError::from)?;

        let Some(line) = lines.next_line().await.map_err(CommandError::from)? else {
            break;
        };
        let question = match chat_input(&line) {
            ChatInput::Blank => continue,
            ChatInput::Exit => break,
            ChatInput::Reset => {
                assistant.reset();
                stdout
                    .write_all(b"Conversation cleared.\n")
                    .await
                    .map_err(CommandError::from)?;
                continue;
            }
            ChatInput::Question(question) => question,
        };

        let reply = match assistant.ask(provider, executor, question).await {
            Ok(response) => {
                turns += 1;
                response.content
            }
            Err(e) => format!("Error: {e}"),
        };
        stdout
            .write_all(format!("{reply}\n\n").as_bytes())
            .await
            .map_err(CommandError::from)?;
    }

    Ok(format!("{turns} question(s) answered"))
}
