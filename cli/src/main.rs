//! CLI entrypoint for confine
//!
//! This is the main binary that wires together all layers using
//! dependency injection, then runs one prompt to completion.

use anyhow::{Context, Result};
use clap::Parser;
use confine_application::{ConversationLogger, RunAgentInput, RunAgentUseCase, ToolSchemaPort};
use confine_domain::WorkingRoot;
use confine_infrastructure::providers::gemini::API_KEY_ENV;
use confine_infrastructure::{
    ConfigLoader, FileConfig, GeminiGateway, JsonSchemaToolConverter, JsonlConversationLogger,
    ToolDispatcher, default_registry,
};
use confine_presentation::{Cli, ConsoleFormatter, ConsoleProgress};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Key read for `--show-config` only; no OpenRouter gateway is wired in
const OPENROUTER_KEY_ENV: &str = "OPENROUTER_API_KEY";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e).context("Failed to read .env"),
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    apply_cli_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    if cli.show_config {
        show_config(&cli, &config)?;
        return Ok(());
    }

    // clap guarantees the prompt unless --show-config was given
    let prompt = cli.prompt.clone().unwrap_or_default();

    info!("Starting confine");

    // === Dependency Injection ===
    let root = WorkingRoot::open(&config.sandbox.working_dir)
        .context("Cannot use the configured working directory")?;
    info!("Working root: {}", root);

    let registry = default_registry(&config.tool_settings())?;
    let executor = Arc::new(ToolDispatcher::new(registry));
    let gateway = Arc::new(
        GeminiGateway::from_env(config.agent.model.clone())
            .context("Failed to create the Gemini gateway")?,
    );
    let schema: Arc<dyn ToolSchemaPort> = Arc::new(JsonSchemaToolConverter);

    let mut use_case =
        RunAgentUseCase::new(gateway, executor, schema).with_params(config.execution_params());
    if let Some(path) = &config.logging.conversation_log {
        if let Some(logger) = JsonlConversationLogger::new(path) {
            info!("Conversation log: {}", logger.path().display());
            let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
            use_case = use_case.with_conversation_logger(logger);
        }
    }

    let progress = if cli.quiet {
        ConsoleProgress::quiet()
    } else {
        ConsoleProgress::new()
    };

    let input = RunAgentInput::new(prompt, root);
    match use_case.execute_with_progress(input, &progress).await {
        Ok(output) => {
            drop(progress);
            println!("{}", ConsoleFormatter::outcome(&output));
            if cli.verbose > 0 {
                println!("{}", ConsoleFormatter::summary(&output));
            }
        }
        Err(e) => {
            drop(progress);
            println!("{}", ConsoleFormatter::error(&e));
        }
    }

    Ok(())
}

/// Command-line flags win over every config file
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(dir) = &cli.working_dir {
        config.sandbox.working_dir = dir.clone();
    }
    if let Some(model) = &cli.model {
        config.agent.model = model.clone();
    }
    if let Some(max) = cli.max_iterations {
        config.agent.max_iterations = max;
    }
    if let Some(path) = &cli.log_file {
        config.logging.conversation_log = Some(path.clone());
    }
}

fn show_config(cli: &Cli, config: &FileConfig) -> Result<()> {
    if cli.no_config {
        println!("Configuration files disabled (--no-config)");
    } else {
        ConfigLoader::print_config_sources(cli.config.as_ref());
    }
    println!();
    println!("Effective configuration:");
    println!("{}", toml::to_string_pretty(config)?);

    println!("Environment:");
    for key in [API_KEY_ENV, OPENROUTER_KEY_ENV] {
        let state = match std::env::var(key) {
            Ok(v) if !v.trim().is_empty() => "set",
            _ => "not set",
        };
        println!("  {}: {}", key, state);
    }
    Ok(())
}
