use anyhow::Result;
use clap::{Parser, Subcommand};
use hermes_core::{
    AgentLoop, Config, ContextBuilder, GREETING, Provider, Session, TodoManagerTool, TodoStore,
    ToolRegistry, config, providers,
};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

mod onboard;

#[derive(Parser)]
#[command(name = "hermes")]
#[command(about = "hermes - a conversational to-do list assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive setup of provider, API key and model
    Onboard,
    /// Chat with the assistant
    Chat {
        /// Send a single message and exit
        #[arg(short, long)]
        message: Option<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hermes_core=warn,hermes_cli=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn build_agent(config: &Config) -> Result<AgentLoop<TodoStore>> {
    let provider = providers::create_provider(config)?;
    tracing::info!(provider = provider.name(), model = %config.model, "provider ready");

    let tool_registry = ToolRegistry::new().with_tool(TodoManagerTool::new());
    let context_builder = ContextBuilder::new().with_tool_specs(tool_registry.get_specs());

    Ok(AgentLoop::new(provider, context_builder, tool_registry)
        .with_max_iterations(config.max_iterations))
}

fn print_reply(reply: &str) {
    termimad::print_text(reply);
}

async fn run_chat(config: Config, message: Option<String>) -> Result<()> {
    let agent = build_agent(&config)?;
    let mut session = Session::new().with_max_history(config.max_history);
    tracing::info!(session = session.id(), "session started");

    if let Some(msg) = message {
        println!("\n🤔 Processing...\n");
        match session.handle_turn(&agent, &msg).await {
            Ok(reply) => print_reply(&reply),
            Err(e) => {
                eprintln!("❌ Error: {:#}", e);
                anyhow::bail!("Agent processing failed: {}", e);
            }
        }
        return Ok(());
    }

    println!("{}", GREETING);
    println!("Type your message (Ctrl+D to exit):\n");

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(input);

                println!("\n🤔 Processing...\n");
                match session.handle_turn(&agent, input).await {
                    Ok(reply) => print_reply(&reply),
                    Err(e) => eprintln!("❌ Error: {:#}", e),
                }
                println!();
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => {
                println!("\n👋 Goodbye!");
                break;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to read input");
                break;
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load_or_init()?;

    let command = cli.command.unwrap_or_else(|| {
        let has_key =
            !config.api_key.is_empty() || providers::env_has_api_key(&config.provider_name());
        if !config::config_exists() && !has_key {
            Commands::Onboard
        } else {
            Commands::Chat { message: None }
        }
    });

    match command {
        Commands::Onboard => {
            let onboard_config = onboard::run_onboard(config).map_err(|e| {
                eprintln!("❌ Onboarding failed: {}", e);
                anyhow::anyhow!("Onboarding failed: {}", e)
            })?;
            config::save_config(&onboard_config)?;
            println!(
                "\n✅ Saved configuration to {}",
                config::get_config_path().display()
            );
        }
        Commands::Chat { message } => run_chat(config, message).await?,
    }

    Ok(())
}
