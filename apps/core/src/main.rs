// Amanda entry point
// Terminal chat, one-shot questions and offline profile generation.

use amanda_core::config::AppConfig;
use amanda_core::llm::{GeminiClient, ProfileGenerator};
use amanda_core::models::ChatTurn;
use amanda_core::setup::build_core;
use amanda_core::ChatbotCore;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "amanda")]
#[command(about = "Amanda - smart enquiry chatbot for universities", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat interactively on the terminal (default)
    Chat,

    /// Ask a single question and print the answer
    Ask {
        /// The question to ask
        #[arg(required = true)]
        question: Vec<String>,
    },

    /// Generate an institution profile document with the generative model
    Generate {
        /// Display name of the institution
        #[arg(long)]
        name: String,

        /// Where to write the profile JSON
        #[arg(long)]
        output: PathBuf,

        /// Extra guidance for the model
        #[arg(long)]
        context: Option<String>,
    },
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    let config = AppConfig::load().context("Failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => chat(&config).await,
        Commands::Ask { question } => {
            let core = build_core(&config);
            println!("{}", core.get_response(&question.join(" ")).await);
            Ok(())
        }
        Commands::Generate { name, output, context } => {
            generate(&config, &name, &output, context.as_deref()).await
        }
    }
}

async fn chat(config: &AppConfig) -> Result<()> {
    info!("--- Starting Amanda Chatbot ---");
    let core = build_core(config);
    greet(&core);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            break;
        }

        let turn = ChatTurn::new(input, core.resolve(input).await);
        println!("Amanda: {}\n", turn.output);
        debug!(source = %turn.source, at = %turn.at, "User: {} | Bot: {}", turn.input, turn.output);
    }

    println!("Goodbye!");
    info!("--- Amanda Chatbot exited ---");
    Ok(())
}

fn greet(core: &ChatbotCore) {
    println!(
        "Amanda: Smart Enquiry Chatbot for {}. Type 'quit' to leave.\n",
        core.institution_name()
    );
}

async fn generate(config: &AppConfig, name: &str, output: &Path, context: Option<&str>) -> Result<()> {
    let client = GeminiClient::new(&config.gemini).context("Cannot generate information")?;
    info!("--- Generating data for {} ---", name);

    ProfileGenerator::new(Arc::new(client))
        .generate_to_file(name, context, output)
        .await
        .with_context(|| format!("Failed to generate data for {}", name))?;

    println!("Saved profile for {} to {}", name, output.display());
    Ok(())
}
