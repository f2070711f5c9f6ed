use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;

use meal_lens::advice::{AdviceAgent, AdvisorProfile};
use meal_lens::api;
use meal_lens::commands::{CommandHandler, CommandOutcome};
use meal_lens::config::AppConfig;
use meal_lens::providers::duckduckgo::DuckDuckGoSearch;
use meal_lens::providers::gemini::GeminiProvider;
use meal_lens::workflow::MealWorkflow;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Meal photo nutrition analysis with Gemini", long_about = None)]
struct Args {
    /// Gemini API key; falls back to GEMINI_API_KEY
    #[arg(short, long)]
    api_key: Option<String>,

    /// Serve the HTTP API instead of the interactive shell
    #[arg(long)]
    api: bool,

    #[arg(long, default_value = "3000")]
    port: u16,

    /// JSON advisor profile, as a path or a file name under advisors/
    #[arg(long)]
    advisor: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let args = Args::parse();

    let config = AppConfig::from_env(args.api_key.clone())?;
    let advisor = load_advisor(args.advisor.as_deref())?;
    let workflow = build_workflow(&config, advisor);

    if args.api {
        run_api_server(args.port, workflow).await
    } else {
        run_cli_mode(workflow).await
    }
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "meal_lens=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    // Logs go to stderr so they never interleave with shell output.
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_advisor(name: Option<&str>) -> anyhow::Result<AdvisorProfile> {
    let Some(name) = name else {
        return Ok(AdvisorProfile::default());
    };

    let direct = PathBuf::from(name);
    let path = if direct.exists() {
        direct
    } else {
        Path::new("advisors").join(name)
    };
    let profile = AdvisorProfile::from_file(&path)?;
    tracing::info!(advisor = %profile, path = %path.display(), "loaded advisor profile");
    Ok(profile)
}

fn build_workflow(config: &AppConfig, advisor: AdvisorProfile) -> MealWorkflow {
    let vision = GeminiProvider::new(config.gemini_api_key.clone(), config.vision.clone());
    let reasoning = GeminiProvider::new(config.gemini_api_key.clone(), config.advice.clone());
    let search = DuckDuckGoSearch::new(config.search_url.clone(), config.search_max_results);

    let agent = AdviceAgent::new(advisor, Box::new(reasoning), Box::new(search));
    MealWorkflow::new(Arc::new(vision), Arc::new(agent))
}

async fn run_cli_mode(workflow: MealWorkflow) -> anyhow::Result<()> {
    println!("{}", "🍽️ Meal Lens: AI nutrition analysis for your meal photos".bold());
    println!("{}", format!("Vision model: {}", workflow.vision_model()).dimmed());

    let mut command_handler = CommandHandler::new(workflow);
    command_handler
        .handle_command("help")
        .await
        .map_err(anyhow::Error::msg)?;

    let mut rl = Editor::<(), DefaultHistory>::new()?;

    loop {
        match rl.readline("🥗 ") {
            Ok(line) => {
                let input = line.trim();
                if !input.is_empty() {
                    let _ = rl.add_history_entry(input);
                }

                match command_handler.handle_command(input).await {
                    Ok(CommandOutcome::Exit) => break,
                    Ok(CommandOutcome::Continue) => {}
                    Err(e) => println!("{}", e.red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

async fn run_api_server(port: u16, workflow: MealWorkflow) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port)
        .parse()
        .context("Failed to parse address")?;

    let app = api::create_api(workflow);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    tracing::info!(%addr, "API server listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
