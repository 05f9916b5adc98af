use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io::Write as _;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;
use tether::agent::{ChatRequest, RemoteAgent, ToolCallRecord};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tether")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("tether.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let mut agent = RemoteAgent::new(config.agent.to_agent_config())
        .context("Failed to build remote agent client")?;

    match &cli.command {
        Some(Commands::Health) => handle_health(&agent).await,
        Some(Commands::Send { message, thread_id }) => {
            handle_send(&mut agent, message, thread_id.as_deref()).await
        }
        Some(Commands::Stream { message, thread_id }) => {
            handle_stream(&mut agent, message, thread_id.as_deref()).await
        }
        Some(Commands::Repl) | None => run_repl(&mut agent).await,
    }
}

async fn handle_health(agent: &RemoteAgent) -> Result<()> {
    info!("Probing remote agent health");
    agent.health_check().await.context("Remote agent is unreachable")?;
    println!("{} {}", "Healthy:".green(), agent.endpoint().base_url());
    Ok(())
}

async fn handle_send(agent: &mut RemoteAgent, message: &str, thread_id: Option<&str>) -> Result<()> {
    info!("Sending message (thread: {:?})", thread_id);

    let mut request = ChatRequest::new(message);
    if let Some(thread_id) = thread_id {
        request = request.with_thread_id(thread_id);
    }

    let response = agent.send(&request).await;
    println!("{}", response);
    print_tool_calls(&agent.drain_call_log());
    Ok(())
}

async fn handle_stream(agent: &mut RemoteAgent, message: &str, thread_id: Option<&str>) -> Result<()> {
    info!("Streaming message (thread: {:?})", thread_id);

    let mut request = ChatRequest::new(message);
    if let Some(thread_id) = thread_id {
        request = request.with_thread_id(thread_id);
    }

    let mut stream = agent.send_stream(&request).await;
    while let Some(chunk) = stream.next().await {
        print!("{}", chunk);
        std::io::stdout().flush()?;
    }
    println!();
    drop(stream);

    print_tool_calls(&agent.drain_call_log());
    Ok(())
}

async fn run_repl(agent: &mut RemoteAgent) -> Result<()> {
    agent.health_check().await.context("Remote agent is unreachable")?;

    let thread_id = format!("cli-{}", epoch_millis());
    println!(
        "{} {} (thread {})",
        "Connected to".cyan(),
        agent.endpoint().base_url(),
        thread_id
    );
    println!("{}", "Type a message, or 'quit' to exit.".cyan());

    loop {
        print!("{} ", ">".bold());
        std::io::stdout().flush()?;

        let mut line = String::new();
        if std::io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == "quit" || message == "exit" {
            break;
        }

        let request = ChatRequest::new(message).with_thread_id(thread_id.as_str());
        let mut stream = agent.send_stream(&request).await;
        while let Some(chunk) = stream.next().await {
            print!("{}", chunk);
            std::io::stdout().flush()?;
        }
        println!();
        drop(stream);

        print_tool_calls(&agent.drain_call_log());
    }

    Ok(())
}

fn print_tool_calls(records: &[ToolCallRecord]) {
    if records.is_empty() {
        return;
    }

    println!("{}", "Tool calls this turn:".cyan());
    for record in records {
        println!(
            "  {} -> {} args={} response={}",
            record.source,
            record.destination.bold(),
            record.arguments,
            record.response
        );
    }
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
