//! voicerag - CLI entry point

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use voicerag::{
    bootstrap::{Bootstrap, BootstrapReport},
    cli::{Args, Commands, Verbosity},
    config::Config,
    rag::EngineHandle,
    repl::{default_history_path, InputHandler, ReplSession},
    telemetry::{TelemetryCollector, TelemetryDisplay},
    tools::ToolRuntime,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = args.validate() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    let config = effective_config(&args)?;
    let default_verbosity =
        Verbosity::parse(&config.telemetry.default_verbosity).unwrap_or(Verbosity::Normal);
    let verbosity = args.verbosity_or(default_verbosity);

    if !config.telemetry.color_output {
        colored::control::set_override(false);
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &args.command {
        Commands::Config { write } => show_config(&config, write.as_deref()),
        Commands::Search { query, k } => {
            let k = k.unwrap_or(config.retrieval.default_k);
            run_search(config, verbosity, query, k).await
        }
        Commands::Index => run_index(config, verbosity).await,
        Commands::Start => run_console(config, verbosity).await,
        Commands::Tool { args: json, name } => run_tool(config, verbosity, name, json).await,
    }
}

/// Configuration file plus command-line overrides
fn effective_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.clone())?;

    if let Some(path) = &args.knowledge {
        config.knowledge.path = path.to_string_lossy().into_owned();
    }
    if let Some(backend) = args.encoder {
        config.encoder.backend = backend;
    }

    config.validate()?;
    Ok(config)
}

/// Build the engine off the async runtime; model download and indexing block
async fn start_engine(
    config: Config,
    verbosity: Verbosity,
    telemetry: TelemetryCollector,
) -> Result<(Arc<EngineHandle>, BootstrapReport)> {
    let handle = Arc::new(EngineHandle::new());
    let bootstrap = Bootstrap::new(config, verbosity).with_telemetry(telemetry);

    let target = Arc::clone(&handle);
    let report = tokio::task::spawn_blocking(move || bootstrap.initialize(&target)).await??;

    Ok((handle, report))
}

async fn run_search(config: Config, verbosity: Verbosity, query: &str, k: usize) -> Result<()> {
    let telemetry = TelemetryCollector::new();
    let (handle, _report) = start_engine(config, verbosity, telemetry.clone()).await?;

    let engine = handle.engine()?;
    let query = query.to_string();
    let answer = tokio::task::spawn_blocking(move || engine.search(&query, k)).await??;
    println!("{}", answer);

    let display = TelemetryDisplay::new(telemetry, verbosity);
    if display.should_show_details() {
        eprintln!("{}", display.summary());
    }

    Ok(())
}

async fn run_index(config: Config, verbosity: Verbosity) -> Result<()> {
    let (_handle, report) = start_engine(config, verbosity, TelemetryCollector::new()).await?;

    println!("{}", "Index built".green().bold());
    println!("  Knowledge base: {}", report.knowledge_path.display());
    println!("  Documents:      {}", report.documents);
    println!("  Dimension:      {}", report.dimension);
    println!("  Encoder:        {}", report.encoder);
    println!("  Build time:     {}ms", report.duration.as_millis());

    Ok(())
}

async fn run_console(config: Config, verbosity: Verbosity) -> Result<()> {
    let default_k = config.retrieval.default_k;
    let telemetry = TelemetryCollector::new();
    let (handle, _report) = start_engine(config, verbosity, telemetry.clone()).await?;

    let mut input = match default_history_path() {
        Some(path) => InputHandler::with_history(path)?,
        None => InputHandler::new()?,
    };
    let mut session = ReplSession::new(handle, telemetry.clone())
        .with_k(default_k)
        .with_verbosity(verbosity);

    session.run(&mut input)?;

    TelemetryDisplay::new(telemetry, verbosity).display_summary();
    Ok(())
}

async fn run_tool(config: Config, verbosity: Verbosity, name: &str, json: &str) -> Result<()> {
    let tool_args: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| anyhow::anyhow!("Tool arguments are not valid JSON: {}", e))?;

    let default_k = config.retrieval.default_k;
    let telemetry = TelemetryCollector::new();
    let (handle, _report) = start_engine(config, verbosity, telemetry.clone()).await?;

    let runtime = ToolRuntime::with_knowledge(handle, default_k).with_telemetry(telemetry.clone());
    let result = runtime.execute(name, &tool_args).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    let display = TelemetryDisplay::new(telemetry, verbosity);
    if display.should_show_details() {
        let stats = runtime.stats();
        eprintln!(
            "Tool calls: {} ({:.0}% succeeded, avg {:.1}ms)",
            stats.total_executions,
            stats.success_rate() * 100.0,
            stats.average_duration_ms()
        );
    }

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

fn show_config(config: &Config, write: Option<&Path>) -> Result<()> {
    if let Some(path) = Config::default_path() {
        println!("# default location: {}", path.display());
    }
    print!("{}", config.to_toml()?);

    if let Some(path) = write {
        config.save(path)?;
        eprintln!("{} {}", "Configuration written to".green(), path.display());
    }
    Ok(())
}
