//! deepresearch - Gemini Deep Research CLI
//!
//! Topic → plan → confirm → background research job → saved report.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::broadcast;
use tracing::{debug, info};

use deepresearch::cli::{Cli, confirms};
use deepresearch::config::Config;
use deepresearch::events::{EventBus, ResearchEvent};
use deepresearch::job::{JobController, ReportResult, research_input};
use deepresearch::planning::PlanGenerator;
use deepresearch::remote::create_service;
use deepresearch::report::save_report;

const SEPARATOR: &str = "----------------------------------------";

/// Print a status line every this many pending polls
const PROGRESS_EVERY: u32 = 6;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deepresearch")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("deepresearch.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

/// Read one line; `None` on Ctrl-C or Ctrl-D
fn prompt_line(prompt: &str) -> Result<Option<String>> {
    let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
    match rl.readline(prompt) {
        Ok(line) => Ok(Some(line.trim().to_string())),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(e) => Err(eyre::eyre!("Failed to read input: {}", e)),
    }
}

/// Progress lines are dimmed; degraded behaviour stands out in yellow
fn paint(event: &ResearchEvent, line: String) -> ColoredString {
    if event.is_warning() {
        line.yellow()
    } else {
        line.dimmed()
    }
}

fn render_event(event: &ResearchEvent) {
    match event {
        ResearchEvent::PlanModelFallback { from_model, to_model, .. } => {
            println!("{}", paint(event, format!("Fallback: {} failed, trying {}...", from_model, to_model)));
        }
        ResearchEvent::PlanGenerated { .. } => {
            println!("{}", "Research Plan Generated:".green());
        }
        ResearchEvent::PlanFallbackToTopic { reason } => {
            println!("{}", format!("Failed to generate plan: {}", reason).red());
            println!("{}", "Proceeding with raw topic...".yellow());
        }
        ResearchEvent::JobSubmitted { job_id } => {
            println!("{}", "Deep Research Agent started.".green());
            println!("{}", paint(event, format!("ID: {}", job_id)));
        }
        ResearchEvent::TransientPollError { message, .. } => {
            println!("{}", paint(event, format!("Researching (retrying after error: {})...", message)));
        }
        ResearchEvent::PollAttempt {
            attempt, elapsed_ms, ..
        } if attempt % PROGRESS_EVERY == 0 => {
            println!("{}", paint(event, format!("Researching... {}m elapsed", elapsed_ms / 60_000)));
        }
        ResearchEvent::PollAttempt { .. } | ResearchEvent::JobFinished { .. } => {}
    }
}

fn drain_events(rx: &mut broadcast::Receiver<ResearchEvent>) {
    while let Ok(event) = rx.try_recv() {
        render_event(&event);
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    let remote = create_service(&config.service).context("Failed to create API client")?;

    let bus = EventBus::with_default_capacity();
    let mut rx = bus.subscribe();
    debug!(subscribers = bus.subscriber_count(), "main: event bus ready");

    // Step 0: Topic
    let topic = match cli.topic.clone() {
        Some(topic) => topic.trim().to_string(),
        None => prompt_line(&format!("{} ", "Enter research topic:".blue()))?.unwrap_or_default(),
    };
    if topic.is_empty() {
        println!("{}", "No topic provided. Exiting.".red());
        return Ok(ExitCode::SUCCESS);
    }
    debug!(%topic, "main: topic accepted");

    // Step 1: Plan
    println!("Generating research plan...");
    let generator = PlanGenerator::new(
        remote.clone(),
        config.plan.primary_model.clone(),
        config.plan.fallback_model.clone(),
    )
    .with_events(bus.emitter());
    let plan = generator.generate_plan(&topic).await;
    drain_events(&mut rx);

    println!("{}", SEPARATOR.dimmed());
    println!("{}", plan);
    println!("{}", SEPARATOR.dimmed());

    // Step 2: Confirm
    if !cli.yes {
        let answer = prompt_line(&format!("{} ", "Proceed with this research plan? (Y/n):".yellow()))?;
        if !answer.as_deref().is_some_and(confirms) {
            println!("{}", "Aborted.".blue());
            return Ok(ExitCode::SUCCESS);
        }
    }

    // Step 3: Submit
    println!("Initializing Deep Research Agent...");
    let controller = JobController::new(remote, config.service.agent.clone()).with_events(bus.emitter());
    let handle = match controller.submit(&research_input(&plan)).await {
        Ok(handle) => handle,
        Err(e) => {
            println!("{}", format!("Failed to start research: {}", e).red());
            return Ok(ExitCode::FAILURE);
        }
    };
    drain_events(&mut rx);

    // Step 4: Poll
    println!("Researching (this may take 10+ minutes)...");
    let run = controller.run(&handle, config.poll.interval(), config.poll.timeout());
    tokio::pin!(run);
    let result = loop {
        tokio::select! {
            result = &mut run => break result,
            Ok(event) = rx.recv() => render_event(&event),
        }
    };
    drain_events(&mut rx);

    // Step 5: Save
    match result {
        ReportResult::Succeeded(report) => {
            println!("{}", "Research Completed!".green());
            if report.is_empty() {
                println!("{}", "No report content found.".yellow());
                return Ok(ExitCode::SUCCESS);
            }
            let path = save_report(&config.report.output_dir, &topic, &report, config.report.slug_max_len)?;
            println!("{}", format!("\nReport saved to: {}", path.display()).green());
            println!("{}", SEPARATOR.dimmed());
            Ok(ExitCode::SUCCESS)
        }
        ReportResult::Failed(failure) => {
            println!("{}", failure.to_string().red());
            Ok(ExitCode::FAILURE)
        }
        ReportResult::TimedOut => {
            let minutes = config.poll.timeout().as_secs() / 60;
            println!("{}", format!("Research timed out after {} minutes.", minutes).red());
            Ok(ExitCode::FAILURE)
        }
    }
}
