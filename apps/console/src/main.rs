use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use intake_core::{
    load_settings, run_bootstrap, AutoStart, CommandIntake, ConnectionHandle, DirectPublishGate,
    HttpPlanner, KeyChord, MissingPlanner, PlannerClient, PromptField, Settings, StatusChannel,
    SubmissionDispatcher, Trigger, TriggerOutcome, UiSurface,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod bus;
mod commands;

use bus::ConsoleBus;
use commands::{parse_line, ConsoleCommand, HELP};

#[derive(Parser, Debug)]
#[command(name = "robot-intake", about = "Send natural-language commands to the robot planner")]
struct Args {
    /// Settings file (defaults to ./intake.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_base: Option<String>,
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    topic: Option<String>,
    /// off, on or legacy_label
    #[arg(long)]
    auto_start: Option<AutoStart>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref()).context("failed to load settings")?;
    if let Some(v) = args.api_base {
        settings.api_base = Some(v);
    }
    if let Some(v) = args.api_key {
        settings.api_key = Some(v);
    }
    if let Some(v) = args.topic {
        settings.goal_topic = v;
    }
    if let Some(v) = args.auto_start {
        settings.auto_start = v;
    }

    let planner: Arc<dyn PlannerClient> = match build_planner(&settings) {
        Ok(planner) => {
            let plan_url = planner.plan_url().clone();
            match planner.health().await {
                Ok(health) => info!(
                    %plan_url,
                    ok = health.ok,
                    mqtt = health.mqtt.as_deref().unwrap_or("?"),
                    "planner reachable"
                ),
                Err(err) => warn!(%plan_url, error = %err, "planner health check failed"),
            }
            Arc::new(planner)
        }
        Err(err) => {
            warn!("planner disabled, commands will fail: {err:#}");
            Arc::new(MissingPlanner)
        }
    };

    let field = Arc::new(PromptField::new());
    let surface: Arc<dyn UiSurface> = field.clone();
    let bus = Arc::new(ConsoleBus::default());
    let connection: Arc<dyn ConnectionHandle> = bus.clone();
    let status = StatusChannel::new();

    let dispatcher = SubmissionDispatcher::new(planner, surface.clone(), status.clone());
    let gate = DirectPublishGate::new(Some(connection), settings.goal_topic.clone(), status.clone());
    let intake = Arc::new(CommandIntake::new(dispatcher, gate, surface));

    let mut status_rx = status.subscribe();
    tokio::spawn(async move {
        while status_rx.changed().await.is_ok() {
            let current = status_rx.borrow_and_update().clone();
            println!("[{}] {}", current.state, current.message);
        }
    });

    let plan = settings.bootstrap_plan();
    {
        let bus = bus.clone();
        tokio::spawn(async move { run_bootstrap(plan, bus.as_ref()).await });
    }

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let cmd = match parse_line(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        match cmd {
            ConsoleCommand::Type(text) => {
                if !intake.replace_text(&text) {
                    println!("prompt is read-only while a request is in flight");
                    continue;
                }
                spawn_trigger(&intake, Trigger::Shortcut(KeyChord::new("Enter").with_ctrl()));
            }
            ConsoleCommand::Send => spawn_trigger(&intake, Trigger::Submit),
            ConsoleCommand::Quick(action) => spawn_trigger(&intake, Trigger::Quick(action)),
            ConsoleCommand::Chip(prompt) => {
                spawn_trigger(&intake, Trigger::Chip(prompt));
            }
            ConsoleCommand::Goal { x, y } => {
                intake.publish_goal(x, y);
            }
            ConsoleCommand::Topic(topic) => {
                intake.gate().set_topic(topic);
                println!("goal topic: '{}'", intake.gate().topic());
            }
            ConsoleCommand::Status => {
                let current = status.current();
                let prompt = field.snapshot();
                println!(
                    "[{}] {} | prompt='{}' sent={} busy={} bus={} drive={}",
                    current.state,
                    current.message,
                    prompt.text,
                    prompt.sent,
                    prompt.busy,
                    bus.is_connected(),
                    bus.is_started(),
                );
            }
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Quit => break,
        }
    }

    Ok(())
}

fn build_planner(settings: &Settings) -> Result<HttpPlanner> {
    let api_base = settings
        .resolved_api_base()
        .context("failed to resolve planner base url")?;
    let planner = HttpPlanner::new(&api_base)
        .with_context(|| format!("failed to build planner client for '{api_base}'"))?;
    Ok(planner.with_api_key(settings.api_key.clone()))
}

fn spawn_trigger(intake: &Arc<CommandIntake>, trigger: Trigger) {
    let intake = Arc::clone(intake);
    tokio::spawn(async move {
        match intake.trigger(trigger).await {
            Ok(TriggerOutcome::Filled) => println!("prompt filled; /send to submit"),
            Ok(_) => {}
            Err(err) => println!("{err}"),
        }
    });
}
