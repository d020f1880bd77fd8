use std::{
    io::{self, Write as _},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{CommandController, HttpTaskService, RefreshOutcome, SubmitOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod bridge;
mod config;
mod render;

use bridge::{ConsoleCommand, ConsoleEvent};
use config::{load_settings, CliOverrides};

#[derive(Parser, Debug)]
#[command(about = "Manage remote tasks with free-text commands")]
struct Args {
    /// Task service address, e.g. http://localhost:8000
    #[arg(long)]
    base_url: Option<String>,
    /// Config file; defaults to ./tasks.toml when present
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
    /// Submit a single command, print the result and exit
    #[arg(long)]
    command: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Quit,
    Refresh,
    Command(String),
}

fn parse_input(line: &str) -> Input {
    match line.trim() {
        ":quit" | ":q" => Input::Quit,
        ":refresh" | ":r" => Input::Refresh,
        _ => Input::Command(line.to_string()),
    }
}

/// Exit status of a one-shot run: only a command the service carried out,
/// followed by a successful reload when one was due, counts as success.
fn one_shot_status(outcome: &SubmitOutcome) -> Result<()> {
    match outcome {
        SubmitOutcome::Completed {
            refresh: Some(RefreshOutcome::Failed { diagnostic }),
            ..
        } => bail!("task reload failed: {diagnostic}"),
        SubmitOutcome::Completed { .. } => Ok(()),
        SubmitOutcome::Failed { diagnostic } => bail!("command failed: {diagnostic}"),
        SubmitOutcome::EmptyInput => bail!("empty command"),
        SubmitOutcome::Rejected => bail!("command rejected, another request is in flight"),
    }
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let settings = load_settings(&CliOverrides {
        config: args.config.clone(),
        base_url: args.base_url.clone(),
        timeout_secs: args.timeout_secs,
    })?;
    info!(base_url = %settings.base_url, "using task service");

    let service = HttpTaskService::with_timeout(&settings.base_url, settings.request_timeout())
        .context("failed to build task service client")?;
    let mut controller = CommandController::new(Arc::new(service));

    if let Some(command) = args.command {
        controller.refresh().await;
        let outcome = controller.submit(&command).await;
        print!("{}", render::render_screen(&controller.view()));
        return one_shot_status(&outcome);
    }

    run_console(controller).await
}

async fn run_console(controller: CommandController) -> Result<()> {
    let (mut bridge, mut events) = bridge::launch(controller);
    let mut signals = bridge.signals();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut was_busy = false;

    println!("Escribe un comando (:refresh para recargar, :quit para salir).");
    bridge
        .dispatch(ConsoleCommand::Refresh)
        .map_err(anyhow::Error::msg)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                let cmd = match parse_input(&line) {
                    Input::Quit => break,
                    Input::Refresh => ConsoleCommand::Refresh,
                    Input::Command(text) => ConsoleCommand::Submit(text),
                };
                if let Err(notice) = bridge.dispatch(cmd) {
                    println!("{notice}");
                }
            }
            event = events.recv() => {
                let Some(ConsoleEvent::Settled { view, outcome }) = event else {
                    break;
                };
                debug!(?outcome, "console: operation settled");
                bridge.settled();
                print!("{}", render::render_screen(&view));
                prompt();
            }
            changed = signals.changed() => {
                if changed.is_err() {
                    break;
                }
                let busy = signals.borrow_and_update().busy;
                if busy && !was_busy {
                    println!("Procesando...");
                }
                was_busy = busy;
            }
        }
    }

    bridge.shutdown().await;
    Ok(())
}
