//! todolist - console front end for a to-do list backend
//!
//! Talks to a task backend over HTTP and keeps a rendered copy of the list,
//! stats, weather and notifications in the terminal.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{self, Duration, MissedTickBehavior};

use todolist::api::HttpBackend;
use todolist::config::Config;
use todolist::console::{self, ConsoleCommand};
use todolist::controller::{Message, TaskListController};
use todolist::models::Task;

#[derive(Parser)]
#[command(name = "todolist")]
#[command(about = "Console controller for a to-do list backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive console
    Run {
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Backend base URL (overrides config)
        #[arg(short, long)]
        server: Option<String>,

        /// Default weather city (overrides config)
        #[arg(long)]
        city: Option<String>,

        /// JSON array of tasks to list at start-up
        #[arg(long)]
        tasks: Option<PathBuf>,
    },

    /// Initialize a new config file
    Init {
        /// Output path for config file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they stay out of the rendered page
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("todolist=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            server,
            city,
            tasks,
        } => {
            let mut cfg = if let Some(path) = config {
                Config::load_from(&path)?
            } else {
                Config::load()?
            };

            // Override with CLI args
            if let Some(s) = server {
                cfg.backend.base_url = s;
            }
            if let Some(c) = city {
                cfg.weather.default_city = c;
            }

            let seed = match tasks {
                Some(path) => console::load_tasks(&path)?,
                None => Vec::new(),
            };

            run_console(cfg, seed).await
        }

        Commands::Init { output } => {
            let path = match output {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let cfg = Config::default();
            cfg.save_to(&path)?;

            println!("Created config file: {}", path.display());
            println!();
            println!("Next steps:");
            println!("  1. Point [backend] base_url at your task server");
            println!(
                "  2. Start the console: todolist run --config {}",
                path.display()
            );

            Ok(())
        }
    }
}

async fn run_console(config: Config, seed: Vec<Task>) -> Result<()> {
    let backend = HttpBackend::new(&config.backend).context("Failed to build HTTP client")?;
    tracing::info!(backend = %backend.base_url(), "Using task backend");

    let mut clock = time::interval(config.ui.clock_interval());
    clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut sweep = time::interval(Duration::from_millis(250));
    sweep.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut controller = TaskListController::new(backend, config);
    if !seed.is_empty() {
        controller.hydrate(seed);
    }
    controller.handle(Message::Start).await;
    print!("{}", console::render_page(&controller));
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };

                if controller.pending_confirmation().is_some() {
                    let confirmed = console::is_affirmative(&line);
                    controller.handle(Message::ConfirmDelete(confirmed)).await;
                    print!("{}", console::render_page(&controller));
                    continue;
                }

                let command = match console::parse_line(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(usage) => {
                        println!("{usage}");
                        continue;
                    }
                };
                if command == ConsoleCommand::Quit {
                    break;
                }

                for message in console::to_messages(command, &controller) {
                    controller.handle(message).await;
                }
                print!("{}", console::render_page(&controller));
            }
            _ = clock.tick() => controller.handle(Message::ClockTick).await,
            _ = sweep.tick() => controller.handle(Message::ExpireNotifications).await,
        }
    }

    tracing::info!("Console closed");
    Ok(())
}
