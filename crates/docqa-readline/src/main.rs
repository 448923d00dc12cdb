use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tracing_subscriber::EnvFilter;

use docqa_application::{QuestionOutcome, RejectReason, SessionController, build_services};
use docqa_core::config::{ClientConfig, ServiceMode};
use docqa_core::DocumentFile;

mod command;
mod helper;
mod render;

use command::ReplCommand;
use helper::CliHelper;

#[derive(Parser)]
#[command(name = "docqa")]
#[command(about = "DocQA - ask questions about a document", long_about = None)]
struct Cli {
    /// Use the simulated backend (canned answers, no network)
    #[arg(long)]
    simulate: bool,

    /// Base URL of the document Q&A service
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Config file (defaults to ~/.config/docqa/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    fn resolve_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = ClientConfig::from_file(path)
                    .with_context(|| format!("loading {}", path.display()))?;
                config.apply_env(|key| std::env::var(key).ok());
                config
            }
            None => ClientConfig::load()?,
        };

        if let Some(url) = &self.base_url {
            config = config.with_base_url(url);
        }
        if self.simulate {
            config = config.with_mode(ServiceMode::Simulated);
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// The entry point for the DocQA REPL.
///
/// Sets up the session controller from configuration, then loops:
/// 1. Reads a line (slash command or question)
/// 2. Drives the controller to completion for uploads and questions
/// 3. Prints the transcript entries the transition produced
///
/// Uploads and questions run through [`render::drive`], which prints a
/// progress line while the service call is in flight.
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    tracing::debug!(mode = ?config.mode, base_url = %config.base_url, "Configuration resolved");
    let services = build_services(&config)?;
    let mut controller = SessionController::from_services(services);
    let mut snapshots = controller.subscribe();

    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Document Q&A ===".bright_magenta().bold());
    match config.mode {
        ServiceMode::Simulated => println!("{}", "Backend: simulated".bright_black()),
        ServiceMode::Http => println!("{}", format!("Backend: {}", config.base_url).bright_black()),
    }
    println!(
        "{}",
        "Type '/upload <path>' to load a document, '/help' for commands, or 'quit' to exit."
            .bright_black()
    );
    println!();

    let mut shown = 0;

    loop {
        let prompt = if controller.can_ask() { "?> " } else { ">> " };

        match rl.readline(prompt) {
            Ok(line) => {
                let command = ReplCommand::parse(&line);
                if command != ReplCommand::Empty {
                    let _ = rl.add_history_entry(line.as_str());
                }

                match command {
                    ReplCommand::Empty => continue,
                    ReplCommand::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    ReplCommand::Help => render::print_help(),
                    ReplCommand::Status => render::print_status(&controller.snapshot()),
                    ReplCommand::Unknown(name) => {
                        println!("{}", format!("Unknown command: {name}").bright_black());
                    }
                    ReplCommand::UploadMissingPath => {
                        println!("{}", "Usage: /upload <path>".yellow());
                    }
                    ReplCommand::Upload(path) => {
                        let file = match DocumentFile::from_path(&path).await {
                            Ok(file) => file,
                            Err(err) => {
                                let text = format!("Cannot read {}: {}", path.display(), err);
                                println!("{}", text.red());
                                continue;
                            }
                        };
                        if file.kind().is_none() {
                            println!(
                                "{}",
                                "Note: only PDF, DOCX and TXT files are supported by the backend."
                                    .yellow()
                            );
                        }

                        let submission = controller.submit_file(file);
                        render::drive(submission, &mut snapshots, &mut shown).await;
                    }
                    ReplCommand::Ask(question) => {
                        let submission = controller.submit_question(&question);
                        let outcome = render::drive(submission, &mut snapshots, &mut shown).await;
                        if let QuestionOutcome::Rejected(reason) = outcome {
                            print_rejection(reason);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

fn print_rejection(reason: RejectReason) {
    let text = match reason {
        RejectReason::EmptyQuestion => "Please type a question.",
        RejectReason::NoDocument => "Upload a document first with /upload <path>.",
    };
    println!("{}", text.yellow());
}
