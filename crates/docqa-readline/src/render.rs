//! Terminal rendering of session snapshots.

use colored::Colorize;
use docqa_core::session::{ConversationMessage, MessageRole, SessionSnapshot, SessionState};
use tokio::sync::watch;

/// Prints one transcript entry, colored by role.
pub fn print_message(message: &ConversationMessage) {
    match message.role {
        MessageRole::User => println!("{}", format!("> {}", message.content.trim()).green()),
        MessageRole::Assistant => {
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
            println!();
        }
        MessageRole::System if message.is_error() => println!("{}", message.content.red()),
        MessageRole::System => println!("{}", message.content.bright_yellow()),
    }
}

/// Prints the messages that appeared after the first `already_shown`.
///
/// Returns the new count of shown messages.
pub fn print_new_messages(snapshot: &SessionSnapshot, already_shown: usize) -> usize {
    for message in snapshot.messages.iter().skip(already_shown) {
        print_message(message);
    }
    snapshot.messages.len()
}

/// Prints a one-line session summary.
pub fn print_status(snapshot: &SessionSnapshot) {
    let state = match snapshot.state {
        SessionState::Idle => "idle - upload a document to begin".normal(),
        SessionState::Uploading => "processing document".yellow(),
        SessionState::Ready => "ready".green(),
        SessionState::AwaitingAnswer => "waiting for answer".yellow(),
        SessionState::Error => "last upload failed - upload again".red(),
    };
    println!("{} {}", "State:".bold(), state);

    if let Some(document) = &snapshot.document {
        println!(
            "{} {} ({} chunks, id {})",
            "Document:".bold(),
            document.display_name,
            document.chunk_count,
            document.id.bright_black()
        );
    }
    println!("{} {}", "Messages:".bold(), snapshot.messages.len());
}

pub fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  /upload <path>  upload a PDF, DOCX or TXT document");
    println!("  /status         show the session state");
    println!("  /help           show this help");
    println!("  /quit           exit");
    println!("{}", "Anything else is sent as a question about the document.".bright_black());
}

fn print_progress(state: SessionState) {
    let text = match state {
        SessionState::Uploading => "Processing document...",
        SessionState::AwaitingAnswer => "Thinking...",
        _ => return,
    };
    println!("{}", text.bright_black().italic());
}

/// Runs a submission while echoing its snapshots.
///
/// Snapshots are read on the task that polls the submission, so the progress
/// line always lands between the messages that started the call and the ones
/// that finished it. `shown` tracks how many messages are already on screen.
pub async fn drive<F: Future>(
    submission: F,
    snapshots: &mut watch::Receiver<SessionSnapshot>,
    shown: &mut usize,
) -> F::Output {
    tokio::pin!(submission);
    let mut watching = true;

    let output = loop {
        tokio::select! {
            biased;
            output = &mut submission => break output,
            changed = snapshots.changed(), if watching => {
                if changed.is_err() {
                    watching = false;
                    continue;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                *shown = print_new_messages(&snapshot, *shown);
                if snapshot.busy {
                    print_progress(snapshot.state);
                }
            }
        }
    };

    let snapshot = snapshots.borrow_and_update().clone();
    *shown = print_new_messages(&snapshot, *shown);
    output
}
