//! Todo Lists entry point
//!
//! Loads settings, starts a session against the configured store and prints
//! the lists it ended up with.

use std::path::Path;
use std::process::ExitCode;

use todo_lists::{SessionController, Settings};

const SETTINGS_FILE: &str = "todo-lists.toml";

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match Settings::load(Path::new(SETTINGS_FILE)) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = settings.init_logging() {
        eprintln!("Failed to init rolling logger: {}", e);
    }

    let mut session = match SessionController::from_settings(&settings) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Failed to open store: {}", e);
            eprintln!("Failed to open store: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let source = session.start().await;
    if let Some(issue) = session.last_load_issue() {
        eprintln!("Using {:?} data: {}", source, issue);
    }

    let snapshot = session.snapshot();
    for list in snapshot.lists() {
        println!("{} ({}/{} done)", list.title, list.completed_count(), list.len());
        for item in &list.items {
            println!("  [{}] {}", if item.completed { "x" } else { " " }, item.text);
        }
    }
    if snapshot.is_empty() {
        println!("No lists yet.");
    }

    session.flush().await;
    ExitCode::SUCCESS
}
