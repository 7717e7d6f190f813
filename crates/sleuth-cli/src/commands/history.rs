use super::render::{print_entry, print_entry_line};
use anyhow::Result;
use colored::Colorize;
use sleuth_application::SleuthApp;
use std::process::ExitCode;

pub async fn list(app: &SleuthApp) -> Result<ExitCode> {
    let entries = app.history().list().await?;
    if entries.is_empty() {
        println!("{}", "No checks yet. Try `sleuth check <claim>`.".bright_black());
        return Ok(ExitCode::SUCCESS);
    }

    for entry in &entries {
        print_entry_line(entry);
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn show(app: &SleuthApp, id: &str) -> Result<ExitCode> {
    match app.history().show(id).await? {
        Some(entry) => {
            print_entry(&entry);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("{} No history entry with id {}", "✗".red(), id.bold());
            Ok(ExitCode::FAILURE)
        }
    }
}
