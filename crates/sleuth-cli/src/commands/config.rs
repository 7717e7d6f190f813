use anyhow::{Context, Result};
use colored::Colorize;
use sleuth_application::{ConfigUseCase, InitOutcome, SleuthApp};
use std::process::ExitCode;

pub fn show(app: &SleuthApp) -> Result<ExitCode> {
    let rendered =
        toml::to_string_pretty(app.config()).context("Failed to render configuration")?;
    println!("{}", rendered.trim_end());
    Ok(ExitCode::SUCCESS)
}

pub fn path(setup: &ConfigUseCase) -> Result<ExitCode> {
    println!(
        "{:<8} {}",
        "config".bright_black(),
        setup.config_file().display()
    );
    println!("{:<8} {}", "data".bright_black(), setup.data_dir().display());
    Ok(ExitCode::SUCCESS)
}

pub fn init(setup: &ConfigUseCase, force: bool) -> Result<ExitCode> {
    let file = setup.config_file();
    match setup.init(force)? {
        InitOutcome::Written => {
            println!("Wrote {}", file.display());
            Ok(ExitCode::SUCCESS)
        }
        InitOutcome::AlreadyExists => {
            eprintln!("{} already exists (use --force to overwrite)", file.display());
            Ok(ExitCode::FAILURE)
        }
    }
}
