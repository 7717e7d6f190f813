use anyhow::Result;
use colored::Colorize;
use sleuth_application::SleuthApp;
use std::process::ExitCode;

pub async fn login(app: &SleuthApp, email: &str) -> Result<ExitCode> {
    let identity = app.account().login(email).await?;
    println!(
        "{} Logged in as {}",
        "✓".green(),
        identity.display_name().bold()
    );
    Ok(ExitCode::SUCCESS)
}

pub async fn logout(app: &SleuthApp) -> Result<ExitCode> {
    if app.account().logout().await? {
        println!("{} Logged out", "✓".green());
    } else {
        println!("{}", "Not logged in.".bright_black());
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn whoami(app: &SleuthApp) -> Result<ExitCode> {
    match app.account().whoami().await? {
        Some(identity) => {
            match &identity.name {
                Some(name) => println!("{} <{}>", name.bold(), identity.email),
                None => println!("{}", identity.email.bold()),
            }
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("{}", "Not logged in. Run `sleuth login <email>`.".bright_black());
            Ok(ExitCode::FAILURE)
        }
    }
}

pub async fn profile(app: &SleuthApp, name: Option<String>, clear_name: bool) -> Result<ExitCode> {
    if name.is_none() && !clear_name {
        return whoami(app).await;
    }

    let identity = app.account().update_name(name).await?;
    println!(
        "{} Profile updated. Hello, {}!",
        "✓".green(),
        identity.display_name().bold()
    );
    Ok(ExitCode::SUCCESS)
}
