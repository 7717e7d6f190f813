use super::render::{print_report, progress_label};
use anyhow::Result;
use colored::Colorize;
use sleuth_application::SleuthApp;
use sleuth_core::claim::ClaimSuggester;
use std::process::ExitCode;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub async fn suggest(app: &SleuthApp) -> Result<ExitCode> {
    let models = app.models()?;
    let claim = models.suggester.suggest_claim().await?;
    println!("{}", claim);
    Ok(ExitCode::SUCCESS)
}

pub async fn check(app: &SleuthApp, claim: Option<String>) -> Result<ExitCode> {
    let models = app.models()?;

    let claim = match claim {
        Some(claim) => claim,
        None => {
            let suggested = models.suggester.suggest_claim().await?;
            println!("{} {}", "Suggested claim:".bright_black(), suggested);
            suggested
        }
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let orchestrator = app.orchestrator(&models).with_events(tx);

    let progress = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Some(label) = progress_label(event.state) {
                eprintln!("{}", label.bright_black());
            }
        }
    });

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("Interrupted; cancelling run");
                cancel.cancel();
            }
        })
    };

    let report = orchestrator.submit_with_cancel(&claim, cancel).await;
    ctrl_c.abort();
    // The orchestrator owns the sender; dropping it ends the progress task.
    drop(orchestrator);
    let _ = progress.await;

    print_report(&report);
    Ok(if report.is_done() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
