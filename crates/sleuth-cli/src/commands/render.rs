//! Terminal rendering of results and history.

use chrono::Local;
use colored::{ColoredString, Colorize};
use sleuth_application::{HistoryOutcome, RunState, SubmissionReport};
use sleuth_core::SleuthError;
use sleuth_core::assessment::{AccuracyAssessment, AccuracyVerdict};
use sleuth_core::evidence::EvidenceSet;
use sleuth_core::history::HistoryEntry;

const CLAIM_PREVIEW_CHARS: usize = 60;

pub fn progress_label(state: RunState) -> Option<&'static str> {
    match state {
        RunState::EvidenceFetching => Some("Retrieving articles and fact-checks..."),
        RunState::Assessing => Some("Assessing accuracy..."),
        RunState::Persisting => Some("Saving to history..."),
        _ => None,
    }
}

fn verdict_colored(assessment: &AccuracyAssessment) -> ColoredString {
    let text = format!("{}% {}", assessment.percent(), assessment.verdict());
    match assessment.verdict() {
        AccuracyVerdict::LikelyAccurate => text.green().bold(),
        AccuracyVerdict::Mixed => text.yellow().bold(),
        AccuracyVerdict::LikelyInaccurate => text.red().bold(),
    }
}

fn print_evidence(evidence: &EvidenceSet) {
    println!("{}", "Articles".bold().underline());
    if evidence.is_empty() {
        println!("  {}", "No related articles were found.".bright_black());
    }
    for (idx, article) in evidence.articles().iter().enumerate() {
        println!("  {}. {}", idx + 1, article);
    }
    println!();
}

fn print_assessment(assessment: &AccuracyAssessment) {
    println!("{} {}", "Accuracy".bold().underline(), verdict_colored(assessment));
    println!("{}", assessment.explanation);
    if !assessment.sources.is_empty() {
        println!();
        println!("{}", "Sources".bold());
        for source in &assessment.sources {
            println!("  - {}", source.cyan());
        }
    }
    println!();
}

fn print_error(err: &SleuthError) {
    eprintln!("{} {}", "✗".red(), err.user_message().red());
    if let SleuthError::Upstream {
        retry_after_secs: Some(secs),
        ..
    } = err
    {
        eprintln!("  {}", format!("The service asked to retry after {}s.", secs).bright_black());
    } else if err.is_retryable() {
        eprintln!("  {}", "This may be temporary; try again shortly.".bright_black());
    }
}

pub fn print_report(report: &SubmissionReport) {
    println!();
    println!("{} {}", "Claim:".bold(), report.claim);
    println!();

    if let Some(evidence) = &report.evidence {
        print_evidence(evidence);
    }
    if let Some(assessment) = &report.assessment {
        print_assessment(assessment);
    }
    if let Some(err) = &report.error {
        print_error(err);
    }

    match &report.history {
        HistoryOutcome::Saved(id) => {
            println!("{}", format!("Saved to history as {}", id).bright_black());
        }
        HistoryOutcome::NotSaved(err) => {
            eprintln!("{} {}", "⚠".yellow(), err.user_message().yellow());
        }
        HistoryOutcome::NotAttempted => {}
    }
}

fn preview(claim: &str) -> String {
    if claim.chars().count() <= CLAIM_PREVIEW_CHARS {
        return claim.to_string();
    }
    let cut: String = claim.chars().take(CLAIM_PREVIEW_CHARS - 1).collect();
    format!("{}…", cut)
}

pub fn print_entry_line(entry: &HistoryEntry) {
    let when = entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M");
    let score = match &entry.assessment {
        Some(assessment) => verdict_colored(assessment),
        None => "n/a".bright_black(),
    };
    println!(
        "{}  {}  {}  {}",
        entry.id.to_string().bright_black(),
        when,
        score,
        preview(entry.claim.as_str())
    );
}

pub fn print_entry(entry: &HistoryEntry) {
    let when = entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
    println!("{} {}", "Claim:".bold(), entry.claim);
    println!("{} {}", "Checked:".bold(), when);
    println!();

    if let Some(evidence) = &entry.evidence {
        print_evidence(evidence);
    }
    match &entry.assessment {
        Some(assessment) => print_assessment(assessment),
        None => println!("{}", "No assessment was recorded.".bright_black()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "é".repeat(CLAIM_PREVIEW_CHARS + 5);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), CLAIM_PREVIEW_CHARS);
        assert!(shown.ends_with('…'));
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_progress_labels() {
        assert!(progress_label(RunState::Assessing).is_some());
        assert!(progress_label(RunState::Done).is_none());
    }
}
