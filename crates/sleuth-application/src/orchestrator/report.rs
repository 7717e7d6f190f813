//! Outcome of a single submission.

use super::state::RunState;
use sleuth_core::assessment::AccuracyAssessment;
use sleuth_core::error::SleuthError;
use sleuth_core::evidence::EvidenceSet;
use sleuth_core::history::EntryId;
use uuid::Uuid;

/// What happened to the history write of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryOutcome {
    /// The run never got as far as persisting.
    NotAttempted,
    Saved(EntryId),
    /// The write failed; the computed result still stands.
    NotSaved(SleuthError),
}

/// Everything the presentation layer needs after a run.
///
/// Partial results are kept: a run that failed during assessment still
/// carries the evidence it fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReport {
    pub run_id: Uuid,
    /// The text as submitted.
    pub claim: String,
    pub state: RunState,
    pub evidence: Option<EvidenceSet>,
    pub assessment: Option<AccuracyAssessment>,
    /// First error of the run. Persistence failures are reported in
    /// `history` instead.
    pub error: Option<SleuthError>,
    pub history: HistoryOutcome,
}

impl SubmissionReport {
    pub(crate) fn new(run_id: Uuid, claim: impl Into<String>) -> Self {
        Self {
            run_id,
            claim: claim.into(),
            state: RunState::Idle,
            evidence: None,
            assessment: None,
            error: None,
            history: HistoryOutcome::NotAttempted,
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == RunState::Done
    }

    pub fn entry_id(&self) -> Option<EntryId> {
        match self.history {
            HistoryOutcome::Saved(id) => Some(id),
            _ => None,
        }
    }

    /// Non-fatal warning to show next to the result, if any.
    pub fn history_warning(&self) -> Option<&SleuthError> {
        match &self.history {
            HistoryOutcome::NotSaved(err) => Some(err),
            _ => None,
        }
    }
}
