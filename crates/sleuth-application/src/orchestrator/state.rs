//! Run states and progress events.

use serde::Serialize;
use strum::Display;
use uuid::Uuid;

/// Where a single submission is in the pipeline.
///
/// ```text
/// Idle -> EvidenceFetching -> Assessing -> Persisting -> Done
///   \            \               \             \
///    +------------+---------------+-------------+--> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    EvidenceFetching,
    Assessing,
    Persisting,
    Done,
    Failed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Idle, EvidenceFetching)
                | (EvidenceFetching, Assessing)
                | (Assessing, Persisting)
                | (Persisting, Done)
                | (Idle | EvidenceFetching | Assessing | Persisting, Failed)
        )
    }
}

/// Progress notification for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunEvent {
    pub run_id: Uuid,
    pub state: RunState,
}
