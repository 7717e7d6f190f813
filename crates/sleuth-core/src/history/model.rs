//! HistoryEntry domain model.

use crate::assessment::AccuracyAssessment;
use crate::claim::Claim;
use crate::evidence::EvidenceSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a stored history entry.
///
/// Assigned by the store at creation time. Anything that does not parse as a
/// hyphenated or simple UUID is not an identifier at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier, returning `None` for malformed input.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// One completed fact-check, as stored for a user.
///
/// Entries are immutable once created; there is no update or delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: EntryId,
    /// Session identity (email) the entry belongs to.
    pub user_id: String,
    pub claim: Claim,
    #[serde(alias = "articles")]
    pub evidence: Option<EvidenceSet>,
    #[serde(alias = "accuracyResult")]
    pub assessment: Option<AccuracyAssessment>,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Builds a new entry with a fresh id and the current time.
    pub fn create(
        user_id: impl Into<String>,
        claim: Claim,
        evidence: Option<EvidenceSet>,
        assessment: Option<AccuracyAssessment>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            user_id: user_id.into(),
            claim,
            evidence,
            assessment,
            timestamp: Utc::now(),
        }
    }

    pub fn belongs_to(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
