//! AccuracyAssessment domain model.

use crate::error::{Result, SleuthError};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// The model's judgement of a claim against the supplied evidence.
///
/// `accuracy_score` must lie in `[0, 1]`. Use [`AccuracyAssessment::validated`]
/// on anything received from outside the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccuracyAssessment {
    /// 0 is completely inaccurate, 1 is completely accurate.
    pub accuracy_score: f64,
    pub explanation: String,
    /// Source URLs, in the order the model listed them.
    pub sources: Vec<String>,
}

impl AccuracyAssessment {
    /// Rejects scores outside the closed unit interval.
    ///
    /// Out-of-range values are a contract violation of the assessor and are
    /// never clamped.
    pub fn validated(self) -> Result<Self> {
        let score = self.accuracy_score;
        if !(0.0..=1.0).contains(&score) {
            return Err(SleuthError::invalid_response(format!(
                "accuracy score {} is outside [0, 1]",
                score
            )));
        }
        Ok(self)
    }

    /// Score as a whole percentage, rounded half away from zero.
    pub fn percent(&self) -> u8 {
        (self.accuracy_score * 100.0).round().clamp(0.0, 100.0) as u8
    }

    pub fn verdict(&self) -> AccuracyVerdict {
        AccuracyVerdict::from_score(self.accuracy_score)
    }
}

/// Display band for an accuracy score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum AccuracyVerdict {
    #[strum(serialize = "Likely Accurate")]
    LikelyAccurate,
    #[strum(serialize = "Mixed/Uncertain")]
    Mixed,
    #[strum(serialize = "Likely Inaccurate")]
    LikelyInaccurate,
}

impl AccuracyVerdict {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.75 {
            Self::LikelyAccurate
        } else if score >= 0.4 {
            Self::Mixed
        } else {
            Self::LikelyInaccurate
        }
    }
}
