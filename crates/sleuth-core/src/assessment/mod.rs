//! Assessment domain module.
//!
//! - `model`: accuracy score, explanation and sources (`AccuracyAssessment`),
//!   plus the display band derived from the score (`AccuracyVerdict`)
//! - `assessor`: the scoring capability (`AssessmentModel`)

mod assessor;
mod model;

pub use assessor::AssessmentModel;
pub use model::{AccuracyAssessment, AccuracyVerdict};
