//! Claim-assessment pipeline.
//!
//! # Module Structure
//!
//! - `state`: `RunState` machine and `RunEvent` progress notifications
//! - `report`: `SubmissionReport` and `HistoryOutcome`
//! - `sleuth_orchestrator`: `SleuthOrchestrator`, runs one submission

mod report;
mod sleuth_orchestrator;
mod state;

pub use report::{HistoryOutcome, SubmissionReport};
pub use sleuth_orchestrator::SleuthOrchestrator;
pub use state::{RunEvent, RunState};
