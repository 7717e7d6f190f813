//! Application layer for Truth Sleuth.
//!
//! Use cases on top of the domain traits, plus the wiring that picks the
//! concrete backends.

pub mod account_usecase;
pub mod app;
pub mod config_usecase;
pub mod history_usecase;
pub mod orchestrator;

pub use account_usecase::AccountUseCase;
pub use app::{AppOptions, SleuthApp};
pub use config_usecase::{ConfigUseCase, InitOutcome};
pub use history_usecase::HistoryUseCase;
pub use orchestrator::{HistoryOutcome, RunEvent, RunState, SleuthOrchestrator, SubmissionReport};
