//! Domain layer for Truth Sleuth.
//!
//! Data contracts and capability traits for the claim-assessment pipeline:
//! evidence retrieval, accuracy scoring, per-user history and sessions. No I/O
//! happens in this crate; backends live in `sleuth-infrastructure` and
//! `sleuth-interaction`.

pub mod assessment;
pub mod claim;
pub mod config;
pub mod error;
pub mod evidence;
pub mod history;
pub mod session;

// Re-export common error type
pub use error::{Result, SleuthError, UpstreamErrorKind};
