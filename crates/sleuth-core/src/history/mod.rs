//! History domain module.
//!
//! This module contains the per-user query history: the stored record, the
//! document-collection contract backends implement, and the validating store
//! the rest of the application talks to.
//!
//! # Module Structure
//!
//! - `model`: `HistoryEntry` and its identifier `EntryId`
//! - `repository`: `HistoryRepository`, the document-collection contract
//! - `store`: `HistoryStore`, validation, tenant filtering and error mapping
//!
//! # Usage
//!
//! ```ignore
//! use sleuth_core::history::{HistoryEntry, HistoryRepository, HistoryStore};
//! ```

mod model;
mod repository;
mod store;

pub use model::{EntryId, HistoryEntry};
pub use repository::HistoryRepository;
pub use store::{HISTORY_LIST_LIMIT, HistoryStore};
