//! Local backends for Truth Sleuth.
//!
//! Everything that touches the filesystem: configuration, the history
//! document store and the session registry.

pub mod config_service;
pub mod file_session_store;
pub mod in_memory_history_repository;
pub mod json_dir_history_repository;
pub mod local_session_authority;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::file_session_store::{FileSessionStore, InMemorySessionStore};
pub use crate::in_memory_history_repository::InMemoryHistoryRepository;
pub use crate::json_dir_history_repository::JsonDirHistoryRepository;
pub use crate::local_session_authority::LocalSessionAuthority;
pub use crate::paths::{PathError, ServiceType, SleuthPaths};
