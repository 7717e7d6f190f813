//! Model-service layer for Truth Sleuth.
//!
//! Talks to hosted language models over HTTP and turns their answers into
//! the domain types of `sleuth-core`.
//!
//! # Module Structure
//!
//! - `completion`: provider-neutral `CompletionBackend`
//! - `openai_api_backend` / `gemini_api_backend`: the two HTTP clients
//! - `prompts`: templates and answer shapes of each flow
//! - `structured`: lenient JSON extraction, strict decoding
//! - `llm_*`: the core traits implemented on top of a backend
//! - `factory`: wiring from `ModelSettings`

pub mod completion;
pub mod factory;
pub mod gemini_api_backend;
pub mod http;
pub mod llm_assessment_model;
pub mod llm_claim_suggester;
pub mod llm_evidence_source;
pub mod openai_api_backend;
pub mod prompts;
pub mod structured;

pub use completion::{CompletionBackend, CompletionRequest};
pub use factory::{ModelServices, build_backend};
pub use gemini_api_backend::GeminiApiBackend;
pub use llm_assessment_model::LlmAssessmentModel;
pub use llm_claim_suggester::LlmClaimSuggester;
pub use llm_evidence_source::LlmEvidenceSource;
pub use openai_api_backend::OpenAIApiBackend;
