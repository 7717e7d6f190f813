//! Evidence domain module.
//!
//! - `model`: the ordered article list returned by retrieval (`EvidenceSet`)
//! - `source`: the retrieval capability (`EvidenceSource`)

mod model;
mod source;

pub use model::{EVIDENCE_SEPARATOR, EvidenceSet};
pub use source::EvidenceSource;
