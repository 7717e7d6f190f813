//! Session domain module.
//!
//! Who is asking. The client holds only an opaque token; the authority that
//! issued it resolves it to an identity on every use.
//!
//! # Module Structure
//!
//! - `model`: `SessionIdentity` and `SessionToken`
//! - `authority`: `SessionAuthority`, issues, verifies and revokes tokens
//! - `store`: `SessionStore`, the client-local holder of the current token
//! - `context`: `SessionContext`, resolves the current identity from both

mod authority;
mod context;
mod model;
mod store;

pub use authority::SessionAuthority;
pub use context::SessionContext;
pub use model::{SessionIdentity, SessionToken};
pub use store::SessionStore;
