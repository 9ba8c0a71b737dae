//! Short-term, per-user conversational memory.
//!
//! [`store::SessionStore`] is the port; [`memory::InMemorySessionStore`] is
//! the process-local implementation used in production. Sessions expire
//! lazily: a stale session is replaced on its next access, never by a
//! background sweep.

pub mod memory;
pub mod store;

pub use memory::InMemorySessionStore;
pub use store::{SessionPolicy, SessionStore, render_context};
