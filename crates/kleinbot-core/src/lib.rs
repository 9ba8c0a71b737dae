//! Business logic and collaborator ports for KleinBot.
//!
//! This crate owns the conversational core: the ordered trigger table, the
//! TTL-bounded session store, reply synthesis and post-processing, and the
//! per-message pipeline that ties them together. External services are
//! reached only through the port traits in [`llm`], [`messenger`] and
//! [`speech`]; their implementations live in `kleinbot-infra`.

pub mod clock;
pub mod conversation;
pub mod llm;
pub mod messenger;
pub mod reply;
pub mod session;
pub mod speech;
pub mod trigger;

#[cfg(test)]
pub(crate) mod testing;
