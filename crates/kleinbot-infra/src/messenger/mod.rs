//! Messaging platform clients.

pub mod graph;

pub use graph::GraphMessengerClient;
