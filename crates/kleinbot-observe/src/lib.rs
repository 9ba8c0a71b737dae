//! Observability setup for KleinBot: structured logging through
//! `tracing-subscriber`, with optional OpenTelemetry span export.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, shutdown_tracing, verbosity_directive};
