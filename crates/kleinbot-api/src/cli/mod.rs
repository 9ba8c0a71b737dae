//! CLI command definitions for the `kleinbot` binary.

pub mod check_config;
pub mod classify;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use kleinbot_infra::config::DEFAULT_CONFIG_FILE;

/// KleinBot: a Messenger chatbot webhook server.
#[derive(Parser)]
#[command(name = "kleinbot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, env = "KLEINBOT_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the webhook server.
    Serve {
        /// Override `[server].host`.
        #[arg(long)]
        host: Option<String>,
        /// Override `[server].port`.
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },

    /// Show which trigger rule a message resolves to (offline).
    Classify {
        /// The message text.
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
        /// Also list rules shadowed by the winning one.
        #[arg(long)]
        all: bool,
    },

    /// Print the effective configuration and which secrets are set.
    CheckConfig,
}
