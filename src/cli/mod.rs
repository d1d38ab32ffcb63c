//! CLI module for Reco Gateway
//!
//! Provides subcommands:
//! - `serve`: run the HTTP server
//! - `check`: load configuration and artifacts, report, exit

pub mod check;
pub mod serve;

use clap::{Parser, Subcommand};

/// Reco Gateway - recommendation strategies behind one authenticated endpoint
#[derive(Parser)]
#[command(name = "reco-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Validate configuration and load every artifact without serving
    Check,
}
