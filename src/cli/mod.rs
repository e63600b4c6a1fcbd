//! CLI module for PMP File Gateway
//!
//! Provides the `serve` subcommand, which runs the HTTP gateway.

pub mod serve;

use clap::{Parser, Subcommand};

/// PMP File Gateway - API-key protected static file delivery
#[derive(Parser)]
#[command(name = "pmp-file-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the file gateway
    Serve(serve::ServeArgs),
}
