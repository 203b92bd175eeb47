//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use regcal_core::Term;

/// WebReg schedule to calendar converter.
///
/// Parses a pasted schedule dump into session records and synthesizes
/// calendar events for one academic quarter.
#[derive(Debug, Parser)]
#[command(name = "regcal", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a schedule dump and print the session records as JSON.
    Parse {
        /// Schedule text file, or `-` for stdin.
        input: PathBuf,

        /// Academic term (fall, winter, spring, summer1, summer2).
        #[arg(short, long)]
        term: Term,

        /// Calendar year of the quarter.
        #[arg(short, long)]
        year: i32,
    },

    /// Write an iCalendar document for the synthesized events.
    Export {
        /// Schedule text file, or `-` for stdin.
        input: PathBuf,

        /// Academic term (fall, winter, spring, summer1, summer2).
        #[arg(short, long)]
        term: Term,

        /// Calendar year of the quarter.
        #[arg(short, long)]
        year: i32,

        /// Directory for the document; defaults to the configured output
        /// directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the synthesized events as JSON, one list entry per
    /// calendar-service create call.
    Events {
        /// Schedule text file, or `-` for stdin.
        input: PathBuf,

        /// Academic term (fall, winter, spring, summer1, summer2).
        #[arg(short, long)]
        term: Term,

        /// Calendar year of the quarter.
        #[arg(short, long)]
        year: i32,
    },
}
