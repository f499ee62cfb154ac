//! Command-line interface for geominder.
//!
//! This module provides the CLI structure for the `gmind` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::reminder::Coordinates;

pub use commands::{
    AddCommand, ClearCommand, ConfigCommand, ListCommand, NearbyCommand, ShowCommand,
    StatusCommand, WatchCommand,
};

/// gmind - Location-based reminders
///
/// Store reminders tied to places and get notified when a position fix
/// enters one of them.
#[derive(Debug, Parser)]
#[command(name = "gmind")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List saved reminders
    List(ListCommand),

    /// Create a reminder
    Add(AddCommand),

    /// Show one reminder
    Show(ShowCommand),

    /// Delete every reminder
    Clear(ClearCommand),

    /// List reminders around a position
    Nearby(NearbyCommand),

    /// Read `lat,lon` fixes from stdin and print reminders as they trigger
    Watch(WatchCommand),

    /// Show database status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

/// Parse one position fix line for `gmind watch`.
///
/// Accepts `lat,lon` or `lat lon`. Returns `None` for blank lines, `#`
/// comments, and anything that isn't two numbers.
#[must_use]
pub fn parse_fix(line: &str) -> Option<Coordinates> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut parts = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty());
    let latitude = parts.next()?.parse().ok()?;
    let longitude = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    Some(Coordinates::new(latitude, longitude))
}
