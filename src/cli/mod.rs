//! CLI module - command-line interface for the clinic server.
//!
//! Maintenance commands run against the same database as the server and are
//! audited with source address `cli`.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// School clinic record keeping: visits, follow-ups, referrals and
/// appointments behind a small HTTP API.
#[derive(Parser)]
#[command(name = "clinicdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Write a JSON snapshot of all records
    Backup {
        /// Destination file
        file: PathBuf,
    },

    /// Replace all records with a JSON snapshot
    Restore {
        /// Snapshot file written by `backup` or the web interface
        file: PathBuf,
    },

    /// Delete every student and their records for a new school year
    ResetYear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Import students from a CSV roster, skipping names already present
    ImportRoster {
        /// CSV file with a header row
        file: PathBuf,
    },

    /// Create a user account
    CreateUser {
        username: String,
        /// "Admin" or "School Nurse"
        role: String,
        #[arg(long)]
        password: String,
    },
}

pub use commands::*;
