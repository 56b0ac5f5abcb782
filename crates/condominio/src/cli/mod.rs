//! Command-line interface for condominio.
//!
//! This module provides the CLI structure for the `condo` binary. Each
//! page of the application is a subcommand group.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AnnouncementCommand, ConfigCommand, ContactsCommand, DashboardCommand, DeleteArgs,
    DocumentCommand, FeedCommand, IssueCommand, ListArgs, OutputFormat, ProfileCommand,
    ReservationCommand, ServeCommand, StatusArg, StoreCommand, UrgencyArg,
};

/// condo - Manage your building from the terminal
///
/// Announcements, documents, issue reports and amenity bookings kept in a
/// local database, plus a small HTTP backend for the shared announcement feed.
#[derive(Debug, Parser)]
#[command(name = "condo")]
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
    /// Show the navigation cards and a summary of every collection
    Dashboard(DashboardCommand),

    /// Show the building's contact directory
    Contacts(ContactsCommand),

    /// Manage announcements
    #[command(subcommand, visible_alias = "avvisi")]
    Announcements(AnnouncementCommand),

    /// Manage documents
    #[command(subcommand, visible_alias = "documenti")]
    Documents(DocumentCommand),

    /// Manage issue reports
    #[command(subcommand, visible_alias = "segnalazioni")]
    Issues(IssueCommand),

    /// Manage amenity reservations
    #[command(subcommand, visible_alias = "prenotazioni")]
    Reservations(ReservationCommand),

    /// View or change the user profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Inspect the raw key-value store
    #[command(subcommand)]
    Store(StoreCommand),

    /// Run the announcements backend
    Serve(ServeCommand),

    /// Read or post to the announcements backend
    #[command(subcommand)]
    Feed(FeedCommand),

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
