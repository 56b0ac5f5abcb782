//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::model::{IssueStatus, Urgency};

/// Arguments shared by every `list` subcommand.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Arguments shared by every `delete` subcommand.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Id of the record to delete
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Dashboard command arguments.
#[derive(Debug, Args)]
pub struct DashboardCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Contacts command arguments.
#[derive(Debug, Args)]
pub struct ContactsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Announcement board commands.
#[derive(Debug, Subcommand)]
pub enum AnnouncementCommand {
    /// List announcements, newest first
    List(ListArgs),

    /// Publish a new announcement
    Add {
        /// Headline
        #[arg(short, long)]
        title: String,

        /// Body text
        #[arg(short = 'b', long)]
        content: String,
    },

    /// Edit an announcement (its date is refreshed)
    Edit {
        /// Id of the announcement
        id: String,

        /// New headline
        #[arg(short, long)]
        title: Option<String>,

        /// New body text
        #[arg(short = 'b', long)]
        content: Option<String>,
    },

    /// Delete an announcement
    Delete(DeleteArgs),
}

/// Document archive commands.
#[derive(Debug, Subcommand)]
pub enum DocumentCommand {
    /// List documents, newest upload first
    List(ListArgs),

    /// Add a document
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Kind of document, e.g. "Regolamento", "Verbale"
        #[arg(short = 't', long = "type")]
        kind: String,

        /// Link to the file
        #[arg(short, long)]
        url: Option<String>,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// Edit a document
    Edit {
        /// Id of the document
        id: String,

        /// New display name
        #[arg(short, long)]
        name: Option<String>,

        /// New kind
        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        /// New link
        #[arg(short, long)]
        url: Option<String>,

        /// Replacement comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// Delete a document
    Delete(DeleteArgs),
}

/// Issue report commands.
#[derive(Debug, Subcommand)]
pub enum IssueCommand {
    /// List issue reports, newest first
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,

        /// Only show open issues
        #[arg(long)]
        open: bool,
    },

    /// Report a problem
    Report {
        /// What is wrong
        #[arg(short, long)]
        description: String,

        /// Where it is
        #[arg(short, long)]
        location: String,

        /// How urgent it is
        #[arg(short, long, value_enum, default_value = "media")]
        urgency: UrgencyArg,

        /// Extra position hint, e.g. "vicino all'ascensore"
        #[arg(long)]
        details: Option<String>,

        /// Reference to a photo
        #[arg(long)]
        photo: Option<String>,
    },

    /// Edit an issue report
    ///
    /// Status, priority, vendor and notes require an administrator profile.
    Edit {
        /// Id of the issue
        id: String,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New location
        #[arg(short, long)]
        location: Option<String>,

        /// New position hint (empty to clear)
        #[arg(long)]
        details: Option<String>,

        /// New photo reference (empty to clear)
        #[arg(long)]
        photo: Option<String>,

        /// New urgency
        #[arg(short, long, value_enum)]
        urgency: Option<UrgencyArg>,

        /// New status
        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,

        /// New priority
        #[arg(short, long, value_enum)]
        priority: Option<UrgencyArg>,

        /// Assigned contractor (empty to clear)
        #[arg(long)]
        vendor: Option<String>,

        /// Resolution notes (empty to clear)
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete an issue report
    Delete(DeleteArgs),
}

/// Amenity reservation commands.
#[derive(Debug, Subcommand)]
pub enum ReservationCommand {
    /// List reservations, earliest first
    List(ListArgs),

    /// Book an amenity
    Book {
        /// Amenity to book, e.g. "Sala Riunioni"
        #[arg(short, long)]
        amenity: String,

        /// Who is booking
        #[arg(short = 'n', long = "user")]
        user_name: String,

        /// Day (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Start time (HH:MM)
        #[arg(short, long)]
        time: String,
    },

    /// Edit a reservation
    Edit {
        /// Id of the reservation
        id: String,

        /// New amenity
        #[arg(short, long)]
        amenity: Option<String>,

        /// New booker
        #[arg(short = 'n', long = "user")]
        user_name: Option<String>,

        /// New day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// New start time (HH:MM)
        #[arg(short, long)]
        time: Option<String>,
    },

    /// Cancel a reservation
    Delete(DeleteArgs),
}

/// User profile commands.
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the stored profile
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Create or update the profile
    Set {
        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Email address
        #[arg(short, long)]
        email: Option<String>,

        /// Phone number
        #[arg(short, long)]
        phone: Option<String>,

        /// Grant or revoke administrator rights
        #[arg(long)]
        admin: Option<bool>,

        /// Unit as ADDRESS:TYPE (repeatable, replaces the list)
        #[arg(long = "unit", value_name = "ADDRESS:TYPE")]
        units: Vec<String>,
    },
}

/// Raw storage commands.
#[derive(Debug, Subcommand)]
pub enum StoreCommand {
    /// List stored keys
    Keys,

    /// Print the JSON stored under a key
    Get {
        /// Storage key, e.g. "condo_issues"
        key: String,
    },

    /// Remove a key
    Remove {
        /// Storage key
        key: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show database statistics
    Stats {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to listen on (overrides `server.bind`)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,
}

/// Announcement feed commands, talking to the backend over HTTP.
#[derive(Debug, Subcommand)]
pub enum FeedCommand {
    /// Fetch and show the announcements
    List {
        /// Render as an HTML fragment
        #[arg(long)]
        html: bool,
    },

    /// Post a new announcement
    Post {
        /// Headline
        #[arg(short, long)]
        title: String,

        /// Body text
        #[arg(short = 'b', long)]
        content: String,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Urgency/priority argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UrgencyArg {
    /// Bassa
    Bassa,
    /// Media
    Media,
    /// Alta
    Alta,
    /// Critica
    Critica,
}

impl From<UrgencyArg> for Urgency {
    fn from(arg: UrgencyArg) -> Self {
        match arg {
            UrgencyArg::Bassa => Self::Bassa,
            UrgencyArg::Media => Self::Media,
            UrgencyArg::Alta => Self::Alta,
            UrgencyArg::Critica => Self::Critica,
        }
    }
}

/// Issue status argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Aperto
    Aperto,
    /// In Elaborazione
    InElaborazione,
    /// Risolto
    Risolto,
    /// Chiuso
    Chiuso,
}

impl From<StatusArg> for IssueStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Aperto => Self::Aperto,
            StatusArg::InElaborazione => Self::InElaborazione,
            StatusArg::Risolto => Self::Risolto,
            StatusArg::Chiuso => Self::Chiuso,
        }
    }
}

/// Output format for list commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
