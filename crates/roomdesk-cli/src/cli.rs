//! Command-line interface definition.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use roomdesk_core::parse_timestamp;

/// roomdesk - Room reservations from the terminal
#[derive(Debug, Parser)]
#[command(name = "roomdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "ROOMDESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Site root serving the reservation endpoints
    #[arg(long, env = "ROOMDESK_BASE_URL")]
    pub base_url: Option<String>,

    /// CSRF token sent with every request
    #[arg(long, env = "ROOMDESK_CSRF_TOKEN", hide_env_values = true)]
    pub csrf_token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reserve a room
    Create {
        /// Room identifier
        #[arg(long)]
        room: i64,

        /// Start time (RFC 3339 or local `YYYY-MM-DDTHH:MM`)
        #[arg(long, value_parser = parse_timestamp)]
        start: DateTime<Utc>,

        /// End time (RFC 3339 or local `YYYY-MM-DDTHH:MM`)
        #[arg(long, value_parser = parse_timestamp)]
        end: DateTime<Utc>,
    },

    /// Move or resize a reservation
    Update {
        /// Reservation identifier
        pk: i64,

        /// Room identifier
        #[arg(long)]
        room: i64,

        /// New start time
        #[arg(long, value_parser = parse_timestamp)]
        start: DateTime<Utc>,

        /// New end time
        #[arg(long, value_parser = parse_timestamp)]
        end: DateTime<Utc>,
    },

    /// Delete a reservation
    Delete {
        /// Reservation identifier
        pk: i64,
    },

    /// Show which events of a saved page a room filter keeps
    Filter {
        /// Page description (JSON)
        #[arg(long)]
        page: PathBuf,

        /// Room identifier, or -1 for all rooms
        #[arg(long, allow_negative_numbers = true)]
        room: i64,

        /// Print the filtered controls as HTML
        #[arg(long)]
        html: bool,
    },

    /// Interactive calendar session against the server
    Session {
        /// Page description (JSON) with the initial events
        #[arg(long)]
        page: Option<PathBuf>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
