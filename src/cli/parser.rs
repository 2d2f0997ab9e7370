use crate::export::ExportFormat;
use crate::permissions::PermissionKind;
use crate::utils::time::parse_seconds;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Command-line interface definition for esmlogger
/// Experience-sampling capture tool: mood, short video and location, stored in SQLite
#[derive(Parser)]
#[command(
    name = "esmlogger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Experience-sampling logger: record a mood rating, a short clip and the current position",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit table
    Audit {
        #[arg(long = "print", help = "Print rows from the internal audit table")]
        print: bool,
    },

    /// Run one sampling session and commit it to the log store
    Capture {
        /// Mood rating, 0 (very bad) to 4 (very good); out-of-range values are clamped
        #[arg(long = "sentiment", short = 's', allow_negative_numbers = true)]
        sentiment: Option<i64>,

        /// Video file standing in for the camera feed
        #[arg(long = "clip")]
        clip: Option<PathBuf>,

        /// Requested recording length in seconds (capped at 2)
        #[arg(long = "duration", value_parser = parse_seconds, default_value = "2")]
        duration: Duration,

        /// Latitude of the current position (requires --lng)
        #[arg(long = "lat", requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude of the current position (requires --lat)
        #[arg(long = "lng", requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,

        /// Permissions the user refuses for this session (repeatable)
        #[arg(long = "deny", value_enum)]
        deny: Vec<PermissionKind>,
    },

    /// List the most recent records
    List {
        /// Maximum number of records to show
        #[arg(long = "limit", short = 'n', default_value_t = 20)]
        limit: usize,
    },

    /// Export every record to a file
    Export {
        /// Output format
        #[arg(long = "format", value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Absolute path of the output file
        #[arg(long = "file")]
        file: String,

        /// Overwrite the output file without asking
        #[arg(long = "force")]
        force: bool,
    },
}
