use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rollcall
/// CLI application to track class attendance with geofencing and SQLite
#[derive(Parser)]
#[command(
    name = "rollcall",
    version = env!("CARGO_PKG_VERSION"),
    about = "A CLI attendance tracker: geofenced check-in/out per class period, backed by SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Freeze the clock at "YYYY-MM-DD HH:MM" (demos and tests)
    #[arg(global = true, long = "at", hide = true)]
    pub at: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or check)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration for invalid values")]
        check: bool,
    },

    /// Manage registered geofence areas
    Location {
        #[command(subcommand)]
        action: LocationAction,
    },

    /// Manage the enrolled device credential
    Credential {
        #[command(subcommand)]
        action: CredentialAction,
    },

    /// Check in for the current class period
    Checkin {
        /// Reported latitude (decimal degrees)
        #[arg(long = "lat", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Reported longitude (decimal degrees)
        #[arg(long = "lon", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Reported accuracy radius in meters
        #[arg(long = "accuracy")]
        accuracy: Option<f64>,
    },

    /// Check out of the current class period
    Checkout,

    /// Show the current period, windows, and active geofence
    Status,

    /// List attendance records
    List {
        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        range: Option<String>,
    },

    /// Attendance statistics: counts, rate, streak, monthly rollups
    Stats {
        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        range: Option<String>,
    },

    /// Export attendance data
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Manage the database (integrity checks, info)
    Db {
        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum LocationAction {
    /// Register a new geofence area
    Add {
        /// Display name of the area
        name: String,

        #[arg(long = "lat", allow_hyphen_values = true)]
        lat: f64,

        #[arg(long = "lon", allow_hyphen_values = true)]
        lon: f64,

        /// Geofence radius in meters
        #[arg(long = "radius", default_value_t = 100.0)]
        radius: f64,

        /// Make this the active area (the first area always becomes active)
        #[arg(long = "activate")]
        activate: bool,
    },

    /// List registered areas
    List,

    /// Make an area the active one (deactivates every other area)
    Activate { id: i64 },

    /// Delete an area (the active flag moves to a survivor, if any)
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum CredentialAction {
    /// Enroll a device credential for the configured student
    Enroll {
        /// Friendly device name
        #[arg(long = "name", default_value = "default device")]
        name: String,
    },

    /// Check whether a credential is enrolled
    Check,
}
