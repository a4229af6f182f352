use crate::export::{ExportFormat, ExportTarget};
use clap::{Parser, Subcommand};

/// Command-line interface definition for sprintpulse
/// CLI application to normalize tracker exports and follow sprint risk with SQLite
#[derive(Parser)]
#[command(
    name = "sprintpulse",
    version = env!("CARGO_PKG_VERSION"),
    about = "Normalize sprint ticket exports, track burndown history and raise risk alerts using SQLite",
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

    /// Ingest a ticket export (CSV) and record today's burndown snapshot
    Ingest {
        /// CSV file exported from the tracker
        file: String,

        #[arg(long = "start", requires = "end", help = "Sprint start date (YYYY-MM-DD)")]
        start: Option<String>,

        #[arg(long = "end", help = "Sprint end date (YYYY-MM-DD)")]
        end: Option<String>,

        #[arg(
            long = "sprint",
            conflicts_with_all = ["start", "end"],
            help = "Bucket the batch into this sprint key (end date, YYYY-MM-DD)"
        )]
        sprint: Option<String>,

        #[arg(
            long = "snapshot-date",
            help = "Date of the history snapshot (YYYY-MM-DD, default: today)"
        )]
        snapshot_date: Option<String>,

        #[arg(long = "exclude", help = "Assignee (first name) to leave out of this batch")]
        exclude: Option<String>,
    },

    /// List known sprint windows or persist the selected one
    Sprints {
        #[arg(long = "select", value_name = "KEY", help = "Remember KEY as the selected sprint")]
        select: Option<String>,
    },

    /// Show the normalized tickets of a sprint
    Tickets {
        #[arg(long = "sprint", value_name = "KEY")]
        sprint: Option<String>,
    },

    /// Evaluate risk alerts and assignee workload of a sprint
    Alerts {
        #[arg(long = "sprint", value_name = "KEY")]
        sprint: Option<String>,

        #[arg(long = "all", help = "Also show dismissed alerts")]
        all: bool,
    },

    /// Dismiss an alert, list dismissals, or clear them all
    Dismiss {
        /// Alert id, e.g. `risk-blowout:PROJ-12`
        #[arg(required_unless_present_any = ["list", "reset"])]
        id: Option<String>,

        #[arg(long = "remarks", default_value = "")]
        remarks: String,

        #[arg(long = "by", help = "Who dismisses the alert (default: current OS user)")]
        by: Option<String>,

        #[arg(long = "list", conflicts_with = "reset")]
        list: bool,

        #[arg(long = "reset")]
        reset: bool,
    },

    /// Show the burndown history of a sprint, or delete one entry
    History {
        #[arg(long = "sprint", value_name = "KEY")]
        sprint: Option<String>,

        #[arg(long = "delete", value_name = "DATE", help = "Delete the snapshot of DATE")]
        delete: Option<String>,
    },

    /// Print the raw alert audit trail of one day
    Audit {
        #[arg(long = "date", help = "Evaluation day (YYYY-MM-DD, default: today)")]
        date: Option<String>,
    },

    /// Export history or alerts of a sprint
    Export {
        #[arg(long = "what", value_enum, default_value = "history")]
        what: ExportTarget,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long = "sprint", value_name = "KEY")]
        sprint: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing backup without asking")]
        force: bool,
    },
}
