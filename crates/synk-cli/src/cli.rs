use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use synk_core::CollectionKind;

#[derive(Parser)]
#[command(name = "synk")]
#[command(about = "Shared household organizer: calendar, shopping, bucket list and chores")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Work on the local copy only, without contacting the remote
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add an entry
    #[command(alias = "new")]
    Add {
        #[command(subcommand)]
        entry: AddCommands,
    },
    /// List entries, open items first
    #[command(alias = "ls")]
    List {
        /// Only show one collection
        #[arg(value_enum)]
        collection: Option<CollectionArg>,
        /// Only show calendar entries on this date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a list entry done, or open again
    #[command(alias = "done")]
    Toggle {
        #[arg(value_enum)]
        collection: CollectionArg,
        /// Entry ID or unique ID prefix
        id: String,
    },
    /// Delete an entry
    #[command(alias = "rm")]
    Delete {
        #[arg(value_enum)]
        collection: CollectionArg,
        /// Entry ID or unique ID prefix
        id: String,
    },
    /// Change fields of an existing entry
    Edit {
        #[command(subcommand)]
        entry: EditCommands,
    },
    /// Export the whole document as JSON
    Export {
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Replace the whole document from an exported JSON file
    Import {
        /// File produced by `synk export`
        path: PathBuf,
    },
    /// Show sync configuration and document summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Stay connected and follow changes from the other device
    Watch,
    /// Configure the remote record host
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AddCommands {
    /// Plan an appointment
    Calendar {
        /// Title
        title: Vec<String>,
        /// Day (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        date: String,
        /// Start time (HH:MM); omit for all-day
        #[arg(long, value_name = "TIME")]
        time: Option<String>,
        /// arvid, ida or begge
        #[arg(long, default_value = "begge")]
        person: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Put something on the shopping list
    Shopping {
        label: Vec<String>,
        #[arg(short, long, default_value = "")]
        quantity: String,
        #[arg(short, long, default_value = "")]
        category: String,
    },
    /// Add a bucket list dream
    Bucket {
        label: Vec<String>,
        /// low, medium or high
        #[arg(short, long, default_value = "medium")]
        priority: String,
    },
    /// Add a chore
    Chore {
        label: Vec<String>,
        /// arvid, ida or begge
        #[arg(short, long, default_value = "begge")]
        assigned_to: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum EditCommands {
    /// Change an appointment
    Calendar {
        /// Entry ID or unique ID prefix
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_name = "DATE")]
        date: Option<String>,
        /// New start time; an empty value makes it all-day
        #[arg(long, value_name = "TIME")]
        time: Option<String>,
        #[arg(long)]
        person: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change a shopping list entry
    Shopping {
        /// Entry ID or unique ID prefix
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(short, long)]
        quantity: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Change a bucket list entry
    Bucket {
        /// Entry ID or unique ID prefix
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
    },
    /// Change a chore
    Chore {
        /// Entry ID or unique ID prefix
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(short, long)]
        assigned_to: Option<String>,
        /// New due date; an empty value clears it
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the stored configuration
    Show,
    /// Point the CLI at a remote record host
    SetRemote {
        /// Base URL (e.g. <http://127.0.0.1:8080>)
        url: String,
        /// Bearer token expected by the host
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,
    },
    /// Forget the remote and work locally only
    Clear,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CollectionArg {
    Calendar,
    Shopping,
    Bucket,
    #[value(alias = "chore")]
    Chores,
}

impl From<CollectionArg> for CollectionKind {
    fn from(value: CollectionArg) -> Self {
        match value {
            CollectionArg::Calendar => Self::Calendar,
            CollectionArg::Shopping => Self::Shopping,
            CollectionArg::Bucket => Self::Bucket,
            CollectionArg::Chores => Self::Chores,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
