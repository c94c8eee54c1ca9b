use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for rRoster
/// CLI application to reconcile duty-roster exports into SQLite
#[derive(Parser)]
#[command(
    name = "rroster",
    version = env!("CARGO_PKG_VERSION"),
    about = "Reconcile duty-roster exports into a normalized schedule stored in SQLite",
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

/// Which roster sheet an import file carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportKind {
    /// `{"DD-MM-YYYY": personId}`
    Responsible,
    /// `{personId: {"position": ..., "schedule": {"YYYY-MM-DD": cell}}}`
    General,
    /// `["YYYY-MM-DD", ...]`
    GroupControl,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show the active configuration
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
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

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage the duty-type catalog
    Catalog {
        #[arg(long = "seed", help = "Load duty types (standard set unless --file is given)")]
        seed: bool,

        #[arg(long = "file", value_name = "FILE", requires = "seed", help = "YAML/JSON seed file")]
        file: Option<String>,

        #[arg(long = "force", requires = "seed", help = "Seed even if the catalog has rows")]
        force: bool,

        #[arg(long = "list", help = "List every duty type, inactive ones included")]
        list: bool,

        #[arg(long = "deactivate", value_name = "NAME", help = "Soft-deactivate a duty type")]
        deactivate: Option<String>,
    },

    /// Import a roster export and replace the schedule inside a date window
    Import {
        #[arg(value_enum)]
        kind: ImportKind,

        #[arg(long = "file", value_name = "FILE", help = "JSON file produced by the extractor")]
        file: String,

        /// First day of the window (YYYY-MM-DD); defaults to the earliest input date
        #[arg(long = "from")]
        from: Option<String>,

        /// Last day of the window (YYYY-MM-DD); defaults to the latest input date
        #[arg(long = "to")]
        to: Option<String>,

        #[arg(long = "dry-run", help = "Parse and tokenize only; write nothing")]
        dry_run: bool,
    },

    /// List stored assignments
    List {
        /// First day (YYYY-MM-DD)
        #[arg(long = "from")]
        from: Option<String>,

        /// Last day (YYYY-MM-DD)
        #[arg(long = "to")]
        to: Option<String>,

        #[arg(long = "person", help = "Filter by person id (repeatable)")]
        person: Vec<String>,

        #[arg(long = "duty", help = "Filter by duty type name (repeatable)")]
        duty: Vec<String>,

        #[arg(long = "exclude-responsible", help = "Hide the Responsible schedule")]
        exclude_responsible: bool,

        #[arg(long = "group-control", help = "List group-control days instead")]
        group_control: bool,
    },
}
