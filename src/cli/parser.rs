use clap::{Parser, Subcommand};

/// Command-line interface definition for pontoledger
/// Time & attendance CLI: schedule-aware punches and balances over SQLite
#[derive(Parser)]
#[command(
    name = "pontoledger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Time & attendance ledger: record clock punches, track daily/monthly balances and adjustment quotas",
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

    /// Manage the configuration file (view or check)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,
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

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage the employee directory
    Staff {
        /// Employee id to add or update
        id: Option<String>,

        #[arg(long = "name", help = "Employee display name")]
        name: Option<String>,

        #[arg(
            long = "schedule",
            help = "Schedule code (M, M1, M4, FOLGA, FERIAS, ATESTADO, FOLGA_EXTRA)"
        )]
        schedule: Option<String>,

        #[arg(long = "admin", help = "Grant administrator rights")]
        admin: bool,

        #[arg(long = "lunch-out", help = "Lunch override: lunch-out time (HH:MM)")]
        lunch_out: Option<String>,

        #[arg(
            long = "lunch-return",
            help = "Lunch override: lunch-return time (HH:MM)"
        )]
        lunch_return: Option<String>,

        #[arg(long = "reason", help = "Reason recorded with a lunch override")]
        reason: Option<String>,

        #[arg(long = "list", help = "List all employees")]
        list: bool,
    },

    /// Record a live clock punch
    Punch {
        /// Employee id
        employee: String,

        /// Punch slot: entry, lunch-out, lunch-return or exit
        slot: String,

        /// Punch time (HH:MM); defaults to the current time
        #[arg(long = "at")]
        at: Option<String>,

        /// Punch date (YYYY-MM-DD); defaults to today
        #[arg(long = "date", hide = true)]
        date: Option<String>,

        #[arg(long = "note", help = "Free-text note stored with the punch")]
        note: Option<String>,
    },

    /// Correct a historical punch (consumes one monthly adjustment)
    Correct {
        /// Employee id
        employee: String,

        /// Date of the punch to correct (YYYY-MM-DD)
        date: String,

        /// Slot to correct: entry, lunch-out, lunch-return or exit
        slot: Option<String>,

        /// Corrected time (HH:MM)
        #[arg(long = "time")]
        time: Option<String>,

        #[arg(long = "reason", help = "Why the punch is being corrected")]
        reason: Option<String>,

        #[arg(long = "admin", help = "Act as administrator (quota-exempt, audited)")]
        admin: bool,

        #[arg(
            long = "perfect",
            help = "Fill every missing slot with schedule-exact punches (admin only)"
        )]
        perfect: bool,
    },

    /// Show the daily balance for an employee
    Balance {
        /// Employee id
        employee: String,

        /// Date (YYYY-MM-DD); defaults to today
        date: Option<String>,

        #[arg(long = "json", help = "Print the balance as JSON")]
        json: bool,
    },

    /// Show the monthly summary and bonus eligibility
    Summary {
        /// Employee id
        employee: String,

        /// Month (YYYY-MM); defaults to the current month
        month: Option<String>,

        #[arg(long = "json", help = "Print the summary as JSON")]
        json: bool,
    },

    /// Show the monthly adjustment quota and its history
    Quota {
        /// Employee id
        employee: String,

        #[arg(long = "month", help = "Month (YYYY-MM); defaults to the current month")]
        month: Option<String>,
    },

    /// List recent punches (hygiene-filtered)
    List {
        /// Employee id
        employee: String,

        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        period: Option<String>,
    },

    /// Show a schedule code resolved for a date, or all known codes
    Schedule {
        /// Schedule code (omit to list all known codes)
        code: Option<String>,

        #[arg(long = "date", help = "Date to resolve (YYYY-MM-DD); defaults to today")]
        date: Option<String>,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,
    },
}
