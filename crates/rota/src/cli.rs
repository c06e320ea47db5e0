//! Clap derive structures for the `rota` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use rota_core::{EventType, LeaveStatus, ViewType, WeekStart};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// rota -- staff calendar from the command line
#[derive(Debug, Parser)]
#[command(
    name = "rota",
    version,
    about = "Browse staff calendars: assignments, leave, duties and on-call",
    long_about = "Query a rota calendar backend for the events of a day, week or month,\n\
        filtered by type, person, role, leave status, location, team or specialty.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Calendar backend URL (overrides config)
    #[arg(long, short = 's', env = "ROTA_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ROTA_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "ROTA_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the events of the visible window
    #[command(alias = "ev", alias = "e")]
    Events(EventsArgs),

    /// Show the date window for a view and date (no backend needed)
    Range(RangeArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Window Arguments ─────────────────────────────────────────────────

/// Which window of the calendar to look at.
#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Calendar view: day, week, month, list, timeline
    #[arg(long, short = 'w')]
    pub view: Option<ViewType>,

    /// Any date inside the window (YYYY-MM-DD, default today)
    #[arg(long, short = 'd')]
    pub date: Option<NaiveDate>,

    /// First day of the week: monday or sunday
    #[arg(long)]
    pub week_start: Option<WeekStart>,

    /// IANA timezone for window boundaries (e.g. Europe/Paris)
    #[arg(long, visible_alias = "tz")]
    pub timezone: Option<String>,
}

// ── Events ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    /// Event types (assignment, leave, duty, on_call, training, meeting, holiday, other)
    #[arg(long = "type", short = 't', value_delimiter = ',')]
    pub types: Vec<EventType>,

    /// User ids
    #[arg(long = "user", short = 'u', value_delimiter = ',')]
    pub users: Vec<String>,

    /// User roles (e.g. MAR, IADE)
    #[arg(long = "role", value_delimiter = ',')]
    pub roles: Vec<String>,

    /// Leave types (e.g. ANNUAL, RECOVERY)
    #[arg(long = "leave-type", value_delimiter = ',')]
    pub leave_types: Vec<String>,

    /// Leave statuses (pending, approved, rejected)
    #[arg(long = "status", value_delimiter = ',')]
    pub statuses: Vec<LeaveStatus>,

    /// Location ids
    #[arg(long = "location", value_delimiter = ',')]
    pub locations: Vec<String>,

    /// Team ids
    #[arg(long = "team", value_delimiter = ',')]
    pub teams: Vec<String>,

    /// Specialty ids
    #[arg(long = "specialty", value_delimiter = ',')]
    pub specialties: Vec<String>,

    /// Free-text search over title, description, user, location and team
    #[arg(long, short = 'S')]
    pub search: Option<String>,

    /// Ignore and replace any cached result for this window
    #[arg(long)]
    pub refresh: bool,
}

// ── Range ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RangeArgs {
    #[command(flatten)]
    pub window: WindowArgs,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (file + environment)
    Show,

    /// Print the config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
