use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dl", about = concat!("dayline v", env!("CARGO_PKG_VERSION"), " - timelines from your daily notes"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different vault directory
    #[arg(short = 'C', long = "vault-dir", global = true)]
    pub vault_dir: Option<String>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output on stderr (-q warnings, -qq errors only)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a dayline.toml in the current directory
    Init(InitArgs),
    /// List timed tasks per day
    Tasks(TasksArgs),
    /// Show the layout of one day: dots, clusters and range levels
    Day(DayArgs),
    /// Draw the timeline for a date range
    Timeline(TimelineArgs),
    /// Show stacking levels of the range tasks of one day
    Overlaps(OverlapsArgs),
    /// List months that have daily notes
    Months,
    /// Show, get or set configuration values
    Config(ConfigCmd),
    /// Show the tasks under a dot, as a hover preview would
    Preview(PreviewArgs),
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Folder holding the daily notes, relative to the vault root
    #[arg(long)]
    pub folder: Option<String>,
    /// Overwrite an existing dayline.toml
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TasksArgs {
    /// Only this day (YYYY-MM-DD or DD.MM.YYYY); default: the configured range
    pub date: Option<String>,
}

#[derive(Args)]
pub struct DayArgs {
    /// Day to lay out (YYYY-MM-DD or DD.MM.YYYY)
    pub date: String,
    /// Zoom level (default: last used, else the configured default)
    #[arg(long)]
    pub zoom: Option<f64>,
}

#[derive(Args)]
pub struct TimelineArgs {
    /// Month to show (YYYY-MM)
    #[arg(long, conflicts_with_all = ["from", "show", "block", "prev", "next"])]
    pub month: Option<String>,
    /// First day of a custom range
    #[arg(long, requires = "to", conflicts_with_all = ["show", "block", "prev", "next"])]
    pub from: Option<String>,
    /// Last day of a custom range
    #[arg(long, requires = "from")]
    pub to: Option<String>,
    /// Quick range: last-7, last-30, this-week, this-month, last-3m
    #[arg(long, conflicts_with_all = ["block", "prev", "next"])]
    pub show: Option<String>,
    /// Read the range from a timeline block file (`mode: ...` lines)
    #[arg(long, conflicts_with_all = ["prev", "next"])]
    pub block: Option<String>,
    /// Step back one range length from the last shown range
    #[arg(long, conflicts_with = "next")]
    pub prev: bool,
    /// Step forward one range length from the last shown range
    #[arg(long)]
    pub next: bool,
    /// Zoom level (default: last used, else the configured default)
    #[arg(long)]
    pub zoom: Option<f64>,
    /// Columns per day strip
    #[arg(long, default_value_t = 48)]
    pub width: usize,
}

#[derive(Args)]
pub struct OverlapsArgs {
    /// Day to inspect (YYYY-MM-DD or DD.MM.YYYY)
    pub date: String,
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Day of the note (YYYY-MM-DD or DD.MM.YYYY)
    pub date: String,
    /// Time of the dot (HH:MM); matches a single task or a cluster's average
    pub time: String,
    /// Zoom level used to form clusters
    #[arg(long)]
    pub zoom: Option<f64>,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value (e.g. layout.min_spacing_pixels)
    Get {
        key: String,
    },
    /// Set one value, keeping the file's formatting
    Set {
        key: String,
        value: String,
    },
}
