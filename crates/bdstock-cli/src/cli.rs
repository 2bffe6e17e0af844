//! CLI argument definitions for bdstock.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dse latest` | DSE latest share prices, optionally for one category |
//! | `dse change` | DSE latest share prices with percentage change |
//! | `dse summary` | DSE indices and day totals |
//! | `dse status` | DSE open/closed flag and last update |
//! | `cse latest` | CSE current prices |
//! | `cse summary` | CSE record highs and daily history |
//! | `cse status` | CSE open/closed flag |
//! | `cse companies` | CSE listed companies |
//! | `cse industries` | CSE listed companies grouped by industry |
//! | `cse categories` | CSE listed companies grouped by category |
//! | `cse pe-ratio` | CSE price/earnings ratios for a trading day |
//! | `cse weekly-reports` | CSE weekly report PDFs for a year |
//! | `schema` | Column layout of each record shape |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, ndjson, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--timeout-ms` | from env | Request timeout in ms |
//! | `-v` | off | Raise log verbosity (repeatable) |
//!
//! # Examples
//!
//! ```bash
//! bdstock dse latest --category A --sort-by value --order desc --pretty
//! bdstock cse latest --sort-by opening-price --format table
//! bdstock dse status --strict
//! bdstock cse pe-ratio --date 2020-07-16 --format table
//! ```

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Market data from the Dhaka and Chittagong stock exchanges.
#[derive(Debug, Parser)]
#[command(
    name = "bdstock",
    author,
    version,
    about = "Market data from the Dhaka and Chittagong stock exchanges"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Request timeout in milliseconds. Overrides BDSTOCK_TIMEOUT_MS.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Log more to stderr: -v for info, -vv for debug, -vvv for trace.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text for terminal display.
    Table,
    /// Single JSON object output.
    Json,
    /// Newline-delimited JSON.
    Ndjson,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Dhaka Stock Exchange pages.
    Dse(DseArgs),
    /// Chittagong Stock Exchange pages.
    Cse(CseArgs),
    /// Show the column layout of record shapes.
    Schema(SchemaArgs),
}

#[derive(Debug, Args)]
pub struct DseArgs {
    #[command(subcommand)]
    pub command: DseCommand,
}

#[derive(Debug, Subcommand)]
pub enum DseCommand {
    /// Latest share prices.
    ///
    ///   bdstock dse latest
    ///   bdstock dse latest --category Z --sort-by ltp --order desc
    Latest(DseLatestArgs),
    /// Latest share prices with the percentage change column.
    Change(SortArgs),
    /// Index values and day totals.
    Summary,
    /// Whether the market is open, and when data was last updated.
    Status,
}

#[derive(Debug, Args)]
pub struct DseLatestArgs {
    /// Market category: A, B, G, N or Z.
    #[arg(long)]
    pub category: Option<String>,

    #[command(flatten)]
    pub sort: SortArgs,
}

#[derive(Debug, Args)]
pub struct CseArgs {
    #[command(subcommand)]
    pub command: CseCommand,
}

#[derive(Debug, Subcommand)]
pub enum CseCommand {
    /// Current share prices.
    Latest(SortArgs),
    /// Record highs and historical daily summaries.
    Summary,
    /// Whether the market is open.
    Status,
    /// Every listed company with its trading code.
    Companies,
    /// Listed companies grouped by industry.
    Industries,
    /// Listed companies grouped by market category.
    Categories,
    /// Price/earnings ratios for one trading day.
    ///
    ///   bdstock cse pe-ratio --date 2020-07-16
    PeRatio(PeRatioArgs),
    /// Weekly report PDFs published in a year.
    WeeklyReports(WeeklyReportArgs),
}

#[derive(Debug, Args)]
pub struct PeRatioArgs {
    /// Trading day as YYYY-MM-DD.
    #[arg(long)]
    pub date: String,
}

#[derive(Debug, Args)]
pub struct WeeklyReportArgs {
    /// Report year; the exchange archive decides which years exist.
    #[arg(long)]
    pub year: i32,
}

/// Sort options shared by the price commands.
#[derive(Debug, Clone, Args)]
pub struct SortArgs {
    /// Field to sort by, e.g. trading-code, ltp, value, volume, percentage-change.
    #[arg(long, default_value = "trading-code")]
    pub sort_by: String,

    /// Sort order: asc or desc.
    #[arg(long, default_value = "asc")]
    pub order: String,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Record shape, e.g. dse-share. Lists every shape when omitted.
    pub record: Option<String>,
}
