use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::db::reports::{DEFAULT_CUSTOMER, DEFAULT_TOP_LIMIT, ReportKind, ReportOptions};

#[derive(Parser)]
#[command(author, version, about = "Restaurant schema, sample data, and reports")]
pub struct Cli {
    /// Database URL (overrides APP_DATABASE__URL, DB_* variables, and fallback profiles)
    #[arg(long, global = true)]
    pub database_url: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the schema, seed it, and print every report
    Run(RunArgs),
    /// Create every missing table
    Create,
    /// Drop every table
    Drop,
    /// Insert the sample dataset into a freshly created schema
    Seed,
    /// Print a single report
    Report(ReportArgs),
}

#[derive(Args, Clone)]
pub struct OutputArgs {
    /// Customer name for the per-customer orders report
    #[arg(long, default_value = DEFAULT_CUSTOMER)]
    pub customer: String,
    /// Number of rows in the most-ordered dishes report
    #[arg(long, default_value_t = DEFAULT_TOP_LIMIT)]
    pub top: u64,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl OutputArgs {
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            customer: self.customer.clone(),
            top: self.top,
        }
    }
}

#[derive(Args, Clone)]
pub struct RunArgs {
    /// Drop every table before creating the schema
    #[arg(long)]
    pub reset: bool,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Clone)]
pub struct ReportArgs {
    #[arg(value_enum)]
    pub report: ReportArg,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportArg {
    Dishes,
    CustomerOrders,
    TopDishes,
    Revenue,
    Loyalty,
    Ratings,
    Audit,
}

impl From<ReportArg> for ReportKind {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::Dishes => ReportKind::Dishes,
            ReportArg::CustomerOrders => ReportKind::CustomerOrders,
            ReportArg::TopDishes => ReportKind::TopDishes,
            ReportArg::Revenue => ReportKind::Revenue,
            ReportArg::Loyalty => ReportKind::Loyalty,
            ReportArg::Ratings => ReportKind::Ratings,
            ReportArg::Audit => ReportKind::Audit,
        }
    }
}
