//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use sitewise_core::SynthesisFallback;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sitewise")]
#[command(
    author,
    version,
    about = "Construction document analysis, knowledge search and role-scoped reports"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, env = "SITEWISE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask for a structured JSON answer
    Ask(AskArgs),

    /// Extract text from a document
    Ocr(OcrArgs),

    /// Search the knowledge corpus
    Search(SearchArgs),

    /// Analyze a drawing or specification into a master report
    Analyze(AnalyzeArgs),

    /// Show a stored report projected for a role
    Report(ReportArgs),

    /// List stored reports or queries
    History(HistoryArgs),

    /// Show service and store status
    Status,
}

#[derive(Args)]
pub struct AskArgs {
    /// Prompt text
    pub prompt: Vec<String>,

    /// Image to attach (sent base64-encoded)
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Example of the JSON shape to return
    #[arg(long)]
    pub schema: Option<String>,

    /// File whose contents are sent as context
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Use the fast deployment
    #[arg(long)]
    pub fast: bool,
}

#[derive(Args)]
pub struct OcrArgs {
    /// File path (URLs are rejected)
    pub source: String,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search query
    pub query: Vec<String>,

    /// Number of candidates sent for synthesis
    #[arg(short = 'n')]
    pub limit: Option<usize>,

    /// What to return when synthesis fails
    #[arg(long, value_enum)]
    pub fallback: Option<FallbackArg>,

    /// Do not record the query in history
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Drawing or specification file
    pub file: PathBuf,

    /// Print the report projected for this role instead of the full report
    #[arg(long)]
    pub role: Option<String>,

    /// Do not store the report
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Args)]
pub struct ReportArgs {
    /// Caller role (engineer, supervisor, admin; anything else is guest)
    #[arg(long, default_value = "guest")]
    pub role: String,

    /// Stored report id (defaults to the latest)
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Args)]
pub struct HistoryArgs {
    /// Collection to list
    #[arg(value_enum, default_value = "reports")]
    pub collection: HistoryCollection,

    /// Show at most this many entries, newest last
    #[arg(short = 'n')]
    pub limit: Option<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HistoryCollection {
    Reports,
    Queries,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FallbackArg {
    Empty,
    Candidates,
}

impl From<FallbackArg> for SynthesisFallback {
    fn from(arg: FallbackArg) -> Self {
        match arg {
            FallbackArg::Empty => SynthesisFallback::Empty,
            FallbackArg::Candidates => SynthesisFallback::Candidates,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}
