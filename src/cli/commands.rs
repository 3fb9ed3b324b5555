use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wl", about = concat!("worklog v", env!("CARGO_PKG_VERSION"), " - a plain-text work journal with weekly reports"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different journal directory
    #[arg(short = 'C', long = "journal-dir", global = true)]
    pub journal_dir: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a journal in the current directory
    Init(InitArgs),
    /// Start a new log
    New(NewArgs),
    /// List logs by week
    List(ListArgs),
    /// Print a document
    Show(ShowArgs),
    /// Replace a document's text from a file or stdin
    Write(WriteArgs),
    /// Apply one editing action to a document
    Edit(EditArgs),
    /// Carry unfinished tasks over from an earlier log
    Carry(CarryArgs),
    /// Print the unfinished tasks of a markdown file (or stdin)
    Extract(FileArgs),
    /// Print a markdown file (or stdin) in canonical form
    Fmt(FileArgs),
    /// Move a log within the list order
    Mv(MvArgs),
    /// Delete a log
    Delete(IdArg),
    /// Hide or show private headings
    Privacy(PrivacyArgs),
    /// Generate a weekly report from logs
    Summarize(SummarizeArgs),
    /// Manage saved reports
    Summary(SummaryCmd),
    /// Manage report templates
    Template(TemplateCmd),
    /// View or prune the recovery log
    Recovery(RecoveryArgs),
    /// Show or change journal.toml settings
    Config(ConfigArgs),
}

// ---------------------------------------------------------------------------
// Shared args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct IdArg {
    /// Log ID
    pub id: u64,
}

/// Which document an ID refers to (a log unless a flag says otherwise)
#[derive(Args, Clone, Copy)]
pub struct DocArgs {
    /// Document ID
    pub id: u64,
    /// The ID is a summary
    #[arg(long, conflicts_with = "template")]
    pub summary: bool,
    /// The ID is a template
    #[arg(long)]
    pub template: bool,
}

#[derive(Args)]
pub struct FileArgs {
    /// Markdown file (default: stdin)
    pub file: Option<String>,
}

// ---------------------------------------------------------------------------
// Journal and log args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Journal name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct NewArgs {
    /// Log title (default: today's date as yyyyMMdd)
    #[arg(long)]
    pub title: Option<String>,
    /// Carry unfinished tasks over from the previous log
    #[arg(long)]
    pub carry: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Include deleted logs
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub doc: DocArgs,
    /// Print the block table instead of the text
    #[arg(long)]
    pub blocks: bool,
    /// Include blocks hidden by collapsed or private headings
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct WriteArgs {
    #[command(flatten)]
    pub doc: DocArgs,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// Read text from this file instead of stdin
    #[arg(long)]
    pub file: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    #[command(flatten)]
    pub doc: DocArgs,
    #[command(subcommand)]
    pub op: EditOp,
}

#[derive(Subcommand)]
pub enum EditOp {
    /// Set the text of a block (trigger tokens like "## " convert an empty paragraph)
    Type { index: usize, text: String },
    /// Press Enter in a block
    Enter { index: usize },
    /// Press Backspace at the start of a block
    Backspace { index: usize },
    /// Toggle a todo's checkbox
    Check { index: usize },
    /// Toggle a heading's collapsed state
    Collapse { index: usize },
    /// Toggle a heading's private flag
    Private { index: usize },
    /// Change a block's type (p, todo, h1, h2, h3)
    Kind { index: usize, kind: String },
    /// Drag block SOURCE onto block TARGET
    Move { source: usize, target: usize },
}

#[derive(Args)]
pub struct CarryArgs {
    /// Log to carry tasks into
    pub id: u64,
    /// Source log (default: the most recent other log)
    #[arg(long)]
    pub from: Option<u64>,
}

#[derive(Args)]
pub struct MvArgs {
    /// Log to move
    pub id: u64,
    /// Log whose position it takes
    pub target: u64,
}

#[derive(Args)]
pub struct PrivacyArgs {
    /// on or off (default: print the current mode)
    pub mode: Option<String>,
}

// ---------------------------------------------------------------------------
// Report args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SummarizeArgs {
    /// Logs to summarize
    #[arg(required = true)]
    pub ids: Vec<u64>,
    /// Template ID (default: the default template, if any)
    #[arg(long)]
    pub template: Option<u64>,
    /// Store the report as a summary
    #[arg(long)]
    pub save: bool,
    /// Title for the saved report (default: the logs' date range)
    #[arg(long, requires = "save")]
    pub title: Option<String>,
}

#[derive(Args)]
pub struct SummaryCmd {
    #[command(subcommand)]
    pub action: SummaryAction,
}

#[derive(Subcommand)]
pub enum SummaryAction {
    /// List saved reports
    List,
    /// Print a report
    Show { id: u64 },
    /// Delete a report
    Delete { id: u64 },
}

#[derive(Args)]
pub struct TemplateCmd {
    #[command(subcommand)]
    pub action: TemplateAction,
}

#[derive(Subcommand)]
pub enum TemplateAction {
    /// List templates
    List,
    /// Add a template from a file or stdin
    Add(TemplateAddArgs),
    /// Print a template
    Show { id: u64 },
    /// Make a template the default
    Default { id: u64 },
    /// Delete a template
    Delete { id: u64 },
}

#[derive(Args)]
pub struct TemplateAddArgs {
    /// Template name
    pub name: String,
    /// Read the template from this file instead of stdin
    #[arg(long)]
    pub file: Option<String>,
    /// Make it the default template
    #[arg(long)]
    pub default: bool,
}

// ---------------------------------------------------------------------------
// Maintenance args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryArgs {
    /// Show only the N most recent entries
    #[arg(long)]
    pub limit: Option<usize>,
    /// Remove old entries instead of listing
    #[arg(long)]
    pub prune: bool,
    /// With --prune: remove entries older than this many days (default 30)
    #[arg(long, requires = "prune", conflicts_with = "everything")]
    pub days: Option<i64>,
    /// With --prune: remove every entry
    #[arg(long, requires = "prune")]
    pub everything: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Dotted key such as summary.model
    pub key: Option<String>,
    /// New value
    #[arg(requires = "key")]
    pub value: Option<String>,
}
