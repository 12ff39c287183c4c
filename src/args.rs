//! Command-line interface definitions.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// expensetui: a local-only personal expense tracker.
///
/// Records expenses with an optional bill image, tracks spending against a
/// budget, and exports to CSV or PDF. Run without a command to open the
/// interactive terminal UI.
#[derive(Debug, Parser, Clone)]
#[command(name = "expensetui", version)]
pub(crate) struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Args {
    pub(crate) fn common(&self) -> &Common {
        &self.common
    }

    /// The requested command; `None` means the TUI.
    pub(crate) fn command(&self) -> Option<&Command> {
        self.command.as_ref()
    }
}

/// Arguments common to all subcommands.
#[derive(Debug, ClapArgs, Clone)]
pub(crate) struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// RUST_LOG takes precedence when set.
    #[arg(long, global = true, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,

    /// Path to the ledger database. Defaults to the platform data directory.
    #[arg(long, global = true, env = "EXPENSETUI_DB")]
    db: Option<PathBuf>,

    /// Path to the JSON config file. Defaults to the platform config directory.
    #[arg(long, global = true, env = "EXPENSETUI_CONFIG")]
    config: Option<PathBuf>,
}

impl Common {
    pub(crate) fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub(crate) fn db(&self) -> Option<&Path> {
        self.db.as_deref()
    }

    pub(crate) fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
    /// Add an expense.
    Add(AddArgs),
    /// Change fields of an existing expense. The bill image is kept.
    Edit(EditArgs),
    /// Delete an expense. Later records move up by one.
    Delete(RecordArgs),
    /// List all expenses in the order they were added.
    List,
    /// Show the budget, or set it when an amount is given.
    Budget(BudgetArgs),
    /// Print total spent, remaining budget and budget health.
    Summary,
    /// Export all expenses to CSV or PDF.
    Export(ExportArgs),
    /// Show or save the bill image of an expense.
    Image(ImageArgs),
    /// Open the interactive terminal UI (the default).
    Tui,
}

#[derive(Debug, ClapArgs, Clone)]
pub(crate) struct AddArgs {
    /// Expense type. Defaults to the first configured type.
    #[arg(long = "type", short = 't')]
    kind: Option<String>,

    #[arg(long, short = 'd', default_value = "")]
    description: String,

    /// Amount spent. Currency symbols and commas are ignored; anything
    /// unparseable counts as 0.
    #[arg(long, short = 'a', allow_hyphen_values = true)]
    amount: String,

    /// Mark the expense as having a bill.
    #[arg(long)]
    bill: bool,

    /// Bill image to attach. Only allowed together with --bill.
    #[arg(long, requires = "bill")]
    image: Option<PathBuf>,

    /// Date as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<String>,
}

impl AddArgs {
    pub(crate) fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub(crate) fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn amount(&self) -> &str {
        &self.amount
    }

    pub(crate) fn bill(&self) -> bool {
        self.bill
    }

    pub(crate) fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    pub(crate) fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

#[derive(Debug, ClapArgs, Clone)]
pub(crate) struct EditArgs {
    /// Record number as shown by `list` (1-based).
    number: usize,

    #[arg(long = "type", short = 't')]
    kind: Option<String>,

    #[arg(long, short = 'd')]
    description: Option<String>,

    #[arg(long, short = 'a', allow_hyphen_values = true)]
    amount: Option<String>,

    /// yes or no
    #[arg(long)]
    bill: Option<String>,

    #[arg(long)]
    date: Option<String>,
}

impl EditArgs {
    pub(crate) fn number(&self) -> usize {
        self.number
    }

    pub(crate) fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub(crate) fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub(crate) fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    pub(crate) fn bill(&self) -> Option<&str> {
        self.bill.as_deref()
    }

    pub(crate) fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

#[derive(Debug, ClapArgs, Clone)]
pub(crate) struct RecordArgs {
    /// Record number as shown by `list` (1-based).
    number: usize,
}

impl RecordArgs {
    pub(crate) fn number(&self) -> usize {
        self.number
    }
}

#[derive(Debug, ClapArgs, Clone)]
pub(crate) struct BudgetArgs {
    /// New budget. Currency symbols and commas are ignored.
    #[arg(allow_hyphen_values = true)]
    amount: Option<String>,
}

impl BudgetArgs {
    pub(crate) fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub(crate) enum ExportFormat {
    #[default]
    Csv,
    Pdf,
}

#[derive(Debug, ClapArgs, Clone)]
pub(crate) struct ExportArgs {
    #[arg(value_enum)]
    format: ExportFormat,

    /// Output file. Defaults to expenses.csv / expenses.pdf in the export directory.
    path: Option<PathBuf>,
}

impl ExportArgs {
    pub(crate) fn format(&self) -> ExportFormat {
        self.format
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[derive(Debug, ClapArgs, Clone)]
pub(crate) struct ImageArgs {
    /// Record number as shown by `list` (1-based).
    number: usize,

    /// Write the image to this file instead of printing its details.
    #[arg(long)]
    save: Option<PathBuf>,
}

impl ImageArgs {
    pub(crate) fn number(&self) -> usize {
        self.number
    }

    pub(crate) fn save(&self) -> Option<&Path> {
        self.save.as_deref()
    }
}
