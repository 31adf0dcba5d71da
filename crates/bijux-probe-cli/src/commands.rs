use bijux_probe_query::DEFAULT_PAGE_SIZE;
use clap::{Args, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Verify every corpus case in order.
    Run {
        #[arg(long)]
        corpus: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = RunMode::Table)]
        mode: RunMode,
    },
    /// Verify one ordinal (`7`) or an inclusive range (`3-9`) in detail.
    Test {
        #[arg(long)]
        corpus: Option<PathBuf>,
        selection: String,
    },
    /// Step through the corpus interactively.
    Review {
        #[arg(long)]
        corpus: Option<PathBuf>,
        #[arg(long)]
        start: Option<usize>,
    },
    /// Walk every page of an entity collection and check its consistency.
    Paginate(PageArgs),
    /// Run a named end-to-end check.
    Check {
        name: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Print the ordinal to key table.
    List {
        #[arg(long)]
        corpus: Option<PathBuf>,
    },
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
pub(crate) struct PageArgs {
    #[arg(long)]
    pub(crate) entity: String,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub(crate) page_size: u64,
    /// Defaults to the total recorded for `/api/<entity>` in the corpus.
    #[arg(long)]
    pub(crate) expected_total: Option<u64>,
    #[arg(long)]
    pub(crate) corpus: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum RunMode {
    Table,
    Summary,
}

impl RunMode {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Summary => "summary",
        }
    }
}
