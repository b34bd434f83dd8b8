use clap::{Parser, Subcommand, ValueEnum};

/// Set-to-bundle transformation pipeline for merchant catalogs
#[derive(Parser, Debug)]
#[command(
    name = "setforge",
    about = "Set-to-bundle transformation pipeline for merchant catalogs",
    version,
    long_about = "setforge decomposes multi-piece \"set\" catalog entries into hidden \
                  per-piece component entries, allocates price under a per-piece ceiling, \
                  links variants size-by-size and flips the original entry into bundle \
                  display mode."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug output")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Process a set entry into a bundle",
        long_about = "Runs the full pipeline for one entry: classification, price \
                      allocation, component creation, variant linking and bundle \
                      persistence.\n\n\
                      Examples:\n  \
                      setforge process entry-42\n  \
                      setforge process entry-42 --dry-run\n  \
                      setforge process entry-42 --format json"
    )]
    Process(ProcessArgs),

    #[command(
        about = "Classify an entry and preview the proposed split",
        long_about = "Reports classification, component names, the proposed price split \
                      and the tag decision without mutating anything.\n\n\
                      Examples:\n  \
                      setforge check entry-42\n  \
                      setforge check entry-42 --format json"
    )]
    Check(CheckArgs),

    #[command(
        about = "List unprocessed set entries in the catalog",
        long_about = "Scans the catalog for entries that look like sets and have not \
                      been processed yet.\n\n\
                      Examples:\n  \
                      setforge scan\n  \
                      setforge scan --format json"
    )]
    Scan(ScanArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ProcessArgs {
    #[arg(value_name = "ENTRY_ID", help = "Catalog id of the set entry")]
    pub entry_id: String,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(long, help = "Compute the plan but mutate nothing")]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    #[arg(value_name = "ENTRY_ID", help = "Catalog id of the entry to examine")]
    pub entry_id: String,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ScanArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Human,
    Json,
}
