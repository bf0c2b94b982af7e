use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "dossier",
    about = "Merge an extracted draft into a canonical dossier record",
    version,
)]
pub struct Cli {
    /// Canonical document to update
    pub existing: PathBuf,
    /// Newly extracted draft of the same entity
    pub incoming: PathBuf,

    /// Overwrite conflicting values with the incoming ones
    #[arg(short, long)]
    pub force: bool,

    /// Show the changes without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Match-key field for arrays of objects, highest priority first
    #[arg(short = 'k', long = "match-key", value_name = "FIELD")]
    pub match_keys: Vec<String>,

    /// TOML file with merge policy settings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
