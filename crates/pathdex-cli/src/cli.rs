use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pathdex",
    about = "In-memory file index with live sync and fuzzy name search",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML config file with [index] and [search] tables
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Index a directory and report what was found
    Index(IndexArgs),
    /// Look up one record by path or identity key
    Lookup(LookupArgs),
    /// Fuzzy search file names under a directory
    Search(SearchArgs),
    /// Index, then keep the index live and search interactively
    Watch(WatchArgs),
}

#[derive(Args)]
pub struct IndexArgs {
    pub root: PathBuf,
}

#[derive(Args)]
pub struct LookupArgs {
    pub root: PathBuf,
    /// Path of the file to look up
    #[arg(long, conflicts_with = "key", required_unless_present = "key")]
    pub path: Option<PathBuf>,
    /// 64-character hex identity key
    #[arg(long)]
    pub key: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    pub root: PathBuf,
    pub query: String,
    /// Maximum number of results
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct WatchArgs {
    pub root: PathBuf,
}
