use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;


pub use args::{IndexArgs, ListArgs, RemoveArgs, SearchArgs};

#[derive(Debug, Parser)]
#[command(name = "docseek")]
#[command(about = "Local semantic and lexical file search", version)]
pub struct Cli {
    /// Directory holding the index store.
    #[arg(long, default_value = ".docseek")]
    pub root: PathBuf,

    /// TOML config file, layered under `DOCSEEK_*` environment variables.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip the model provider and use fallback embeddings only.
    #[arg(long, default_value_t = false)]
    pub offline: bool,

    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Index(IndexArgs),
    Search(SearchArgs),
    List(ListArgs),
    Remove(RemoveArgs),
    /// Drop records whose source file no longer exists.
    Prune,
    Status,
}

impl Commands {
    /// Operation name reported in error payloads.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Index(_) => "index",
            Self::Search(_) => "search",
            Self::List(_) => "list",
            Self::Remove(_) => "remove",
            Self::Prune => "prune",
            Self::Status => "status",
        }
    }

    pub fn target_path(&self) -> Option<String> {
        match self {
            Self::Index(args) => Some(args.folder.display().to_string()),
            Self::Remove(args) => Some(args.path.clone()),
            Self::Search(_) | Self::List(_) | Self::Prune | Self::Status => None,
        }
    }
}
