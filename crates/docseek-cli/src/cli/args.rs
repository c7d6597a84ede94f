use std::path::PathBuf;

use clap::Args;

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Folder to scan recursively.
    pub folder: PathBuf,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(allow_hyphen_values = true)]
    pub query: String,
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Absolute path of the indexed file.
    pub path: String,
}
