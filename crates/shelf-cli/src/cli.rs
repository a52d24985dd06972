use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use shelf_store::SearchScope;

#[derive(Parser)]
#[command(
    name = "shelf",
    about = "Shelf — embedded file-backed record store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Root directory for record files (overrides the config file)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Path to a shelf.toml configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print a record as JSON
    Get(GetArgs),
    /// Write key=value entries into a record
    Set(SetArgs),
    /// Delete a record
    Delete(DeleteArgs),
    /// Check whether a record exists
    Exists(ExistsArgs),
    /// Search a record's keys and values
    Search(SearchArgs),
    /// Show cache statistics
    Stats,
    /// Remove expired cache entries
    Clean,
}

#[derive(Args)]
pub struct GetArgs {
    /// Object name, e.g. User/Admin
    pub name: String,
}

#[derive(Args)]
pub struct SetArgs {
    /// Object name, e.g. User/Admin
    pub name: String,
    /// Entries as key=value pairs; values are scalar-converted the same
    /// way the on-disk format converts them
    #[arg(required = true)]
    pub entries: Vec<String>,
    /// Replace the record instead of merging into it
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub name: String,
}

#[derive(Args)]
pub struct ExistsArgs {
    pub name: String,
}

#[derive(Args)]
pub struct SearchArgs {
    pub name: String,
    pub term: String,
    /// Require full equality instead of a case-insensitive substring match
    #[arg(long)]
    pub exact: bool,
    #[arg(long, default_value = "both")]
    pub scope: ScopeArg,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ScopeArg {
    Key,
    Value,
    Both,
}

impl From<ScopeArg> for SearchScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Key => SearchScope::Key,
            ScopeArg::Value => SearchScope::Value,
            ScopeArg::Both => SearchScope::Both,
        }
    }
}
