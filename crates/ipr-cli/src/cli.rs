use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ipr",
    about = "Resolve paths across content-addressed IPLD blocks",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file; defaults to ./ipr.toml when present
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store a DAG-JSON document as a block
    Put(PutArgs),
    /// Print nodes as DAG-JSON
    Get(GetArgs),
    /// Resolve a path, printing every step
    Resolve(ResolveArgs),
    /// List the paths beneath a node
    Tree(TreeArgs),
    /// Remove blocks
    Rm(RmArgs),
}

#[derive(Args)]
pub struct PutArgs {
    /// DAG-JSON file, or `-` for stdin
    #[arg(default_value = "-")]
    pub input: String,
    /// Codec name or code; defaults to the configured codec
    #[arg(long)]
    pub codec: Option<String>,
    /// Hash function name
    #[arg(long)]
    pub hash: Option<String>,
    #[arg(long)]
    pub cid_version: Option<u64>,
    /// Print the CID without storing the block
    #[arg(long)]
    pub only_hash: bool,
}

#[derive(Args)]
pub struct GetArgs {
    #[arg(required = true)]
    pub cids: Vec<String>,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// `<cid>` or `<cid>/<path>`
    pub target: String,
}

#[derive(Args)]
pub struct TreeArgs {
    pub cid: String,
    #[arg(long, default_value = "")]
    pub offset: String,
    #[arg(short, long)]
    pub recursive: bool,
}

#[derive(Args)]
pub struct RmArgs {
    #[arg(required = true)]
    pub cids: Vec<String>,
}
