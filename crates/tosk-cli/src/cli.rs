use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tosk",
    about = "Typed-Object Storage Kernel — content addressing tools",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the SHA-1 digest of a file
    Digest(DigestArgs),
    /// Print the version identity derived from a file
    Version(VersionArgs),
}

#[derive(Args)]
pub struct DigestArgs {
    /// File to digest
    pub path: PathBuf,
}

#[derive(Args)]
pub struct VersionArgs {
    /// File to derive the identity from
    pub path: PathBuf,

    /// Digest at most this many leading bytes
    #[arg(long)]
    pub limit: Option<u64>,
}
