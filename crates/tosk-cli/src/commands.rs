use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use tosk_digest::DigestEngine;
use tosk_types::{Sha1Digest, VersionType};
use tosk_version::version_of_archive;

use crate::cli::*;

/// Read granularity for file streaming. Small enough that any file past a
/// few kilobytes exercises the incremental path of the engine.
const READ_CHUNK: usize = 8 * 1024;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Digest(args) => cmd_digest(args),
        Command::Version(args) => cmd_version(args),
    }
}

fn cmd_digest(args: DigestArgs) -> anyhow::Result<()> {
    let hex = digest_file(&args.path)?;
    println!("{hex}  {}", args.path.display());
    Ok(())
}

fn cmd_version(args: VersionArgs) -> anyhow::Result<()> {
    let version = version_file(&args.path, args.limit)?;
    println!("id        {}", version.id.to_hex());
    println!("conflict  {}", version.conflict.to_hex());
    println!("algorithm {}", version.algorithm);
    println!("protocol  {}", version.protocol);
    Ok(())
}

/// Digest `path` chunk by chunk and return the canonical hex form.
///
/// The hex string is parsed back and compared against the computed digest
/// before it is returned, so a printed digest is guaranteed to round-trip.
fn digest_file(path: &Path) -> anyhow::Result<String> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let mut engine = DigestEngine::new();
    let mut buf = [0u8; READ_CHUNK];
    let mut total: u64 = 0;
    loop {
        let got = reader.read(&mut buf)?;
        if got == 0 {
            break;
        }
        engine.process_block(&buf[..got]);
        total += got as u64;
    }
    let digest = engine.finalize();
    debug!(bytes = total, path = %path.display(), "digested file");

    let hex = digest.to_hex();
    let parsed =
        Sha1Digest::from_hex(&hex).with_context(|| format!("canonical form of {hex}"))?;
    anyhow::ensure!(parsed == digest, "digest did not survive the hex round-trip");
    Ok(hex)
}

/// Derive a version identity from up to `limit` bytes of `path`.
fn version_file(path: &Path, limit: Option<u64>) -> anyhow::Result<VersionType> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let version = version_of_archive(BufReader::new(file), limit.unwrap_or(u64::MAX))?;
    Ok(version)
}
