use std::env;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

pub mod commands;
pub mod logging;

/// Absolute form of `--dir`.
///
/// Existing directories are canonicalized; anything else is joined onto the
/// working directory so the generator can report a proper IO error later.
pub fn canonicalize_or_current(dir: &str) -> Result<PathBuf> {
    let cwd = env::current_dir().context("Failed to get current directory")?;
    let requested = cwd.join(dir);
    Ok(requested.canonicalize().unwrap_or(requested))
}

/// Hex SHA-256 of a generated header, for the `--json` report.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .with_context(|| format!("Failed to open image for hashing: {}", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("Failed to read image for hashing: {}", path.display()))?;
    Ok(format!("{:x}", hasher.finalize()))
}
