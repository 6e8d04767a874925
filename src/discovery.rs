//! Input file discovery: directory scan or script file of paths.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// List all `.wav` files directly under `dir`, sorted by path.
pub fn list_wav_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && has_wav_extension(p))
        .collect();
    files.sort();
    Ok(files)
}

/// Read a newline-delimited script file of WAV paths.
///
/// Blank lines and entries without a `.wav` extension are dropped, matching
/// the reference tool's script-file loader. Paths are not checked for
/// existence here; that is a per-file precondition.
pub fn load_script_file(path: &Path) -> Result<Vec<PathBuf>> {
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .filter(|p| has_wav_extension(p))
        .collect())
}

fn has_wav_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
}
