//! Target resolution: a single `.cs` file or a gitignore-aware directory walk.

use ignore::WalkBuilder;
use std::io;
use std::path::{Path, PathBuf};

/// Resolve a CLI target to the list of C# files to process, sorted.
///
/// A directory is walked respecting ignore files; an explicitly named file
/// must be a `.cs` file. Walk errors are warnings, not failures.
pub fn collect_cs_files(target: &Path) -> io::Result<Vec<PathBuf>> {
    if target.is_file() {
        if target.extension().is_some_and(|e| e == "cs") {
            return Ok(vec![target.to_path_buf()]);
        }
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a C# source file", target.display()),
        ));
    }
    if !target.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} does not exist", target.display()),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkBuilder::new(target).build() {
        match entry {
            Ok(entry) => {
                let is_file = entry.file_type().is_some_and(|t| t.is_file());
                if is_file && entry.path().extension().is_some_and(|e| e == "cs") {
                    files.push(entry.into_path());
                }
            }
            Err(err) => eprintln!("warning: {err}"),
        }
    }
    files.sort();
    Ok(files)
}
