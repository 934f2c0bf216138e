use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Read a file to string, replacing invalid UTF-8 sequences with the replacement character.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_to_string_lossy(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read and parse a JSON document.
///
/// Parse failures are mapped to `io::ErrorKind::InvalidData` so callers only
/// have one error type to deal with.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn read_json(path: &Path) -> io::Result<serde_json::Value> {
    let content = read_to_string_lossy(path)?;
    serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// List the names of the immediate subdirectories of `dir`, sorted by name.
///
/// Symlinks are followed, so a link pointing at a directory is listed.
/// Regular files and dangling links are skipped. Entries whose names are
/// not valid UTF-8 are skipped as well.
///
/// # Errors
/// Returns an error if `dir` cannot be read.
pub fn list_subdirs(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            // The root itself failing is a real error; a single broken entry is not.
            Err(e) if e.depth() == 0 => {
                return Err(e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("failed to read directory")));
            }
            Err(_) => continue,
        };

        if !entry.file_type().is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }

    Ok(names)
}
