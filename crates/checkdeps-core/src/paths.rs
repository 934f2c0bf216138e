use std::path::{Path, PathBuf};

/// Find the nearest directory containing `file_name`, walking up from `start`.
///
/// Returns the first directory containing the file, or `None` once the
/// filesystem root has been checked.
#[must_use]
pub fn find_upward(start: &Path, file_name: &str) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(file_name).is_file() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Work out the project root for a run.
///
/// An explicit `package_dir` may name the manifest itself; the file name is
/// stripped. Relative paths are taken against `cwd`. Without an explicit
/// directory the manifest is searched for from `cwd` upward.
///
/// The returned path is absolute. It is canonicalized when it exists, using
/// `dunce` so Windows paths stay free of the `\\?\` prefix.
#[must_use]
pub fn resolve_package_dir(
    package_dir: Option<&Path>,
    manifest: &str,
    cwd: &Path,
) -> Option<PathBuf> {
    let dir = match package_dir {
        Some(dir) => {
            let dir = if dir.file_name().is_some_and(|name| name == manifest) {
                dir.parent().unwrap_or(Path::new("."))
            } else {
                dir
            };
            cwd.join(dir)
        }
        None => find_upward(cwd, manifest)?,
    };

    Some(dunce::canonicalize(&dir).unwrap_or(dir))
}
