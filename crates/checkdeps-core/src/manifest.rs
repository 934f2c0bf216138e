//! Project manifest loading.
//!
//! Locates the manifest, parses it, and merges the requested scopes into
//! ordered name → specifier mappings.

use crate::issue::{json_type_name, Issue};
use crate::paths::resolve_package_dir;
use crate::profile::Profile;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// A parsed project manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Absolute project root.
    pub package_dir: PathBuf,
    /// Top-level object of the manifest.
    pub root: Map<String, Value>,
}

/// Dependencies merged from a list of scopes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeDeps {
    /// `(name, specifier)` pairs in declaration order.
    pub deps: Vec<(String, String)>,
    /// Every declared name, including entries with an invalid specifier.
    pub names: Vec<String>,
    /// Problems found while merging.
    pub issues: Vec<Issue>,
}

impl ScopeDeps {
    /// Check whether `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Locate and parse the project manifest.
///
/// With an explicit `package_dir` only that directory is considered. Without
/// one, the manifest is searched for from `cwd` upward.
///
/// # Errors
/// Returns [`Issue::MissingManifest`] when no manifest exists and
/// [`Issue::InvalidManifest`] when it cannot be parsed as a JSON object.
pub fn load_manifest(
    package_dir: Option<&Path>,
    profile: &Profile,
    cwd: &Path,
) -> Result<Manifest, Issue> {
    let missing = || Issue::MissingManifest {
        file_name: profile.manifest.to_string(),
    };

    let package_dir = resolve_package_dir(package_dir, profile.manifest, cwd).ok_or_else(missing)?;
    let manifest_path = package_dir.join(profile.manifest);
    if !manifest_path.is_file() {
        return Err(missing());
    }

    let invalid = |detail: String| Issue::InvalidManifest {
        file_name: profile.manifest.to_string(),
        detail,
    };

    let value = checkdeps_util::fs::read_json(&manifest_path).map_err(|e| invalid(e.to_string()))?;
    let Value::Object(root) = value else {
        return Err(invalid(format!(
            "expected object, got {}",
            json_type_name(&value)
        )));
    };

    Ok(Manifest { package_dir, root })
}

impl Manifest {
    /// Merge the given scopes into one mapping.
    ///
    /// Later scopes overwrite earlier ones on name collision; a name keeps the
    /// position where it was first declared. Missing and `null` sections are
    /// skipped.
    #[must_use]
    pub fn merge_scopes<S: AsRef<str>>(&self, scopes: &[S]) -> ScopeDeps {
        let mut merged: Map<String, Value> = Map::new();
        let mut result = ScopeDeps::default();

        for scope in scopes {
            let scope = scope.as_ref();
            match self.root.get(scope) {
                None | Some(Value::Null) => {}
                Some(Value::Object(section)) => {
                    for (name, spec) in section {
                        merged.insert(name.clone(), spec.clone());
                    }
                }
                Some(other) => result.issues.push(Issue::InvalidScope {
                    scope: scope.to_string(),
                    actual_type: json_type_name(other),
                }),
            }
        }

        for (name, spec) in merged {
            result.names.push(name.clone());
            match spec {
                Value::String(spec) => result.deps.push((name, spec)),
                other => result.issues.push(Issue::InvalidSpecifier {
                    name,
                    actual_type: json_type_name(&other),
                }),
            }
        }

        result
    }
}
