//! Installed-set inspection.
//!
//! Compares each declared dependency against what is on disk in the
//! dependency directory, and optionally looks for packages nobody declared.

use crate::issue::Issue;
use crate::profile::Profile;
use crate::report::ReportBuilder;
use crate::spec::{classify_specifier, SpecKind};
use crate::version::version_satisfies;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Inspects one project's dependency directory.
pub(crate) struct Inspector<'a> {
    deps_dir: PathBuf,
    profile: &'a Profile,
    check_git_urls: bool,
}

impl<'a> Inspector<'a> {
    pub(crate) fn new(package_dir: &Path, profile: &'a Profile, check_git_urls: bool) -> Self {
        Self {
            deps_dir: profile.deps_dir_in(package_dir),
            profile,
            check_git_urls,
        }
    }

    /// Check a single declared dependency.
    ///
    /// Produces at most one line, except for an alias whose installed name
    /// is wrong, which reports the name and then the version.
    pub(crate) fn check_dependency(
        &self,
        name: &str,
        spec: &str,
        optional: bool,
        out: &mut ReportBuilder,
    ) {
        let dep_manifest = self
            .dep_dir(name)
            .filter(|dir| dir.is_dir())
            .map(|dir| dir.join(self.profile.installed_manifest))
            .filter(|manifest| manifest.is_file());

        let Some(dep_manifest) = dep_manifest else {
            let name = name.to_string();
            out.issue(&if optional {
                Issue::OptionalNotInstalled { name }
            } else {
                Issue::NotInstalled { name }
            });
            return;
        };

        let (expected_name, range) = match classify_specifier(
            spec,
            self.check_git_urls,
            self.profile.alias_prefix,
        ) {
            SpecKind::Skip(reason) => {
                debug!(package = name, spec, ?reason, "version check skipped");
                return;
            }
            SpecKind::Range(range) => (None, range),
            SpecKind::Alias { name, range } => (Some(name), range),
        };

        let invalid = |detail: String| Issue::InvalidInstalledManifest {
            name: name.to_string(),
            file_name: self.profile.installed_manifest.to_string(),
            detail,
        };

        let dep_json = match checkdeps_util::fs::read_json(&dep_manifest) {
            Ok(value) => value,
            Err(e) => {
                out.issue(&invalid(e.to_string()));
                return;
            }
        };

        if let Some(expected_name) = expected_name {
            let installed_name = dep_json
                .get("name")
                .and_then(|n| n.as_str())
                .unwrap_or("<unnamed>");
            if installed_name != expected_name {
                out.issue(&Issue::AliasMismatch {
                    name: name.to_string(),
                    installed_name: installed_name.to_string(),
                    expected_name,
                });
            }
        }

        let Some(installed) = dep_json.get("version").and_then(|v| v.as_str()) else {
            out.issue(&invalid("missing \"version\" field".to_string()));
            return;
        };

        if version_satisfies(installed, &range) {
            out.log(format!("{name}: installed: {installed}, expected: {range}"));
        } else {
            out.issue(&Issue::VersionMismatch {
                name: name.to_string(),
                installed: installed.to_string(),
                expected: range,
            });
        }
    }

    /// Directory a package is installed in.
    ///
    /// `None` for names that would resolve outside the dependency directory,
    /// such as absolute paths or names with `..` segments.
    fn dep_dir(&self, name: &str) -> Option<PathBuf> {
        let path = Path::new(name);
        let contained = path.components().next().is_some()
            && path.components().all(|c| matches!(c, Component::Normal(_)));
        contained.then(|| self.deps_dir.join(path))
    }

    /// Report installed packages for which `is_declared` returns false.
    ///
    /// Hidden entries and plain files are ignored. `@scope` directories are
    /// descended into so scoped packages are matched by their full name.
    pub(crate) fn scan_extraneous(&self, is_declared: impl Fn(&str) -> bool, out: &mut ReportBuilder) {
        let entries = match checkdeps_util::fs::list_subdirs(&self.deps_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %self.deps_dir.display(), error = %e, "dependency directory not readable");
                return;
            }
        };

        for entry in entries.into_iter().filter(|e| !e.starts_with('.')) {
            let names: Vec<String> = if entry.starts_with('@') {
                checkdeps_util::fs::list_subdirs(&self.deps_dir.join(&entry))
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|child| !child.starts_with('.'))
                    .map(|child| format!("{entry}/{child}"))
                    .collect()
            } else {
                vec![entry]
            };

            for name in names {
                if !is_declared(&name) {
                    out.issue(&Issue::ExtraneousPackage { name });
                }
            }
        }
    }
}
