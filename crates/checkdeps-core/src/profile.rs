//! Package manager profiles.
//!
//! Every path the reconciler touches is derived from a profile: the project
//! manifest name, the directory installed packages live in, and the manifest
//! each installed package carries.

use std::path::{Path, PathBuf};

/// File layout and conventions of one package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// Project manifest file name.
    pub manifest: &'static str,
    /// Default dependency directory, relative to the project root.
    pub deps_dir: &'static str,
    /// Manifest file inside each installed package.
    pub installed_manifest: &'static str,
    /// Prefix marking an aliased specifier (`npm:<real>@<range>`).
    pub alias_prefix: Option<&'static str>,
    /// Name of an rc file whose `directory` field overrides `deps_dir`.
    pub rc_file: Option<&'static str>,
}

const NODE: Profile = Profile {
    manifest: "package.json",
    deps_dir: "node_modules",
    installed_manifest: "package.json",
    alias_prefix: Some("npm:"),
    rc_file: None,
};

const BOWER: Profile = Profile {
    manifest: "bower.json",
    deps_dir: "bower_components",
    installed_manifest: ".bower.json",
    alias_prefix: None,
    rc_file: Some(".bowerrc"),
};

const PROFILES: &[(&str, Profile)] = &[
    ("npm", NODE),
    ("yarn", NODE),
    ("pnpm", NODE),
    ("bun", NODE),
    ("bower", BOWER),
];

impl Profile {
    /// Look up the profile for a package manager identifier.
    ///
    /// Unknown identifiers get the `node_modules` layout.
    #[must_use]
    pub fn for_package_manager(id: &str) -> Self {
        PROFILES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(id))
            .map_or(NODE, |(_, profile)| *profile)
    }

    /// Resolve the dependency directory for a project root.
    ///
    /// Honors the rc file's `directory` field when the profile has one.
    /// A missing or malformed rc file falls back to the default.
    #[must_use]
    pub fn deps_dir_in(&self, package_dir: &Path) -> PathBuf {
        if let Some(rc) = self.rc_file {
            if let Ok(value) = checkdeps_util::fs::read_json(&package_dir.join(rc)) {
                if let Some(dir) = value.get("directory").and_then(|d| d.as_str()) {
                    return package_dir.join(dir);
                }
            }
        }
        package_dir.join(self.deps_dir)
    }
}
