//! Problems a reconciliation pass can report.
//!
//! Each issue renders to exactly one report line. Whether the line lands in
//! `log` or `error`, and whether it fails the pass, is decided here.

use std::fmt;

/// Stable issue codes.
pub mod codes {
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
    pub const MANIFEST_MISSING: &str = "MANIFEST_MISSING";
    pub const MANIFEST_INVALID: &str = "MANIFEST_INVALID";
    pub const SCOPE_INVALID: &str = "SCOPE_INVALID";
    pub const SPECIFIER_INVALID: &str = "SPECIFIER_INVALID";
    pub const DEP_NOT_INSTALLED: &str = "DEP_NOT_INSTALLED";
    pub const DEP_OPTIONAL_NOT_INSTALLED: &str = "DEP_OPTIONAL_NOT_INSTALLED";
    pub const DEP_VERSION_MISMATCH: &str = "DEP_VERSION_MISMATCH";
    pub const DEP_ALIAS_MISMATCH: &str = "DEP_ALIAS_MISMATCH";
    pub const DEP_MANIFEST_INVALID: &str = "DEP_MANIFEST_INVALID";
    pub const DEP_EXTRANEOUS: &str = "DEP_EXTRANEOUS";
    pub const INSTALL_FAILED: &str = "INSTALL_FAILED";
}

/// A single problem found while reconciling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    InvalidConfiguration {
        reason: String,
    },
    MissingManifest {
        file_name: String,
    },
    InvalidManifest {
        file_name: String,
        detail: String,
    },
    InvalidScope {
        scope: String,
        actual_type: &'static str,
    },
    InvalidSpecifier {
        name: String,
        actual_type: &'static str,
    },
    NotInstalled {
        name: String,
    },
    OptionalNotInstalled {
        name: String,
    },
    VersionMismatch {
        name: String,
        installed: String,
        expected: String,
    },
    AliasMismatch {
        name: String,
        installed_name: String,
        expected_name: String,
    },
    InvalidInstalledManifest {
        name: String,
        file_name: String,
        detail: String,
    },
    ExtraneousPackage {
        name: String,
    },
    InstallFailed {
        command: String,
        detail: String,
    },
}

impl Issue {
    /// Get the stable code for this issue.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration { .. } => codes::CONFIG_INVALID,
            Self::MissingManifest { .. } => codes::MANIFEST_MISSING,
            Self::InvalidManifest { .. } => codes::MANIFEST_INVALID,
            Self::InvalidScope { .. } => codes::SCOPE_INVALID,
            Self::InvalidSpecifier { .. } => codes::SPECIFIER_INVALID,
            Self::NotInstalled { .. } => codes::DEP_NOT_INSTALLED,
            Self::OptionalNotInstalled { .. } => codes::DEP_OPTIONAL_NOT_INSTALLED,
            Self::VersionMismatch { .. } => codes::DEP_VERSION_MISMATCH,
            Self::AliasMismatch { .. } => codes::DEP_ALIAS_MISMATCH,
            Self::InvalidInstalledManifest { .. } => codes::DEP_MANIFEST_INVALID,
            Self::ExtraneousPackage { .. } => codes::DEP_EXTRANEOUS,
            Self::InstallFailed { .. } => codes::INSTALL_FAILED,
        }
    }

    /// Whether this issue fails the pass.
    ///
    /// Only a missing optional dependency is informational.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::OptionalNotInstalled { .. })
    }

    /// Whether fixing this issue requires removing installed packages.
    #[must_use]
    pub fn needs_prune(&self) -> bool {
        matches!(self, Self::ExtraneousPackage { .. })
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { reason } => f.write_str(reason),
            Self::MissingManifest { file_name } => write!(f, "Missing {file_name}!"),
            Self::InvalidManifest { file_name, detail } => {
                write!(f, "Invalid {file_name}: {detail}")
            }
            Self::InvalidScope { scope, actual_type } => {
                write!(f, "{scope}: expected object, got {actual_type}")
            }
            Self::InvalidSpecifier { name, actual_type } => write!(
                f,
                "{name}: invalid version specifier (expected string, got {actual_type})"
            ),
            Self::NotInstalled { name } | Self::OptionalNotInstalled { name } => {
                write!(f, "{name}: not installed!")
            }
            Self::VersionMismatch {
                name,
                installed,
                expected,
            } => write!(f, "{name}: installed: {installed}, expected: {expected}"),
            Self::AliasMismatch {
                name,
                installed_name,
                expected_name,
            } => write!(
                f,
                "{name}: installed: {installed_name}, expected: {expected_name}"
            ),
            Self::InvalidInstalledManifest {
                name,
                file_name,
                detail,
            } => write!(f, "{name}: invalid {file_name}: {detail}"),
            Self::ExtraneousPackage { name } => {
                write!(f, "Package {name} installed, though it shouldn't be")
            }
            Self::InstallFailed { command, detail } => write!(f, "{command} {detail}"),
        }
    }
}

/// Get a human-readable type name for a JSON value.
#[must_use]
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
