//! Dependency reconciliation for JavaScript package managers.
//!
//! Reads a project manifest, compares each declared dependency with what is
//! installed in the dependency directory, and optionally runs the package
//! manager to fix the difference.
//!
//! ```no_run
//! use checkdeps_core::{check_dependencies_sync, Config};
//!
//! let report = check_dependencies_sync(&Config::new("path/to/project"))?;
//! for line in &report.error {
//!     eprintln!("{line}");
//! }
//! # Ok::<(), checkdeps_core::CheckError>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod error;
mod inspect;
pub mod issue;
pub mod manifest;
pub mod paths;
pub mod profile;
pub mod reconcile;
pub mod report;
pub mod spec;
pub mod version;

pub use config::{Config, Sink};
pub use error::CheckError;
pub use issue::{codes, Issue};
pub use manifest::{load_manifest, Manifest, ScopeDeps};
pub use profile::Profile;
pub use reconcile::{
    check_dependencies, check_dependencies_sync, check_dependencies_sync_with_runner,
    check_dependencies_with_runner, AsyncCommandRunner, CommandRunner, SystemRunner, TokioRunner,
};
pub use report::Report;
pub use spec::{classify_specifier, SkipReason, SpecKind};
pub use version::{is_valid_version, version_satisfies};
