//! Reconciliation decision engine.
//!
//! One pass inspects the project and settles as clean, dirty, or fatal. A
//! dirty project is either reported with a remediation hint or handed to the
//! package manager, after which the directory is checked again.
//!
//! The state machine is shared by a blocking entry point driven by a
//! [`CommandRunner`] and a non-blocking one driven by an
//! [`AsyncCommandRunner`].

use crate::config::Config;
use crate::error::CheckError;
use crate::inspect::Inspector;
use crate::issue::Issue;
use crate::manifest::load_manifest;
use crate::profile::Profile;
use crate::report::{Report, ReportBuilder};
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::{debug, info, warn};

/// Runs an external command to completion, blocking the caller.
pub trait CommandRunner {
    /// Run `program` with `args` in `cwd`.
    ///
    /// Returns the exit code, or `None` if the process was killed by a signal.
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> io::Result<Option<i32>>;
}

/// Runs an external command without blocking the caller's thread.
pub trait AsyncCommandRunner {
    /// Run `program` with `args` in `cwd`.
    ///
    /// Returns the exit code, or `None` if the process was killed by a signal.
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
    ) -> impl Future<Output = io::Result<Option<i32>>> + Send;
}

/// Resolve a program through `PATH`, keeping the bare name if lookup fails.
fn resolve_program(program: &str) -> PathBuf {
    which::which(program).unwrap_or_else(|_| PathBuf::from(program))
}

/// Spawns real processes with `std::process`, inheriting stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> io::Result<Option<i32>> {
        let status = std::process::Command::new(resolve_program(program))
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(status.code())
    }
}

/// Spawns real processes with `tokio::process`, inheriting stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioRunner;

impl AsyncCommandRunner for TokioRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
    ) -> impl Future<Output = io::Result<Option<i32>>> + Send {
        let mut command = tokio::process::Command::new(resolve_program(program));
        command
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        async move {
            let status = command.status().await?;
            Ok(status.code())
        }
    }
}

/// Where a checking pass settled.
enum Pass {
    /// Configuration or manifest problem; nothing else was checked.
    Fatal,
    Clean,
    Dirty {
        package_dir: PathBuf,
        prune_needed: bool,
    },
}

/// Run one checking pass, recording every line into `out`.
fn evaluate(config: &Config, cwd: &Path, out: &mut ReportBuilder) -> Pass {
    if let Err(reason) = config.validate() {
        out.issue(&Issue::InvalidConfiguration { reason });
        return Pass::Fatal;
    }

    let profile = Profile::for_package_manager(&config.package_manager);
    let manifest = match load_manifest(config.package_dir.as_deref(), &profile, cwd) {
        Ok(manifest) => manifest,
        Err(issue) => {
            out.issue(&issue);
            return Pass::Fatal;
        }
    };
    debug!(package_dir = %manifest.package_dir.display(), "manifest loaded");

    let required = manifest.merge_scopes(&config.scope_list);
    let optional = manifest.merge_scopes(&config.optional_scope_list);
    let inspector = Inspector::new(&manifest.package_dir, &profile, config.check_git_urls);

    for issue in &required.issues {
        out.issue(issue);
    }
    for (name, spec) in &required.deps {
        inspector.check_dependency(name, spec, false, out);
    }

    for issue in &optional.issues {
        out.issue(issue);
    }
    for (name, spec) in &optional.deps {
        inspector.check_dependency(name, spec, true, out);
    }

    if config.only_specified {
        inspector.scan_extraneous(|name| required.contains(name) || optional.contains(name), out);
    }

    if out.failed() {
        Pass::Dirty {
            package_dir: manifest.package_dir,
            prune_needed: out.prune_needed(),
        }
    } else {
        Pass::Clean
    }
}

/// What the caller must do after the first pass.
enum Next {
    Done(Report),
    Install {
        out: ReportBuilder,
        package_dir: PathBuf,
        subcommands: Vec<&'static str>,
    },
}

fn begin(config: &Config, cwd: &Path) -> Next {
    let mut out = ReportBuilder::new(config);

    match evaluate(config, cwd, &mut out) {
        Pass::Fatal => Next::Done(out.finish(1, false)),
        Pass::Clean => Next::Done(out.finish(0, true)),
        Pass::Dirty {
            package_dir,
            prune_needed,
        } => {
            let pm = &config.package_manager;
            if !config.install {
                out.error(if prune_needed {
                    format!(
                        "Invoke {pm} prune and {pm} install to install missing packages and remove excessive ones"
                    )
                } else {
                    format!("Invoke {pm} install to install missing packages")
                });
                return Next::Done(out.finish(1, false));
            }

            let mut subcommands = Vec::with_capacity(2);
            if prune_needed {
                subcommands.push("prune");
            }
            subcommands.push("install");
            Next::Install {
                out,
                package_dir,
                subcommands,
            }
        }
    }
}

fn announce(config: &Config, subcommand: &str, package_dir: &Path, out: &mut ReportBuilder) -> String {
    let command = format!("{} {subcommand}", config.package_manager);
    info!(command = %command, cwd = %package_dir.display(), "invoking package manager");
    out.log(format!("Invoking {command}..."));
    command
}

/// Check the directory again after the package manager succeeded.
fn settle_installed(config: &Config, cwd: &Path, mut out: ReportBuilder) -> Report {
    let mut recheck = ReportBuilder::muted();
    evaluate(config, cwd, &mut recheck);

    let pm = &config.package_manager;
    match recheck.problem_count() {
        0 => out.log(format!("All dependencies are in sync after {pm} install")),
        n => {
            warn!(problems = n, "dependencies still out of sync after install");
            out.log(format!("{n} problem(s) remain after {pm} install"));
        }
    }
    out.finish(0, false)
}

/// Check dependencies, installing with the system package manager when asked.
///
/// Blocks until any package manager process exits.
///
/// # Errors
/// Returns an error when the package manager cannot be started or exits
/// unsuccessfully. Every other problem is reported in the returned
/// [`Report`].
pub fn check_dependencies_sync(config: &Config) -> Result<Report, CheckError> {
    check_dependencies_sync_with_runner(config, &SystemRunner)
}

/// Blocking check using the given runner for package manager commands.
///
/// # Errors
/// See [`check_dependencies_sync`].
pub fn check_dependencies_sync_with_runner<R: CommandRunner>(
    config: &Config,
    runner: &R,
) -> Result<Report, CheckError> {
    let cwd = std::env::current_dir()?;

    let (mut out, package_dir, subcommands) = match begin(config, &cwd) {
        Next::Done(report) => return Ok(report),
        Next::Install {
            out,
            package_dir,
            subcommands,
        } => (out, package_dir, subcommands),
    };

    for subcommand in subcommands {
        let command = announce(config, subcommand, &package_dir, &mut out);
        match runner.run(&config.package_manager, &[subcommand], &package_dir) {
            Ok(Some(0)) => {}
            Ok(code) => return Err(CheckError::from_exit(command, code)),
            Err(source) => {
                return Err(CheckError::Spawn {
                    command,
                    cwd: package_dir,
                    source,
                })
            }
        }
    }

    Ok(settle_installed(config, &cwd, out))
}

/// Check dependencies, installing with the system package manager when asked.
///
/// Never fails: a package manager that cannot be started or exits
/// unsuccessfully is reported as an error line with `status` 1.
pub async fn check_dependencies(config: &Config) -> Report {
    check_dependencies_with_runner(config, &TokioRunner).await
}

/// Non-blocking check using the given runner for package manager commands.
pub async fn check_dependencies_with_runner<R: AsyncCommandRunner>(
    config: &Config,
    runner: &R,
) -> Report {
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            let mut out = ReportBuilder::new(config);
            out.error(format!("Cannot determine working directory: {e}"));
            return out.finish(1, false);
        }
    };

    let (mut out, package_dir, subcommands) = match begin(config, &cwd) {
        Next::Done(report) => return report,
        Next::Install {
            out,
            package_dir,
            subcommands,
        } => (out, package_dir, subcommands),
    };

    for subcommand in subcommands {
        let command = announce(config, subcommand, &package_dir, &mut out);
        let detail = match runner
            .run(&config.package_manager, &[subcommand], &package_dir)
            .await
        {
            Ok(Some(0)) => continue,
            Ok(Some(code)) => format!("failed with code: {code}"),
            Ok(None) => "was terminated by a signal".to_string(),
            Err(e) => format!("failed to start: {e}"),
        };
        out.issue(&Issue::InstallFailed { command, detail });
        return out.finish(1, false);
    }

    settle_installed(config, &cwd, out)
}
