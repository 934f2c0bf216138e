#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod logging;

use checkdeps_core::{check_dependencies, check_dependencies_sync, Config, Report};
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "check-dependencies")]
#[command(author, version, about = "Check that installed dependencies match the project manifest", long_about = None)]
struct Cli {
    /// Package manager whose layout and commands to use
    #[arg(long, env = "CHECK_DEPENDENCIES_PACKAGE_MANAGER", default_value = "npm")]
    package_manager: String,

    /// Project directory (or its manifest file); searched upward when omitted
    #[arg(long, env = "CHECK_DEPENDENCIES_PACKAGE_DIR", value_name = "PATH")]
    package_dir: Option<PathBuf>,

    /// Report installed packages that no scope declares
    #[arg(long)]
    only_specified: bool,

    /// Run the package manager when dependencies are out of sync
    #[arg(long)]
    install: bool,

    /// Manifest sections that must be installed
    #[arg(long, value_delimiter = ',', value_name = "SCOPE")]
    scope_list: Vec<String>,

    /// Manifest sections that are checked only when installed
    #[arg(long, value_delimiter = ',', value_name = "SCOPE")]
    optional_scope_list: Vec<String>,

    /// Compare semver tags of Git URL dependencies
    #[arg(long)]
    check_git_urls: bool,

    /// Print every check (-v); more occurrences raise the log level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the report as JSON to stdout
    #[arg(long)]
    json: bool,

    /// Block on the package manager instead of awaiting it
    #[arg(long)]
    blocking: bool,

    /// Override the working directory used for manifest discovery
    #[arg(long, value_name = "PATH")]
    cwd: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::default()
            .with_package_manager(&self.package_manager)
            .with_only_specified(self.only_specified)
            .with_install(self.install)
            .with_check_git_urls(self.check_git_urls)
            .with_verbose(self.verbose > 0);

        if let Some(dir) = &self.package_dir {
            config = config.with_package_dir(dir);
        }
        if !self.scope_list.is_empty() {
            config = config.with_scope_list(&self.scope_list);
        }
        if !self.optional_scope_list.is_empty() {
            config = config.with_optional_scope_list(&self.optional_scope_list);
        }

        // Human mode prints lines as they are produced.
        if !self.json {
            config = config
                .with_log_sink(|line| println!("{line}"))
                .with_error_sink(|line| eprintln!("{line}"));
        }
        config
    }
}

fn render(report: &Report, json: bool, verbose: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report).into_diagnostic()?;
        println!("{out}");
    } else if !verbose {
        for line in &report.error {
            eprintln!("{line}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose.saturating_sub(1), cli.json);

    if let Some(cwd) = &cli.cwd {
        std::env::set_current_dir(cwd).into_diagnostic()?;
    }

    let config = cli.config();
    tracing::debug!(?config, blocking = cli.blocking, "starting check");

    let report = if cli.blocking {
        check_dependencies_sync(&config).into_diagnostic()?
    } else {
        let rt = tokio::runtime::Runtime::new().into_diagnostic()?;
        rt.block_on(check_dependencies(&config))
    };

    render(&report, cli.json, config.verbose)?;

    if !report.is_ok() {
        std::process::exit(1);
    }
    Ok(())
}
