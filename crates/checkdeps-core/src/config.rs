use regex_lite::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

/// A line-oriented output sink.
pub type Sink = Arc<dyn Fn(&str) + Send + Sync>;

/// Pattern the package manager identifier must match.
pub const PACKAGE_MANAGER_PATTERN: &str = "^[a-z][a-z0-9-]*$";

fn package_manager_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!("(?i){PACKAGE_MANAGER_PATTERN}")).expect("static pattern is valid")
    })
}

/// Configuration for one reconciliation run.
///
/// Built once per invocation and never mutated by the reconciler.
#[derive(Clone)]
pub struct Config {
    /// Package manager identifier, also the external command name.
    pub package_manager: String,

    /// Project root (or its manifest file). Searched upward from the
    /// working directory when unset.
    pub package_dir: Option<PathBuf>,

    /// Flag installed packages that no scope declares.
    pub only_specified: bool,

    /// Run `<package_manager> install` instead of only reporting.
    pub install: bool,

    /// Manifest sections whose entries must be installed.
    pub scope_list: Vec<String>,

    /// Manifest sections whose entries are checked only when installed.
    pub optional_scope_list: Vec<String>,

    /// Extract semver tags from Git URL specifiers.
    pub check_git_urls: bool,

    /// Record log lines and forward every line to the sinks.
    pub verbose: bool,

    /// Receives informational lines when `verbose` is set.
    pub log: Option<Sink>,

    /// Receives problem lines when `verbose` is set.
    pub error: Option<Sink>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("package_manager", &self.package_manager)
            .field("package_dir", &self.package_dir)
            .field("only_specified", &self.only_specified)
            .field("install", &self.install)
            .field("scope_list", &self.scope_list)
            .field("optional_scope_list", &self.optional_scope_list)
            .field("check_git_urls", &self.check_git_urls)
            .field("verbose", &self.verbose)
            .field("log", &self.log.is_some())
            .field("error", &self.error.is_some())
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            package_manager: "npm".to_string(),
            package_dir: None,
            only_specified: false,
            install: false,
            scope_list: vec!["dependencies".to_string(), "devDependencies".to_string()],
            optional_scope_list: vec!["optionalDependencies".to_string()],
            check_git_urls: false,
            verbose: false,
            log: None,
            error: None,
        }
    }
}

impl Config {
    /// Create a config rooted at the given project directory.
    #[must_use]
    pub fn new(package_dir: impl Into<PathBuf>) -> Self {
        Self {
            package_dir: Some(package_dir.into()),
            ..Default::default()
        }
    }

    /// Set the package manager identifier.
    #[must_use]
    pub fn with_package_manager(mut self, package_manager: impl Into<String>) -> Self {
        self.package_manager = package_manager.into();
        self
    }

    /// Set the project directory.
    #[must_use]
    pub fn with_package_dir(mut self, package_dir: impl Into<PathBuf>) -> Self {
        self.package_dir = Some(package_dir.into());
        self
    }

    /// Set only-specified mode.
    #[must_use]
    pub fn with_only_specified(mut self, only_specified: bool) -> Self {
        self.only_specified = only_specified;
        self
    }

    /// Set install mode.
    #[must_use]
    pub fn with_install(mut self, install: bool) -> Self {
        self.install = install;
        self
    }

    /// Replace the required scopes.
    #[must_use]
    pub fn with_scope_list<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope_list = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the optional scopes.
    #[must_use]
    pub fn with_optional_scope_list<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional_scope_list = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Set Git URL checking.
    #[must_use]
    pub fn with_check_git_urls(mut self, check_git_urls: bool) -> Self {
        self.check_git_urls = check_git_urls;
        self
    }

    /// Set verbosity.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the informational sink.
    #[must_use]
    pub fn with_log_sink(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.log = Some(Arc::new(sink));
        self
    }

    /// Set the problem sink.
    #[must_use]
    pub fn with_error_sink(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.error = Some(Arc::new(sink));
        self
    }

    /// Check the configuration before any file is touched.
    ///
    /// # Errors
    /// Returns the human-readable reason when `package_manager` is malformed.
    pub fn validate(&self) -> Result<(), String> {
        if package_manager_regex().is_match(&self.package_manager) {
            Ok(())
        } else {
            Err(format!(
                "The packageManager field value must match the regex `/{PACKAGE_MANAGER_PATTERN}/i`; got: \"{}\"",
                self.package_manager
            ))
        }
    }
}
