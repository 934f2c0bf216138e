//! Reconciliation result.

use crate::config::{Config, Sink};
use crate::issue::Issue;
use serde::{Deserialize, Serialize};

/// Outcome of one reconciliation run.
///
/// `status` and `deps_were_ok` are independent: after a successful install
/// `status` is 0 while `deps_were_ok` still reports the state found before
/// the install.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// 0 when clean or repaired, 1 when problems remain unresolved.
    pub status: i32,
    /// True only if the first pass found nothing to fix.
    pub deps_were_ok: bool,
    /// Informational lines (recorded only in verbose mode).
    pub log: Vec<String>,
    /// Problem lines in declaration order, remediation hint last.
    pub error: Vec<String>,
}

impl Report {
    /// Check whether the run ended successfully.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == 0
    }
}

/// Accumulates lines for a [`Report`] during a pass.
///
/// Lines are appended monotonically. In verbose mode each line is also
/// forwarded to the configured sink as it is produced.
pub(crate) struct ReportBuilder {
    report: Report,
    verbose: bool,
    log_sink: Option<Sink>,
    error_sink: Option<Sink>,
    failed: bool,
    prune_needed: bool,
}

impl ReportBuilder {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            report: Report::default(),
            verbose: config.verbose,
            log_sink: config.log.clone(),
            error_sink: config.error.clone(),
            failed: false,
            prune_needed: false,
        }
    }

    /// A builder that records errors but never calls sinks.
    pub(crate) fn muted() -> Self {
        Self {
            report: Report::default(),
            verbose: false,
            log_sink: None,
            error_sink: None,
            failed: false,
            prune_needed: false,
        }
    }

    pub(crate) fn log(&mut self, message: impl Into<String>) {
        if !self.verbose {
            return;
        }
        let message = message.into();
        if let Some(sink) = &self.log_sink {
            sink(&message);
        }
        self.report.log.push(message);
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        if self.verbose {
            if let Some(sink) = &self.error_sink {
                sink(&message);
            }
        }
        self.report.error.push(message);
    }

    /// Record an issue, routing it to `log` or `error` by severity.
    pub(crate) fn issue(&mut self, issue: &Issue) {
        tracing::debug!(code = issue.code(), "{issue}");
        if issue.is_failure() {
            self.failed = true;
            self.prune_needed |= issue.needs_prune();
            self.error(issue.to_string());
        } else {
            self.log(issue.to_string());
        }
    }

    pub(crate) fn failed(&self) -> bool {
        self.failed
    }

    pub(crate) fn prune_needed(&self) -> bool {
        self.prune_needed
    }

    pub(crate) fn problem_count(&self) -> usize {
        self.report.error.len()
    }

    pub(crate) fn finish(mut self, status: i32, deps_were_ok: bool) -> Report {
        self.report.status = status;
        self.report.deps_were_ok = deps_were_ok;
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn capture() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Send + Sync + 'static) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let clone = Arc::clone(&lines);
        (lines, move |msg: &str| clone.lock().unwrap().push(msg.to_string()))
    }

    #[test]
    fn test_quiet_builder_drops_log_keeps_error() {
        let (logs, log_sink) = capture();
        let (errors, error_sink) = capture();
        let config = Config::default()
            .with_log_sink(log_sink)
            .with_error_sink(error_sink);

        let mut builder = ReportBuilder::new(&config);
        builder.log("a: installed: 1.0.0, expected: ^1.0.0");
        builder.error("b: not installed!");
        let report = builder.finish(1, false);

        assert!(report.log.is_empty());
        assert_eq!(report.error, vec!["b: not installed!"]);
        assert!(logs.lock().unwrap().is_empty());
        assert!(errors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_verbose_builder_forwards_to_sinks() {
        let (logs, log_sink) = capture();
        let (errors, error_sink) = capture();
        let config = Config::default()
            .with_verbose(true)
            .with_log_sink(log_sink)
            .with_error_sink(error_sink);

        let mut builder = ReportBuilder::new(&config);
        builder.log("ok line");
        builder.error("bad line");
        let report = builder.finish(1, false);

        assert_eq!(*logs.lock().unwrap(), report.log);
        assert_eq!(*errors.lock().unwrap(), report.error);
    }

    #[test]
    fn test_issue_routing() {
        let mut builder = ReportBuilder::new(&Config::default().with_verbose(true));
        builder.issue(&Issue::OptionalNotInstalled { name: "opt".into() });
        assert!(!builder.failed());

        builder.issue(&Issue::ExtraneousPackage { name: "x".into() });
        assert!(builder.failed());
        assert!(builder.prune_needed());

        let report = builder.finish(1, false);
        assert_eq!(report.log, vec!["opt: not installed!"]);
        assert_eq!(
            report.error,
            vec!["Package x installed, though it shouldn't be"]
        );
    }

    #[test]
    fn test_json_shape() {
        let report = Report {
            status: 1,
            deps_were_ok: false,
            log: vec![],
            error: vec!["c: not installed!".into()],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": 1,
                "depsWereOk": false,
                "log": [],
                "error": ["c: not installed!"]
            })
        );
    }
}
