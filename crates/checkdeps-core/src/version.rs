//! Semver range matching with npm range syntax.
//!
//! The `semver` crate follows Cargo's conventions, which differ from npm's in
//! a few places that matter here: a bare `1.2.3` is an exact match in npm but
//! a caret requirement in Cargo, and npm allows `||`, hyphen ranges, x-ranges
//! and whitespace-separated comparators. Ranges are translated into
//! `VersionReq`s before matching.

use semver::{Version, VersionReq};

/// Parse an installed version, tolerating a leading `v` or `=`.
#[must_use]
pub fn parse_version(version: &str) -> Option<Version> {
    let version = version.trim();
    let version = version.strip_prefix('=').unwrap_or(version);
    let version = version.strip_prefix('v').unwrap_or(version);
    Version::parse(version).ok()
}

/// Check whether a string is a full semver version.
#[must_use]
pub fn is_valid_version(version: &str) -> bool {
    parse_version(version).is_some()
}

/// Check whether `version` satisfies the npm-style `range`.
///
/// An unparseable version or range never satisfies.
#[must_use]
pub fn version_satisfies(version: &str, range: &str) -> bool {
    let Some(version) = parse_version(version) else {
        return false;
    };

    range
        .split("||")
        .any(|alt| parse_range(alt).is_some_and(|req| req.matches(&version)))
}

/// Parse one `||` alternative into a requirement.
///
/// Handles:
/// - Empty ranges and `*`: any version
/// - Hyphen ranges: `1.0.0 - 2.0.0`
/// - X-ranges and partials: `1.x`, `1.2.*`, `1.2`
/// - Space-separated comparators: `>= 2.1.2 < 3.0.0`
#[must_use]
pub fn parse_range(range: &str) -> Option<VersionReq> {
    let tokens = tokenize(range);

    let comparators: Vec<String> = match tokens.as_slice() {
        [] => return Some(VersionReq::STAR),
        [start, dash, end] if dash == "-" => vec![
            translate_comparator(&format!(">={start}"))?,
            translate_comparator(&format!("<={end}"))?,
        ],
        _ => tokens
            .iter()
            .map(|t| translate_comparator(t))
            .collect::<Option<_>>()?,
    };

    let comparators: Vec<String> = comparators.into_iter().filter(|c| c != "*").collect();
    if comparators.is_empty() {
        return Some(VersionReq::STAR);
    }

    VersionReq::parse(&comparators.join(", ")).ok()
}

/// Split on whitespace, gluing a bare operator onto the version after it.
fn tokenize(range: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut pending_op = String::new();

    for word in range.split_whitespace() {
        if word.chars().all(|c| matches!(c, '<' | '>' | '=' | '~' | '^')) {
            pending_op.push_str(word);
            continue;
        }
        tokens.push(format!("{pending_op}{word}"));
        pending_op.clear();
    }

    if !pending_op.is_empty() {
        tokens.push(pending_op);
    }
    tokens
}

const OPERATORS: [&str; 8] = [">=", "<=", "~>", ">", "<", "=", "~", "^"];

fn split_operator(token: &str) -> (&str, &str) {
    for op in OPERATORS {
        if let Some(rest) = token.strip_prefix(op) {
            return (op, rest);
        }
    }
    ("", token)
}

/// Translate a single npm comparator into `semver` syntax.
///
/// Wildcard components truncate the version, which `semver` reads as a
/// partial (`1.x` becomes `1`). A bare version gets an explicit `=`.
fn translate_comparator(token: &str) -> Option<String> {
    let (op, rest) = split_operator(token);
    let rest = rest.strip_prefix('v').unwrap_or(rest);
    let rest = rest.split('+').next().unwrap_or(rest);
    let (core, pre) = match rest.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (rest, None),
    };

    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut kept = Vec::with_capacity(3);
    for part in &parts {
        if matches!(*part, "x" | "X" | "*") {
            break;
        }
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        kept.push(*part);
    }

    if kept.is_empty() {
        // `<*` and `>*` exclude every version; other operators allow any.
        return Some(match op {
            "<" | ">" => "<0.0.0-0".to_string(),
            _ => "*".to_string(),
        });
    }

    let mut version = kept.join(".");
    if kept.len() == 3 {
        if let Some(pre) = pre {
            version.push('-');
            version.push_str(pre);
        }
    }

    let op = match op {
        "" => "=",
        "~>" => "~",
        other => other,
    };
    Some(format!("{op}{version}"))
}
