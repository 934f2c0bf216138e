//! Version specifier classification.
//!
//! A manifest entry's specifier may be a semver range, a Git URL, a
//! shorthand, a custom package name, the `latest` tag, or an alias. Only some
//! of these can be compared against an installed version.

use crate::version::is_valid_version;
use regex_lite::Regex;
use std::sync::OnceLock;

/// Why a specifier was accepted without comparing versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Git URL whose tag is not a semver version.
    NonSemverGitTag,
    /// Contains a path separator: URL, tarball path or `user/repo` shorthand.
    Url,
    /// Contains `#`: custom package name or Git ref.
    CustomName,
    /// The `latest` dist-tag.
    Latest,
}

/// How a specifier is checked against the installed package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecKind {
    /// Compare the installed version against this range.
    Range(String),
    /// The installed package must be named `name` and satisfy `range`.
    Alias { name: String, range: String },
    /// Presence is enough.
    Skip(SkipReason),
}

fn git_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.git.*#v?(.+)$").expect("static pattern is valid"))
}

fn git_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#v?(.+)$").expect("static pattern is valid"))
}

/// Split `<prefix><name>@<range>` found anywhere in `spec`.
///
/// The last `@` that leaves both sides non-empty separates name from range.
fn split_alias<'a>(spec: &'a str, prefix: &str) -> Option<(&'a str, &'a str)> {
    spec.match_indices(prefix).find_map(|(start, _)| {
        let rest = &spec[start + prefix.len()..];
        rest.rmatch_indices('@')
            .map(|(at, _)| (&rest[..at], &rest[at + 1..]))
            .find(|(name, range)| !name.is_empty() && !range.is_empty())
    })
}

/// Classify a raw specifier.
///
/// Rules apply in a fixed order and the first one that fires wins:
/// 1. with `check_git_urls`, a Git URL ending in `#<tag>` is reduced to its
///    tag; a non-semver tag is accepted as-is
/// 2. anything containing `/` is accepted as a URL or shorthand
/// 3. anything containing `#` is accepted as a custom name
/// 4. `latest` is accepted without a registry lookup
/// 5. `<alias_prefix><name>@<range>` becomes an alias check
#[must_use]
pub fn classify_specifier(raw: &str, check_git_urls: bool, alias_prefix: Option<&str>) -> SpecKind {
    let mut spec = raw.to_string();

    if check_git_urls && git_url_regex().is_match(&spec) {
        if let Some(tag) = git_tag_regex().captures(&spec).and_then(|c| c.get(1)) {
            spec = tag.as_str().to_string();
        }
        if !is_valid_version(&spec) {
            return SpecKind::Skip(SkipReason::NonSemverGitTag);
        }
    }

    if spec.contains('/') {
        return SpecKind::Skip(SkipReason::Url);
    }

    if spec.contains('#') {
        return SpecKind::Skip(SkipReason::CustomName);
    }

    if spec == "latest" {
        return SpecKind::Skip(SkipReason::Latest);
    }

    if let Some(prefix) = alias_prefix {
        if let Some((name, range)) = split_alias(&spec, prefix) {
            return SpecKind::Alias {
                name: name.to_string(),
                range: range.to_string(),
            };
        }
    }

    SpecKind::Range(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NPM: Option<&str> = Some("npm:");

    #[test]
    fn test_plain_ranges() {
        for spec in ["1.2.3", "^1.0.0", "~1.2.0", ">=1.0.0", "<2.0", "*", ""] {
            assert_eq!(
                classify_specifier(spec, false, NPM),
                SpecKind::Range(spec.to_string())
            );
        }
    }

    #[test]
    fn test_latest() {
        assert_eq!(
            classify_specifier("latest", true, NPM),
            SpecKind::Skip(SkipReason::Latest)
        );
    }

    #[test]
    fn test_urls_and_shorthands() {
        for spec in [
            "https://example.com/pkg.tgz",
            "user/repo",
            "file:../local",
            "git+https://github.com/a/b.git",
        ] {
            assert_eq!(
                classify_specifier(spec, false, NPM),
                SpecKind::Skip(SkipReason::Url),
                "{spec}"
            );
        }
    }

    #[test]
    fn test_git_url_ignored_without_flag() {
        assert_eq!(
            classify_specifier("git://github.com/a/b.git#v0.5.9", false, NPM),
            SpecKind::Skip(SkipReason::Url)
        );
    }

    #[test]
    fn test_git_url_semver_tag() {
        assert_eq!(
            classify_specifier("git://github.com/a/b.git#v0.5.9", true, NPM),
            SpecKind::Range("0.5.9".to_string())
        );
        assert_eq!(
            classify_specifier("https://github.com/a/b.git#1.2.3", true, NPM),
            SpecKind::Range("1.2.3".to_string())
        );
    }

    #[test]
    fn test_git_url_non_semver_tag() {
        assert_eq!(
            classify_specifier("git://github.com/a/b.git#a1b2c3d", true, NPM),
            SpecKind::Skip(SkipReason::NonSemverGitTag)
        );
        assert_eq!(
            classify_specifier("git://github.com/a/b.git#master", true, NPM),
            SpecKind::Skip(SkipReason::NonSemverGitTag)
        );
    }

    #[test]
    fn test_custom_name() {
        assert_eq!(
            classify_specifier("jquery#1.11.1", false, None),
            SpecKind::Skip(SkipReason::CustomName)
        );
    }

    #[test]
    fn test_alias() {
        assert_eq!(
            classify_specifier("npm:real-a@^2.0.0", false, NPM),
            SpecKind::Alias {
                name: "real-a".to_string(),
                range: "^2.0.0".to_string(),
            }
        );
    }

    #[test]
    fn test_alias_without_prefix_support() {
        assert_eq!(
            classify_specifier("npm:real-a@^2.0.0", false, None),
            SpecKind::Range("npm:real-a@^2.0.0".to_string())
        );
    }

    #[test]
    fn test_scoped_alias_is_skipped_as_url() {
        // The path-separator rule runs before alias extraction.
        assert_eq!(
            classify_specifier("npm:@scope/real@^2.0.0", false, NPM),
            SpecKind::Skip(SkipReason::Url)
        );
    }

    #[test]
    fn test_alias_splits_on_last_usable_at() {
        assert_eq!(
            classify_specifier("npm:a@b@^1.0.0", false, NPM),
            SpecKind::Alias {
                name: "a@b".to_string(),
                range: "^1.0.0".to_string(),
            }
        );
        assert_eq!(
            classify_specifier("npm:a@1.0.0@", false, NPM),
            SpecKind::Alias {
                name: "a".to_string(),
                range: "1.0.0@".to_string(),
            }
        );
        assert_eq!(
            classify_specifier("npm:@1.0.0", false, NPM),
            SpecKind::Range("npm:@1.0.0".to_string())
        );
    }
}
