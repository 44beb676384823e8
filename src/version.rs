//! Version string normalization.
//!
//! Turns noisy `--version` banners into a canonical token using an ordered
//! cascade of patterns; the first match wins. Tools with known multi-field
//! banners get an override keyed by binary name.

use once_cell::sync::Lazy;
use regex::Regex;

/// Returned when no version can be extracted at all.
pub const UNKNOWN: &str = "Unknown";

/// Fallback output is cut to this many characters.
const MAX_FALLBACK_CHARS: usize = 30;

static SEMVER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[vV]?(\d+\.\d+\.\d+[\w\-+]*)").expect("semver regex must be valid")
});
static MAJOR_MINOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[vV]?(\d+\.\d+)").expect("major.minor regex must be valid"));
static DATE_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4}\.\d+\.\d+)").expect("date regex must be valid"));
static GIT_HASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([a-f0-9]{7,40})\b").expect("hash regex must be valid"));
static BARE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d+)\b").expect("number regex must be valid"));

/// Extract a canonical version token from raw command output.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(first_line) = trimmed.lines().next().map(str::trim) else {
        return UNKNOWN.to_string();
    };
    if first_line.is_empty() {
        return UNKNOWN.to_string();
    }

    for pattern in [&*SEMVER, &*MAJOR_MINOR, &*DATE_VERSION] {
        if let Some(found) = capture(pattern, first_line) {
            return clean(found);
        }
    }

    if let Some(hash) = capture(&GIT_HASH, first_line) {
        return hash.chars().take(7).collect();
    }

    if let Some(number) = capture(&BARE_NUMBER, first_line) {
        return number.to_string();
    }

    if let Some(token) = first_line.split_whitespace().find(|t| is_version_like(t)) {
        return clean(token);
    }

    if first_line.chars().count() > MAX_FALLBACK_CHARS {
        let cut: String = first_line.chars().take(MAX_FALLBACK_CHARS).collect();
        return format!("{cut}…");
    }
    first_line.to_string()
}

/// Normalize with tool-specific handling for banners the generic cascade misreads.
#[must_use]
pub fn normalize_for(binary: &str, raw: &str) -> String {
    let output = raw.trim();
    let fields: Vec<&str> = output.split_whitespace().collect();

    let special = match binary {
        // aws-cli/2.22.35 Python/3.11.9 Darwin/24.0.0
        "aws" => fields
            .first()
            .and_then(|f| f.split_once('/'))
            .map(|(_, v)| v.to_string()),
        // go version go1.23.4 darwin/arm64
        "go" => fields
            .get(2)
            .and_then(|f| f.strip_prefix("go"))
            .map(str::to_string),
        // Python 3.13.1
        "python3" | "python" => fields
            .iter()
            .find(|f| SEMVER.is_match(f))
            .map(|f| clean(f)),
        // v20.11.0 / 10.2.4
        "node" | "npm" => output
            .lines()
            .next()
            .map(str::trim)
            .filter(|l| is_version_like(l))
            .map(clean),
        // Docker version 24.0.7, build afdd53b / git version 2.43.0
        "docker" | "git" => after_word(&fields, "version").map(|v| clean(v.trim_end_matches(','))),
        // Homebrew 4.2.0
        "brew" => fields.get(1).map(|f| clean(f)),
        _ => None,
    };

    match special {
        Some(v) if !v.is_empty() => v,
        _ => normalize(output),
    }
}

fn capture<'a>(pattern: &Regex, input: &'a str) -> Option<&'a str> {
    pattern
        .captures(input)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn after_word<'a>(fields: &[&'a str], word: &str) -> Option<&'a str> {
    fields
        .iter()
        .position(|f| *f == word)
        .and_then(|i| fields.get(i + 1))
        .copied()
}

/// Strip a leading `v` and trailing separators.
fn clean(version: &str) -> String {
    version
        .trim_start_matches(['v', 'V'])
        .trim_end_matches(['.', '-'])
        .to_string()
}

fn is_version_like(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('v' | 'V') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semver_with_suffix() {
        assert_eq!(normalize("v1.2.3-beta"), "1.2.3-beta");
        assert_eq!(normalize("tool 1.2.3+build5 (abc)"), "1.2.3+build5");
    }

    #[test]
    fn empty_is_unknown() {
        assert_eq!(normalize(""), UNKNOWN);
        assert_eq!(normalize("   \n  "), UNKNOWN);
    }

    #[test]
    fn git_hash_is_shortened() {
        assert_eq!(normalize("abcdef1234567 extra text"), "abcdef1");
    }

    #[test]
    fn major_minor() {
        assert_eq!(normalize("jq-1.7"), "1.7");
        assert_eq!(normalize("v16.0"), "16.0");
    }

    #[test]
    fn date_version_matches_before_hash() {
        assert_eq!(normalize("2024.1.15"), "2024.1.15");
    }

    #[test]
    fn bare_integer() {
        assert_eq!(normalize("Build 42"), "42");
    }

    #[test]
    fn version_like_token() {
        assert_eq!(normalize("release v2rc"), "2rc");
    }

    #[test]
    fn only_first_line_counts() {
        assert_eq!(normalize("tmux 3.4\nsome 9.9.9 line"), "3.4");
    }

    #[test]
    fn long_garbage_is_truncated() {
        let out = normalize("this output has no version information whatsoever");
        assert!(out.ends_with('…'));
        assert_eq!(out.chars().count(), MAX_FALLBACK_CHARS + 1);
    }

    #[test]
    fn short_garbage_is_returned() {
        assert_eq!(normalize("unavailable"), "unavailable");
    }

    #[test]
    fn tool_overrides() {
        assert_eq!(
            normalize_for("aws", "aws-cli/2.22.35 Python/3.11.9 Darwin/24.0.0"),
            "2.22.35"
        );
        assert_eq!(normalize_for("go", "go version go1.23.4 darwin/arm64"), "1.23.4");
        assert_eq!(normalize_for("python3", "Python 3.13.1"), "3.13.1");
        assert_eq!(normalize_for("node", "v20.11.0"), "20.11.0");
        assert_eq!(
            normalize_for("docker", "Docker version 24.0.7, build afdd53b"),
            "24.0.7"
        );
        assert_eq!(normalize_for("git", "git version 2.43.0"), "2.43.0");
        assert_eq!(normalize_for("brew", "Homebrew 4.2.0\nHomebrew/core"), "4.2.0");
    }

    #[test]
    fn override_falls_back_to_generic() {
        assert_eq!(normalize_for("go", "1.22.0"), "1.22.0");
        assert_eq!(normalize_for("rg", "ripgrep 14.1.0"), "14.1.0");
        assert_eq!(normalize_for("aws", ""), UNKNOWN);
    }
}
