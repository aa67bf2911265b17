//! Include/exclude path filtering: directory prefixes and glob patterns.

use std::path::Path;

use glob::{MatchOptions, Pattern};

/// One parsed filter rule.
enum Rule {
    /// Pattern ending in `/`: matches the named path and its whole subtree.
    Subtree(String),
    /// Glob with `/`-only segment semantics (`*` and `?` never cross `/`).
    Glob(Pattern),
}

/// A set of include or exclude rules matched against root-relative paths.
pub struct PathFilter {
    rules: Vec<Rule>,
}

fn glob_options() -> MatchOptions {
    MatchOptions {
        require_literal_separator: true,
        ..MatchOptions::new()
    }
}

impl PathFilter {
    /// Parse a pattern list. Empty and syntactically invalid patterns are
    /// dropped; the CLI validates user input before the scanner sees it.
    pub fn new(patterns: &[String]) -> Self {
        let mut rules = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let normalized = normalize_pattern(pattern.trim());
            if normalized.is_empty() {
                continue;
            }
            if let Some(base) = normalized.strip_suffix('/') {
                if !base.is_empty() {
                    rules.push(Rule::Subtree(base.to_string()));
                }
                continue;
            }
            if let Ok(glob) = Pattern::new(&normalized) {
                rules.push(Rule::Glob(glob));
            }
        }
        PathFilter { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// True when the root-relative path matches any rule. There is no
    /// substring fallback: `ExternalLib/` does not match `MyExternalLib/x`.
    pub fn matches(&self, relative_path: &Path) -> bool {
        if self.rules.is_empty() {
            return false;
        }
        let candidate = normalize_pattern(&relative_path.to_string_lossy());
        self.rules.iter().any(|rule| match rule {
            Rule::Subtree(base) => {
                candidate == *base
                    || candidate
                        .strip_prefix(base.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            Rule::Glob(glob) => glob.matches_with(&candidate, glob_options()),
        })
    }
}

/// Forward slashes only, no leading `./` or `/`.
pub(crate) fn normalize_pattern(path: &str) -> String {
    let slashed = path.replace('\\', "/");
    let trimmed = slashed.strip_prefix("./").unwrap_or(&slashed);
    trimmed.strip_prefix('/').unwrap_or(trimmed).to_string()
}

/// One-off check of `relative_path` against `patterns`.
pub fn matches_any(relative_path: &Path, patterns: &[String]) -> bool {
    PathFilter::new(patterns).matches(relative_path)
}
