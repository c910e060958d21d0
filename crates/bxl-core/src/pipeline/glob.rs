//! Wildcard filename matching for the remove operation.

use regex::Regex;

use crate::error::ConfigError;

/// A compiled `*`-wildcard pattern matched against whole file names.
///
/// Every character other than `*` is literal. `*` matches any run of
/// characters, including none. Matching is case-sensitive and anchored at
/// both ends.
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    pattern: String,
    regex: Regex,
}

impl GlobMatcher {
    /// Compile a wildcard pattern.
    pub fn compile(pattern: &str) -> Result<Self, ConfigError> {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&format!("(?s)^{body}$")).map_err(|e| {
            ConfigError::ValidationError(format!("invalid glob pattern '{pattern}': {e}"))
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Check a single file name (not a path) against the pattern.
    pub fn is_match(&self, filename: &str) -> bool {
        self.regex.is_match(filename)
    }

    /// The pattern this matcher was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Compile `pattern` and test it against `filename` in one step.
pub fn matches_pattern(filename: &str, pattern: &str) -> bool {
    GlobMatcher::compile(pattern)
        .map(|m| m.is_match(filename))
        .unwrap_or(false)
}
