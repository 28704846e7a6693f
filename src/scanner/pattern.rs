//! Exclude/ignore pattern compilation
//!
//! Patterns are glob-like strings where `*` matches within one path segment
//! and `**` matches across segments. A pattern starting with `/` is matched
//! against the whole root-relative path; any other pattern is matched against
//! the final path segment only.

use crate::types::MirrorError;
use regex::Regex;

// Stands in for `*` while the rest of the pattern is escaped
const PLACEHOLDER: &str = "\x01HOLD\x01";

/// One compiled exclusion rule
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    anchored: bool,
    matcher: Regex,
}

impl Pattern {
    /// Compile a single glob-like pattern
    ///
    /// Everything except `*` is taken literally, so no input is rejected as
    /// malformed. An error is only possible if the regex engine refuses the
    /// generated expression (for example when it exceeds the size limit).
    pub fn compile(raw: &str) -> Result<Self, MirrorError> {
        let held = raw.replace('*', PLACEHOLDER).replace('\\', "/");

        let (anchored, body) = match held.strip_prefix('/') {
            Some(rest) => (false, rest),
            None => (true, held.as_str()),
        };

        let expr = regex::escape(body)
            .replace(&PLACEHOLDER.repeat(2), ".*?")
            .replace(PLACEHOLDER, "[^/]*?");

        let matcher = Regex::new(&format!("^{}$", expr))
            .map_err(|e| MirrorError::Config(format!("Invalid pattern '{}': {}", raw, e)))?;

        Ok(Self {
            source: raw.to_string(),
            anchored,
            matcher,
        })
    }

    /// Pattern text as given by the user
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True if the pattern applies to the final path segment only
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Test a root-relative, `/`-separated path
    pub fn matches(&self, path: &str) -> bool {
        if self.anchored {
            let name = path.rsplit('/').next().unwrap_or(path);
            self.matcher.is_match(name)
        } else {
            self.matcher.is_match(path)
        }
    }
}

/// Compile patterns, preserving their order
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>, MirrorError> {
    patterns.iter().map(|p| Pattern::compile(p)).collect()
}

/// Patterns applied to each side of a mirror
///
/// Exclude patterns keep entries out of the local listing, so matching remote
/// entries get deleted. Ignore patterns hide entries on both sides, so
/// matching remote entries are left alone.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    local: Vec<Pattern>,
    remote: Vec<Pattern>,
}

impl FilterSet {
    pub fn compile(exclude: &[String], ignore: &[String]) -> Result<Self, MirrorError> {
        let exclude = compile_patterns(exclude)?;
        let ignore = compile_patterns(ignore)?;

        let mut local = exclude;
        local.extend(ignore.iter().cloned());

        Ok(Self {
            local,
            remote: ignore,
        })
    }

    /// Exclude patterns followed by ignore patterns
    pub fn local(&self) -> &[Pattern] {
        &self.local
    }

    /// Ignore patterns only
    pub fn remote(&self) -> &[Pattern] {
        &self.remote
    }
}
