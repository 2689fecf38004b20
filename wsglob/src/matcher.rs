/// This module evaluates combined workspace globs against file paths.
///
/// The converter produces expressions like `{/a,/x/b}/{**/src/**/*.js,./test}`,
/// but the `glob` crate has no brace alternation. A [`CombinedGlob`] therefore
/// expands the braces up front and compiles each alternative into its own
/// [`Pattern`]:
///
/// ```rust
/// use std::path::Path;
/// use wsglob::CombinedGlob;
///
/// let glob = CombinedGlob::new("{/a,/x/b}/{**/src/**/*.js,./test}").unwrap();
/// assert!(glob.is_match(Path::new("/a/pkg/src/index.js")));
/// assert!(glob.is_match(Path::new("/x/b/test/fixture.txt")));
/// assert!(!glob.is_match(Path::new("/a/lib/index.js")));
/// ```
///
/// A path also matches when one of its ancestors does. That is what lets a bare
/// folder such as `/a`, the include used when the user typed nothing, select
/// every file below it.
use ::glob::{MatchOptions, Pattern};
use std::path::Path;
use tracing::debug;

use crate::errors::{GlobError, GlobResult};
use crate::glob::{expand_braces, path};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Characters the `glob` crate treats specially and that need a character
/// class to be matched literally.
const GLOB_SPECIAL: &[char] = &['*', '?', '[', ']'];

/// A compiled combined glob
#[derive(Debug, Clone, Default)]
pub struct CombinedGlob {
    source: String,
    patterns: Vec<Pattern>,
}

impl CombinedGlob {
    /// Compiles a combined glob. An empty or blank pattern matches nothing.
    pub fn new(pattern: &str) -> GlobResult<Self> {
        let mut patterns: Vec<Pattern> = Vec::new();

        if !pattern.trim().is_empty() {
            for alternative in expand_braces(pattern)? {
                let compiled = compile_alternative(&alternative)?;
                if !patterns.iter().any(|p| p.as_str() == compiled.as_str()) {
                    patterns.push(compiled);
                }
            }
        }

        debug!(
            "Compiled {} into {} glob alternatives",
            pattern,
            patterns.len()
        );
        Ok(Self {
            source: pattern.to_string(),
            patterns,
        })
    }

    /// The combined glob this matcher was built from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled alternatives, in expansion order
    pub fn alternatives(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Pattern::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Checks whether the path, or any of its ancestors, matches
    pub fn is_match(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        path.ancestors().any(|candidate| {
            let candidate = candidate.to_string_lossy().replace('\\', "/");
            !candidate.is_empty()
                && self
                    .patterns
                    .iter()
                    .any(|p| p.matches_with(&candidate, MATCH_OPTIONS))
        })
    }
}

fn compile_alternative(alternative: &str) -> GlobResult<Pattern> {
    let mut normalized = path::normalize(alternative);
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    let literal = unescape(&normalized);
    Pattern::new(&literal).map_err(|e| {
        GlobError::invalid_pattern(format!("{}: {}", alternative, e.msg))
    })
}

/// Rewrites backslash escapes into the bracket form the `glob` crate accepts
fn unescape(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped) if GLOB_SPECIAL.contains(&escaped) => {
                out.push('[');
                out.push(escaped);
                out.push(']');
            }
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }
    out
}
