use std::collections::HashMap;
use tracing::{debug, trace};

use super::join::join_patterns;
use super::path;
use super::split::split_glob_pattern;

/// Glob marker for "any number of intervening directories"
pub const RECURSIVE_MARKER: &str = "**";

/// Rewrites a comma separated pattern list relative to several base directories
/// into one glob that a single-root matcher can evaluate.
///
/// Each pattern is classified in this order:
///
/// 1. absolute patterns are kept verbatim;
/// 2. patterns whose first segment is the basename of a base directory are
///    re-anchored under that directory;
/// 3. everything else applies to every base directory, prefixed with `**/`
///    unless it starts with `.`.
///
/// ```rust
/// use wsglob::convert_glob_pattern;
///
/// let combined = convert_glob_pattern(
///     "src/**/*.js,a/foo,/bc,b/qux, ./test, a/{bar,baz}",
///     &["/a", "/x/b"],
/// );
/// assert_eq!(
///     combined,
///     "{/bc,/a/{foo,{bar,baz}},/x/b/qux,{/a,/x/b}/{**/src/**/*.js,./test}}"
/// );
/// ```
///
/// When two base directories share a basename, the one listed last wins the
/// lookup. The function never fails; an empty pattern string yields an empty
/// result.
pub fn convert_glob_pattern<S: AsRef<str>>(patterns: &str, base_directories: &[S]) -> String {
    let by_name: HashMap<&str, &str> = base_directories
        .iter()
        .map(|dir| {
            let dir = dir.as_ref();
            (path::basename(dir), dir)
        })
        .collect();

    let mut absolute_patterns: Vec<String> = Vec::new();
    let mut folder_patterns: Vec<(&str, Vec<String>)> = Vec::new();
    let mut general_patterns: Vec<String> = Vec::new();

    for pattern in split_glob_pattern(patterns) {
        if path::is_absolute(pattern) {
            trace!("absolute pattern: {}", pattern);
            absolute_patterns.push(pattern.to_string());
            continue;
        }

        let basedir = pattern.split('/').next().unwrap_or(pattern);
        match by_name.get(basedir) {
            Some(&folder) => {
                trace!("pattern {} is relative to {}", pattern, folder);
                let relative = path::relative(basedir, pattern);
                match folder_patterns.iter_mut().find(|(f, _)| *f == folder) {
                    Some((_, bucket)) => bucket.push(relative),
                    None => folder_patterns.push((folder, vec![relative])),
                }
            }
            None if pattern.starts_with('.') => general_patterns.push(pattern.to_string()),
            None => general_patterns.push(path::join(&[RECURSIVE_MARKER, pattern])),
        }
    }

    debug!(
        "Classified patterns: {} absolute, {} folder buckets, {} general",
        absolute_patterns.len(),
        folder_patterns.len(),
        general_patterns.len()
    );

    let mut result = absolute_patterns;
    for (folder, bucket) in &folder_patterns {
        result.push(path::join(&[*folder, join_patterns(bucket).as_str()]));
    }
    if !general_patterns.is_empty() {
        result.push(path::join(&[
            join_patterns(base_directories),
            join_patterns(&general_patterns),
        ]));
    }

    join_patterns(&result)
}
