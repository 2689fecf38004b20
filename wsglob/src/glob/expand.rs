use tracing::trace;

use crate::errors::{GlobError, GlobResult};

/// Upper bound on the number of patterns a single brace expansion may produce
pub const MAX_EXPANSIONS: usize = 4096;

/// Upper bound on the number of `{` groups a pattern may contain
pub const MAX_BRACE_GROUPS: usize = 1024;

/// Expands brace alternation into the plain patterns it stands for.
///
/// Groups may nest and may contain empty alternatives. Backslash escapes and
/// `[...]` character classes are copied through untouched, so `\{` and `[{]`
/// never open a group.
///
/// ```rust
/// use wsglob::glob::expand_braces;
///
/// let expanded = expand_braces("/a/{foo,{bar,baz}}").unwrap();
/// assert_eq!(expanded, vec!["/a/foo", "/a/bar", "/a/baz"]);
/// ```
pub fn expand_braces(pattern: &str) -> GlobResult<Vec<String>> {
    let groups = count_groups(pattern);
    if groups > MAX_BRACE_GROUPS {
        return Err(GlobError::invalid_pattern(format!(
            "pattern has {} brace groups, more than the limit of {}",
            groups, MAX_BRACE_GROUPS
        )));
    }

    // Worklist of partially expanded patterns. The offset marks where the
    // next group can start: everything before it is already brace free.
    let mut out = Vec::new();
    let mut pending = vec![(pattern.to_string(), 0usize)];

    while let Some((current, from)) = pending.pop() {
        let Some((open, close)) = find_group(&current, from)? else {
            if out.len() >= MAX_EXPANSIONS {
                return Err(GlobError::invalid_pattern(format!(
                    "brace expansion of {} exceeds {} patterns",
                    pattern, MAX_EXPANSIONS
                )));
            }
            out.push(current);
            continue;
        };

        let prefix = &current[..open];
        let suffix = &current[close + 1..];
        // Pushed in reverse so alternatives come out in source order
        for alternative in split_alternatives(&current[open + 1..close]).iter().rev() {
            pending.push((format!("{}{}{}", prefix, alternative, suffix), open));
        }
    }

    trace!("Expanded {} into {} patterns", pattern, out.len());
    Ok(out)
}

/// Counts `{` openers outside escapes and character classes
fn count_groups(pattern: &str) -> usize {
    let bytes = pattern.as_bytes();
    let mut count = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'[' => {
                if let Some(end) = class_end(bytes, i) {
                    i = end;
                }
            }
            b'{' => count += 1,
            _ => {}
        }
        i += 1;
    }
    count
}

/// Byte offsets of the first top-level `{` at or after `from` and its
/// matching `}`
fn find_group(pattern: &str, from: usize) -> GlobResult<Option<(usize, usize)>> {
    let bytes = pattern.as_bytes();
    let mut depth = 0usize;
    let mut open = 0usize;
    let mut i = from;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'[' => {
                if let Some(end) = class_end(bytes, i) {
                    i = end;
                }
            }
            b'{' => {
                if depth == 0 {
                    open = i;
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Ok(Some((open, i)));
                }
            }
            _ => {}
        }
        i += 1;
    }

    if depth > 0 {
        return Err(GlobError::invalid_pattern(format!(
            "unclosed '{{' in {}",
            pattern
        )));
    }
    Ok(None)
}

/// Splits the body of a brace group on its own commas, keeping empty entries
fn split_alternatives(body: &str) -> Vec<&str> {
    let bytes = body.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'[' => {
                if let Some(end) = class_end(bytes, i) {
                    i = end;
                }
            }
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&body[start..]);
    parts
}

/// Index of the `]` closing the character class opened at `start`.
///
/// A `]` right after the opening bracket (or after `!`/`^`) is a literal
/// member of the class.
fn class_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if matches!(bytes.get(j), Some(b'!') | Some(b'^')) {
        j += 1;
    }
    if bytes.get(j) == Some(&b']') {
        j += 1;
    }
    bytes[j.min(bytes.len())..]
        .iter()
        .position(|&b| b == b']')
        .map(|offset| j + offset)
}
