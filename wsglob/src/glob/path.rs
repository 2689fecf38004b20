//! Lexical POSIX path helpers.
//!
//! Glob patterns are not real paths, so nothing here touches the filesystem or
//! the platform separator. Braces, stars and brackets are ordinary segment
//! characters as far as these functions are concerned; only `/`, `.` and `..`
//! are interpreted.

const SEP: char = '/';

/// Returns true if the path starts at the root.
pub fn is_absolute(path: &str) -> bool {
    path.starts_with(SEP)
}

/// Last segment of a path, ignoring trailing separators.
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches(SEP);
    match trimmed.rfind(SEP) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Collapses `.`, `..` and repeated separators.
///
/// A trailing separator survives, `..` above the root of an absolute path is
/// dropped, and an empty relative result becomes `.`.
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let absolute = is_absolute(path);
    let trailing = path.ends_with(SEP);
    let segments = resolve_segments(path, absolute);

    let mut out = segments.join("/");
    if out.is_empty() && !absolute {
        out.push('.');
    }
    if !out.is_empty() && trailing {
        out.push(SEP);
    }
    if absolute {
        out.insert(0, SEP);
    }
    out
}

/// Joins path parts with `/` and normalizes the result.
///
/// Empty parts are skipped; joining nothing yields `.`.
pub fn join<S: AsRef<str>>(parts: &[S]) -> String {
    let joined = parts
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        return ".".to_string();
    }
    normalize(&joined)
}

/// Relative path from `from` to `to`, both taken relative to the same base.
///
/// Identical locations yield an empty string.
pub fn relative(from: &str, to: &str) -> String {
    let from_segments = resolve_segments(from, is_absolute(from));
    let to_segments = resolve_segments(to, is_absolute(to));

    let common = from_segments
        .iter()
        .zip(&to_segments)
        .take_while(|(a, b)| a == b)
        .count();

    let mut out: Vec<&str> = vec![".."; from_segments.len() - common];
    out.extend_from_slice(&to_segments[common..]);
    out.join("/")
}

fn resolve_segments(path: &str, absolute: bool) -> Vec<&str> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(SEP) {
        match segment {
            "" | "." => {}
            ".." => match segments.last().copied() {
                Some(last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }
    segments
}
