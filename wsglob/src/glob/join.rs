/// Combines patterns into a single glob expression.
///
/// A single pattern is returned unchanged; two or more become a brace
/// alternation in input order. An empty list yields an empty string, which
/// callers read as "no patterns specified".
///
/// ```rust
/// use wsglob::join_patterns;
///
/// assert_eq!(join_patterns(&["src/**"]), "src/**");
/// assert_eq!(join_patterns(&["/a", "/x/b"]), "{/a,/x/b}");
/// ```
pub fn join_patterns<S: AsRef<str>>(patterns: &[S]) -> String {
    match patterns {
        [] => String::new(),
        [single] => single.as_ref().to_string(),
        _ => {
            let body = patterns
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(",");
            format!("{{{}}}", body)
        }
    }
}
