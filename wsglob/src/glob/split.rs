/// Splits a comma separated list of glob patterns.
///
/// Commas nested inside `{...}`, `[...]` or `(...)` belong to the pattern and
/// do not separate it from its neighbours:
///
/// ```rust
/// use wsglob::split_glob_pattern;
///
/// let tokens: Vec<_> = split_glob_pattern("src/**/*.{js,ts}, test").collect();
/// assert_eq!(tokens, vec!["src/**/*.{js,ts}", "test"]);
/// ```
///
/// The returned iterator borrows the input and yields trimmed, non-empty
/// slices of it. Calling the function again restarts the scan.
pub fn split_glob_pattern(pattern: &str) -> SplitGlobPattern<'_> {
    SplitGlobPattern {
        pattern,
        start: 0,
        pos: 0,
        done: false,
    }
}

/// Lazy iterator returned by [`split_glob_pattern`]
#[derive(Debug, Clone)]
pub struct SplitGlobPattern<'a> {
    pattern: &'a str,
    start: usize,
    pos: usize,
    done: bool,
}

impl<'a> Iterator for SplitGlobPattern<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        // Every delimiter is ASCII, so byte offsets of separators are always
        // char boundaries.
        let bytes = self.pattern.as_bytes();
        let mut parens = 0usize;
        let mut brackets = 0usize;
        let mut braces = 0usize;

        while !self.done {
            if self.pos >= bytes.len() {
                self.done = true;
                let sub = self.pattern[self.start..].trim();
                return (!sub.is_empty()).then_some(sub);
            }

            let i = self.pos;
            self.pos += 1;
            match bytes[i] {
                b'\\' => self.pos += 1,
                b'(' => parens += 1,
                b'[' => brackets += 1,
                b'{' => braces += 1,
                b')' => parens = parens.saturating_sub(1),
                b']' => brackets = brackets.saturating_sub(1),
                b'}' => braces = braces.saturating_sub(1),
                b',' if parens == 0 && brackets == 0 && braces == 0 => {
                    let sub = self.pattern[self.start..i].trim();
                    self.start = i + 1;
                    if !sub.is_empty() {
                        return Some(sub);
                    }
                }
                _ => {}
            }
        }
        None
    }
}

impl std::iter::FusedIterator for SplitGlobPattern<'_> {}
