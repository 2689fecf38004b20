/// Workspace-relative glob rewriting.
///
/// A search panel lets users type include/exclude patterns such as
/// `src/**/*.js, app/test, /tmp/scratch` while several workspace folders are
/// open. File-search backends usually take one pattern and one root, so the
/// patterns have to be rewritten into a single expression:
///
/// ```text
/// folders:  /a, /x/b
/// input:    src/**/*.js,a/foo,/bc,b/qux, ./test, a/{bar,baz}
/// output:   {/bc,/a/{foo,{bar,baz}},/x/b/qux,{/a,/x/b}/{**/src/**/*.js,./test}}
/// ```
///
/// The pieces:
///
/// 1. [`split_glob_pattern`] cuts the raw string on top-level commas.
/// 2. [`join_patterns`] folds patterns back into a brace alternation.
/// 3. [`convert_glob_pattern`] classifies each pattern (absolute,
///    folder-relative, general) and assembles the combined glob.
/// 4. [`expand_braces`] undoes the alternation again when the combined glob
///    has to be matched by an engine without brace support.
///
/// Splitting, joining and converting never fail. Brace expansion can, since
/// it has to reject unclosed groups before anything gets compiled.
pub mod convert;
pub mod expand;
pub mod join;
pub mod path;
pub mod split;

pub use convert::{convert_glob_pattern, RECURSIVE_MARKER};
pub use expand::{expand_braces, MAX_BRACE_GROUPS, MAX_EXPANSIONS};
pub use join::join_patterns;
pub use split::{split_glob_pattern, SplitGlobPattern};
