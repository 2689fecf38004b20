pub mod config;
pub mod errors;
pub mod finder;
pub mod glob;
pub mod matcher;
pub mod scope;
pub mod workspace;

pub use config::WsglobConfig;
pub use errors::{GlobError, GlobResult};
pub use finder::{find_files, FindOutput, FinderOptions, FolderFiles};
pub use crate::glob::{convert_glob_pattern, join_patterns, split_glob_pattern};
pub use matcher::CombinedGlob;
pub use scope::{resolve_scope, ScopeResolution, SearchParams, SearchScope};
pub use workspace::WorkspaceFolders;
