use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::glob::{convert_glob_pattern, join_patterns};
use crate::workspace::WorkspaceFolders;

/// The user-facing search inputs, as typed into a search panel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub find: Option<String>,
    #[serde(default)]
    pub replace: Option<String>,
    #[serde(default)]
    pub include: Option<String>,
    #[serde(default)]
    pub exclude: Option<String>,
}

impl SearchParams {
    /// Whether switching from `self` to `other` requires a new run
    pub fn differs_from(&self, other: &SearchParams) -> bool {
        self != other
    }
}

/// Combined include/exclude globs handed to the file finder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchScope {
    pub include: String,
    pub exclude: Option<String>,
}

/// Outcome of checking whether a search can run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScopeResolution {
    /// There is nothing to search in
    NoWorkspaceFolders,
    /// There is nothing to search for
    EmptyFind,
    Ready(SearchScope),
}

impl ScopeResolution {
    pub fn scope(&self) -> Option<&SearchScope> {
        match self {
            ScopeResolution::Ready(scope) => Some(scope),
            _ => None,
        }
    }
}

impl SearchScope {
    /// Builds the scope for the given include/exclude strings.
    ///
    /// Without an include pattern every workspace folder is searched; without
    /// an exclude pattern nothing is excluded.
    pub fn for_folders(
        include: Option<&str>,
        exclude: Option<&str>,
        folders: &WorkspaceFolders,
    ) -> Self {
        let include = include
            .map(|raw| convert_glob_pattern(raw, folders.as_slice()))
            .filter(|converted| !converted.is_empty())
            .unwrap_or_else(|| join_patterns(folders.as_slice()));
        let exclude = exclude
            .map(|raw| convert_glob_pattern(raw, folders.as_slice()))
            .filter(|converted| !converted.is_empty());

        Self { include, exclude }
    }
}

/// Decides whether a search can run and, if so, over which files
pub fn resolve_scope(params: &SearchParams, folders: &WorkspaceFolders) -> ScopeResolution {
    if folders.is_empty() {
        debug!("no workspace folders found");
        return ScopeResolution::NoWorkspaceFolders;
    }
    if params.find.as_deref().map_or(true, |f| f.trim().is_empty()) {
        debug!("find expression is empty");
        return ScopeResolution::EmptyFind;
    }

    let scope = SearchScope::for_folders(
        params.include.as_deref(),
        params.exclude.as_deref(),
        folders,
    );
    debug!(
        "Resolved scope: include={} exclude={:?}",
        scope.include, scope.exclude
    );
    ScopeResolution::Ready(scope)
}
