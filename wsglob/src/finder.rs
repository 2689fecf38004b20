/// This module walks workspace folders and selects files with a resolved scope.
///
/// Walking is sequential per folder (it is I/O bound and `ignore` already
/// handles .gitignore parsing), while evaluating the include/exclude globs
/// against every walked path runs on a rayon pool:
///
/// ```rust,ignore
/// let selected: Vec<PathBuf> = pool.install(|| {
///     walked.into_par_iter()
///         .filter(|path| include.is_match(path) && !exclude.is_match(path))
///         .collect()
/// });
/// ```
///
/// Results are grouped per workspace folder, in folder order, with files
/// sorted inside each group so output is stable across runs. When folders
/// nest, each file is reported once, under the innermost folder holding it.
use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::default_thread_count;
use crate::errors::GlobResult;
use crate::matcher::CombinedGlob;
use crate::scope::SearchScope;
use crate::workspace::WorkspaceFolders;

/// How workspace folders are walked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinderOptions {
    /// Include hidden files and directories
    pub hidden: bool,
    /// Honor .gitignore, .ignore and global git excludes
    pub git_ignore: bool,
    /// Threads used to evaluate globs
    pub threads: NonZeroUsize,
}

impl Default for FinderOptions {
    fn default() -> Self {
        Self {
            hidden: false,
            git_ignore: true,
            threads: default_thread_count(),
        }
    }
}

/// Files selected under one workspace folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderFiles {
    pub folder: String,
    pub files: Vec<PathBuf>,
}

/// Aggregate result of a find across all folders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FindOutput {
    pub folders: Vec<FolderFiles>,
    pub total_files: usize,
    pub files_scanned: usize,
}

impl FindOutput {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_folder(&mut self, folder: FolderFiles) {
        self.total_files += folder.files.len();
        self.folders.push(folder);
    }

    /// All selected files, in folder order
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.folders
            .iter()
            .flat_map(|f| f.files.iter().map(PathBuf::as_path))
    }
}

/// Walks every workspace folder and returns the files the scope selects
pub fn find_files(
    folders: &WorkspaceFolders,
    scope: &SearchScope,
    options: &FinderOptions,
) -> GlobResult<FindOutput> {
    info!(
        "Finding files in {} folders, include={} exclude={:?}",
        folders.len(),
        scope.include,
        scope.exclude
    );

    let include = CombinedGlob::new(&scope.include)?;
    let exclude = match &scope.exclude {
        Some(pattern) => CombinedGlob::new(pattern)?,
        None => CombinedGlob::default(),
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads.get())
        .build()?;

    let mut output = FindOutput::new();
    for folder in folders.iter() {
        let root = Path::new(folder);
        if !root.is_dir() {
            warn!("Workspace folder {} does not exist, skipping", folder);
            output.add_folder(FolderFiles {
                folder: folder.to_string(),
                files: Vec::new(),
            });
            continue;
        }

        // A file under a nested workspace folder belongs to the innermost one
        let mut walked = walk_folder(root, options);
        walked.retain(|path| folders.folder_for(path) == Some(folder));
        output.files_scanned += walked.len();
        debug!("Walked {} files in {}", walked.len(), folder);

        let mut files: Vec<PathBuf> = pool.install(|| {
            walked
                .into_par_iter()
                .filter(|path| include.is_match(path) && !exclude.is_match(path))
                .collect()
        });
        files.sort();

        output.add_folder(FolderFiles {
            folder: folder.to_string(),
            files,
        });
    }

    info!(
        "Find complete. Selected {} of {} files",
        output.total_files, output.files_scanned
    );
    Ok(output)
}

fn walk_folder(root: &Path, options: &FinderOptions) -> Vec<PathBuf> {
    let mut walker = WalkBuilder::new(root);
    walker
        .hidden(!options.hidden)
        .ignore(options.git_ignore)
        .git_ignore(options.git_ignore)
        .git_global(options.git_ignore)
        .git_exclude(options.git_ignore)
        .require_git(false);

    walker
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Failed to read entry under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GlobError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_find_with_default_scope() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("app");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/main.rs"), "fn main() {}\n").unwrap();
        fs::write(root.join("README.md"), "# app\n").unwrap();

        let folders = WorkspaceFolders::from_paths(&[&root]).unwrap();
        let scope = SearchScope::for_folders(None, None, &folders);
        let options = FinderOptions {
            threads: NonZeroUsize::new(1).unwrap(),
            ..FinderOptions::default()
        };

        let output = find_files(&folders, &scope, &options).unwrap();
        assert_eq!(output.folders.len(), 1);
        assert_eq!(output.total_files, 2);
        assert_eq!(output.files_scanned, 2);
    }

    #[test]
    fn test_missing_folder_yields_empty_group() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let folders = WorkspaceFolders::from_paths(&[&missing]).unwrap();
        let scope = SearchScope::for_folders(None, None, &folders);

        let output = find_files(&folders, &scope, &FinderOptions::default()).unwrap();
        assert_eq!(output.folders.len(), 1);
        assert!(output.folders[0].files.is_empty());
        assert_eq!(output.total_files, 0);
    }

    #[test]
    fn test_invalid_include_is_an_error() {
        let folders = WorkspaceFolders::new(["/tmp"]).unwrap();
        let scope = SearchScope {
            include: "/tmp/{a,b".to_string(),
            exclude: None,
        };
        assert!(matches!(
            find_files(&folders, &scope, &FinderOptions::default()),
            Err(GlobError::InvalidPattern(_))
        ));
    }
}
