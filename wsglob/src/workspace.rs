use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{GlobError, GlobResult};
use crate::glob::path;

const WORKSPACE_FILE_EXTENSION: &str = "code-workspace";
const MAX_UPWARD_STEPS: usize = 20;

/// The ordered set of absolute workspace folders a search is scoped to.
///
/// Folders are stored as `/`-separated strings because they end up inside
/// glob patterns, not in filesystem calls. Order matters: it decides how the
/// combined glob is laid out and which folder wins when two share a basename.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WorkspaceFolders {
    folders: Vec<String>,
}

/// On-disk layout of a `.code-workspace` file; other keys are ignored
#[derive(Debug, Deserialize)]
struct WorkspaceFileContents {
    #[serde(default)]
    folders: Vec<FolderEntry>,
}

#[derive(Debug, Deserialize)]
struct FolderEntry {
    path: String,
}

impl WorkspaceFolders {
    /// Builds the folder set, rejecting anything that is not absolute
    pub fn new<I, S>(folders: I) -> GlobResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let folders = folders
            .into_iter()
            .map(|f| normalize_folder(f.as_ref()))
            .collect::<GlobResult<Vec<_>>>()?;
        Ok(Self { folders })
    }

    /// Builds the folder set from filesystem paths
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> GlobResult<Self> {
        Self::new(
            paths
                .iter()
                .map(|p| p.as_ref().to_string_lossy().into_owned()),
        )
    }

    /// Loads the folders listed in a `.code-workspace` file.
    ///
    /// Relative folder paths are resolved against the directory containing
    /// the workspace file. Comments and trailing commas are accepted, as the
    /// editor writes them.
    pub fn from_workspace_file(file: &Path) -> GlobResult<Self> {
        let raw = fs::read_to_string(file)
            .map_err(|e| GlobError::workspace_file(file, e.to_string()))?;
        let contents: WorkspaceFileContents = serde_json::from_str(&strip_jsonc(&raw))
            .map_err(|e| GlobError::workspace_file(file, e.to_string()))?;

        let base = match file.parent() {
            Some(parent) if parent.is_absolute() => parent.to_path_buf(),
            Some(parent) => std::env::current_dir()?.join(parent),
            None => std::env::current_dir()?,
        };

        let folders = contents
            .folders
            .iter()
            .map(|entry| {
                let folder = entry.path.replace('\\', "/");
                if path::is_absolute(&folder) || has_drive_prefix(&folder) {
                    folder
                } else {
                    base.join(&folder).to_string_lossy().into_owned()
                }
            })
            .collect::<Vec<_>>();

        debug!(
            "Loaded {} workspace folders from {}",
            folders.len(),
            file.display()
        );
        Self::new(folders)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.folders
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.folders.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Finds the folder with the given basename; the last one listed wins
    pub fn by_name(&self, name: &str) -> Option<&str> {
        self.folders
            .iter()
            .rev()
            .map(String::as_str)
            .find(|f| path::basename(f) == name)
    }

    /// The innermost folder containing `file`, if any
    pub fn folder_for(&self, file: &Path) -> Option<&str> {
        let file = file.to_string_lossy().replace('\\', "/");
        self.iter()
            .filter(|folder| contains(folder, &file))
            .max_by_key(|folder| folder.len())
    }
}

impl<'a> IntoIterator for &'a WorkspaceFolders {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.folders.iter()
    }
}

/// Looks upward from `starting_dir` for a `.code-workspace` file.
///
/// When one directory holds several, the alphabetically first is used.
pub fn detect_workspace_file(starting_dir: &Path) -> GlobResult<Option<PathBuf>> {
    let mut current = starting_dir.to_path_buf();

    for _ in 0..MAX_UPWARD_STEPS {
        if current.is_dir() {
            let mut candidates: Vec<PathBuf> = fs::read_dir(&current)?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|p| {
                    p.is_file()
                        && p.extension()
                            .is_some_and(|ext| ext == WORKSPACE_FILE_EXTENSION)
                })
                .collect();
            candidates.sort();
            if let Some(found) = candidates.into_iter().next() {
                debug!("Detected workspace file {}", found.display());
                return Ok(Some(found));
            }
        }
        if !current.pop() {
            break;
        }
    }

    Ok(None)
}

fn normalize_folder(folder: &str) -> GlobResult<String> {
    let mut folder = folder.replace('\\', "/");
    if has_drive_prefix(&folder) {
        folder.insert(0, '/');
    }
    if !path::is_absolute(&folder) {
        return Err(GlobError::relative_folder(folder));
    }
    let mut normalized = path::normalize(&folder);
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    Ok(normalized)
}

/// `C:/...` style paths, which the editor reports as `/c:/...`
fn has_drive_prefix(folder: &str) -> bool {
    let bytes = folder.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}

fn contains(folder: &str, file: &str) -> bool {
    folder == "/"
        || file == folder
        || file
            .strip_prefix(folder)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Removes comments and trailing commas so JSON-with-comments parses as JSON
fn strip_jsonc(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            '}' | ']' => {
                let trimmed = out.trim_end().len();
                if out[..trimmed].ends_with(',') {
                    out.truncate(trimmed - 1);
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
