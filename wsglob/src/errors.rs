/// This module defines the error type for wsglob.
///
/// # Which operations can fail
///
/// The pattern rewriter itself (`split_glob_pattern`, `join_patterns`,
/// `convert_glob_pattern`) is total: every input string produces an output and
/// malformed glob syntax is tolerated. Errors only appear once a pattern has to
/// be compiled for matching, or once the filesystem gets involved:
///
/// ```rust,ignore
/// match CombinedGlob::new(&scope.include) {
///     Ok(glob) => // Match paths,
///     Err(GlobError::InvalidPattern(msg)) => // Bad character class, unclosed brace...
///     Err(e) => // Handle other errors
/// }
/// ```
///
/// Like the rest of the crate, errors are plain values returned through
/// `Result` and propagated with `?`.
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for glob and workspace operations
pub type GlobResult<T> = Result<T, GlobError>;

/// Errors that can occur while resolving or evaluating workspace globs
#[derive(Error, Debug)]
pub enum GlobError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Workspace folder must be an absolute path: {0}")]
    RelativeFolder(String),
    #[error("Invalid workspace file {path}: {message}")]
    WorkspaceFile { path: PathBuf, message: String },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl GlobError {
    pub fn invalid_pattern(msg: impl Into<String>) -> Self {
        Self::InvalidPattern(msg.into())
    }

    pub fn relative_folder(folder: impl Into<String>) -> Self {
        Self::RelativeFolder(folder.into())
    }

    pub fn workspace_file(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::WorkspaceFile {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

impl From<config::ConfigError> for GlobError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = GlobError::invalid_pattern("unclosed brace");
        assert!(matches!(err, GlobError::InvalidPattern(_)));

        let err = GlobError::relative_folder("src");
        assert!(matches!(err, GlobError::RelativeFolder(_)));

        let err = GlobError::workspace_file("demo.code-workspace", "missing folders");
        assert!(matches!(err, GlobError::WorkspaceFile { .. }));

        let err = GlobError::config_error("bad yaml");
        assert!(matches!(err, GlobError::ConfigError(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = GlobError::invalid_pattern("unclosed '{' in a/{b");
        assert_eq!(err.to_string(), "Invalid pattern: unclosed '{' in a/{b");

        let err = GlobError::relative_folder("src/app");
        assert_eq!(
            err.to_string(),
            "Workspace folder must be an absolute path: src/app"
        );

        let err = GlobError::workspace_file("demo.code-workspace", "expected an object");
        assert_eq!(
            err.to_string(),
            "Invalid workspace file demo.code-workspace: expected an object"
        );

        let err = GlobError::config_error("Missing required field".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required field"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: GlobError = io.into();
        assert!(matches!(err, GlobError::IoError(_)));
        assert_eq!(err.to_string(), "IO error: gone");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: GlobError = config::ConfigError::NotFound("thread_count".to_string()).into();
        assert!(matches!(err, GlobError::ConfigError(_)));
        assert!(err.to_string().starts_with("Configuration error: "));
    }
}
