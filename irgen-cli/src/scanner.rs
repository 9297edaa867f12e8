//! Source file scanner for a package directory.
//!
//! A package is the set of `.rs` files directly inside one directory.
//! Subdirectories are not descended into; `.gitignore` patterns and an
//! optional glob filter narrow the set further.

use crate::error::{CliError, CliResult, ScanError};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// A discovered source file with its content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path to the file.
    pub path: PathBuf,

    /// Path relative to the package directory.
    pub relative_path: PathBuf,

    /// File content.
    pub content: String,
}

/// Scanner for the Rust source files of one package.
#[derive(Debug)]
pub struct SourceScanner {
    root: PathBuf,

    respect_gitignore: bool,

    /// Only files whose relative path matches are kept.
    filter: Option<glob::Pattern>,
}

impl SourceScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            respect_gitignore: true,
            filter: None,
        }
    }

    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Set a glob filter pattern for files, e.g. `*_service.rs`.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self, ScanError> {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| ScanError::invalid_pattern(pattern, e.to_string()))?;
        self.filter = Some(glob_pattern);
        Ok(self)
    }

    /// Read every matching file, sorted by path.
    pub fn scan(&self) -> CliResult<Vec<SourceFile>> {
        if !self.root.is_dir() {
            return Err(ScanError::not_found(self.root.clone()).into());
        }

        let walker = WalkBuilder::new(&self.root)
            .max_depth(Some(1))
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .hidden(false)
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(ScanError::Walk)?;
            let path = entry.path();

            if !path.is_file() || path.extension().map_or(true, |ext| ext != "rs") {
                continue;
            }

            let relative_path = self.relative_path(path);
            if let Some(ref pattern) = self.filter {
                if !pattern.matches_path(&relative_path) {
                    tracing::trace!(path = %relative_path.display(), "filtered out");
                    continue;
                }
            }

            let content = std::fs::read_to_string(path).map_err(|e| ScanError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

            files.push(SourceFile {
                path: path.to_path_buf(),
                relative_path,
                content,
            });
        }

        if files.is_empty() {
            return Err(ScanError::no_rust_files(self.root.clone()).into());
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        tracing::debug!(root = %self.root.display(), files = files.len(), "scanned package");
        Ok(files)
    }

    /// Scan without failing on empty results.
    pub fn scan_allow_empty(&self) -> CliResult<Vec<SourceFile>> {
        match self.scan() {
            Ok(files) => Ok(files),
            Err(CliError::Scan(ScanError::NoRustFiles { .. })) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        fs::write(dir.path().join("greeter.rs"), "pub trait GreeterService {}").unwrap();
        fs::write(dir.path().join("objects.rs"), "pub struct Greeting;").unwrap();
        fs::write(dir.path().join("README.md"), "# Services").unwrap();

        // nested directories belong to other packages
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/other.rs"), "pub struct Other;").unwrap();

        dir
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let dir = create_test_dir();
        let files = SourceScanner::new(dir.path()).scan().unwrap();

        let paths: Vec<_> = files
            .iter()
            .map(|f| f.relative_path.to_string_lossy().to_string())
            .collect();
        assert_eq!(paths, ["greeter.rs", "objects.rs"]);
    }

    #[test]
    fn test_scan_with_filter() {
        let dir = create_test_dir();
        let files = SourceScanner::new(dir.path())
            .with_filter("greet*.rs")
            .unwrap()
            .scan()
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].content, "pub trait GreeterService {}");
    }

    #[test]
    fn test_scan_respects_gitignore() {
        let dir = create_test_dir();
        fs::write(dir.path().join(".gitignore"), "objects.rs\n").unwrap();

        let files = SourceScanner::new(dir.path()).scan().unwrap();
        assert_eq!(files.len(), 1);

        let files = SourceScanner::new(dir.path())
            .with_gitignore(false)
            .scan()
            .unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_scan_missing_directory() {
        let result = SourceScanner::new("/definitely/not/here").scan();
        assert!(matches!(
            result,
            Err(CliError::Scan(ScanError::DirectoryNotFound { .. }))
        ));
    }

    #[test]
    fn test_scan_allow_empty() {
        let dir = TempDir::new().unwrap();
        let files = SourceScanner::new(dir.path()).scan_allow_empty().unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_invalid_filter() {
        let result = SourceScanner::new(".").with_filter("[");
        assert!(matches!(result, Err(ScanError::InvalidPattern { .. })));
    }
}
