//! Archive identifiers and their resolution under the archive root.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::archive::ArchiveError;

/// A client-supplied archive name that is safe to use as a single path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveId(String);

impl ArchiveId {
    /// Validate a raw (already percent-decoded) path segment.
    ///
    /// Only syntax is checked here; nothing touches the filesystem.
    pub fn parse(raw: &str) -> Result<Self, ArchiveError> {
        if raw.is_empty() {
            return Err(ArchiveError::Validation("identifier is empty"));
        }
        if raw == "." || raw == ".." {
            return Err(ArchiveError::Validation("identifier is a relative path segment"));
        }
        if raw.contains(['/', '\\']) {
            return Err(ArchiveError::Validation("identifier contains a path separator"));
        }
        if raw.contains('\0') {
            return Err(ArchiveError::Validation("identifier contains a NUL byte"));
        }
        // Archivers treat a leading dash as an option.
        if raw.starts_with('-') {
            return Err(ArchiveError::Validation("identifier starts with a dash"));
        }
        if Path::new(raw).is_absolute() || has_drive_prefix(raw) {
            return Err(ArchiveError::Validation("identifier is an absolute path"));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn has_drive_prefix(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl fmt::Display for ArchiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArchiveId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Directory whose immediate subdirectories are served as archives.
#[derive(Debug, Clone)]
pub struct ArchiveRoot {
    path: PathBuf,
}

impl ArchiveRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve `id` to an existing directory under the root.
    ///
    /// Symlinks that lead outside the root are reported as missing.
    pub async fn locate(&self, id: &ArchiveId) -> Result<PathBuf, ArchiveError> {
        let not_found = || ArchiveError::NotFound(id.to_string());
        let candidate = self.path.join(id.as_str());

        let metadata = tokio::fs::metadata(&candidate)
            .await
            .map_err(|_| not_found())?;
        if !metadata.is_dir() {
            return Err(not_found());
        }

        let root = tokio::fs::canonicalize(&self.path)
            .await
            .map_err(|_| not_found())?;
        let resolved = tokio::fs::canonicalize(&candidate)
            .await
            .map_err(|_| not_found())?;
        if !resolved.starts_with(&root) {
            tracing::warn!(
                identifier = %id,
                resolved = %resolved.display(),
                "Archive directory escapes root"
            );
            return Err(not_found());
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        for raw in ["photos123", "7ab9c1", "a.b", "with space", "..hidden"] {
            assert_eq!(ArchiveId::parse(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn rejects_unsafe_names() {
        for raw in [
            "", ".", "..", "../etc", "a/b", "a\\b", "/etc", "\\\\server", "C:", "c:stuff", "nul\0",
            "-r",
        ] {
            assert!(
                matches!(ArchiveId::parse(raw), Err(ArchiveError::Validation(_))),
                "{:?} should be rejected",
                raw
            );
        }
    }

    #[tokio::test]
    async fn locate_requires_directory() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("photos123")).unwrap();
        std::fs::write(root.path().join("file.txt"), b"x").unwrap();
        let archive_root = ArchiveRoot::new(root.path());

        let found = archive_root
            .locate(&ArchiveId::parse("photos123").unwrap())
            .await
            .unwrap();
        assert!(found.ends_with("photos123"));

        for missing in ["file.txt", "missing"] {
            let err = archive_root
                .locate(&ArchiveId::parse(missing).unwrap())
                .await
                .unwrap_err();
            assert!(matches!(err, ArchiveError::NotFound(_)));
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn locate_rejects_symlink_out_of_root() {
        let root = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), root.path().join("escape")).unwrap();

        let err = ArchiveRoot::new(root.path())
            .locate(&ArchiveId::parse("escape").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ArchiveError::NotFound(_)));
    }
}
