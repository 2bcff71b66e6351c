use std::path::{Path, PathBuf};

use serde::Serialize;

/// Suffix appended after the version tag of every output file name
pub const SPLIT_SHEET_SUFFIX: &str = "_Split_Sheet";

/// Extension of the persisted document package
pub const DOCUMENT_EXTENSION: &str = "docx";

/// Base name used when no song title was given
pub const UNTITLED_BASE_NAME: &str = "Untitled";

/// Where a split sheet is (or will be) written: `{directory}/{base}_V{version}_Split_Sheet.docx`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputDescriptor {
    pub base_name: String,
    /// Version number, starting at 1
    pub version: u32,
    pub directory: PathBuf,
}

impl OutputDescriptor {
    pub fn new(directory: impl Into<PathBuf>, base_name: impl Into<String>, version: u32) -> Self {
        Self {
            base_name: base_name.into(),
            version: version.max(1),
            directory: directory.into(),
        }
    }

    pub fn file_name(&self) -> String {
        format!(
            "{}_V{}{SPLIT_SHEET_SUFFIX}.{DOCUMENT_EXTENSION}",
            self.base_name, self.version
        )
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(self.file_name())
    }

    /// The same base name and directory, one version up
    #[must_use]
    pub fn next_version(&self) -> Self {
        Self {
            base_name: self.base_name.clone(),
            version: self.version + 1,
            directory: self.directory.clone(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_format() {
        let descriptor = OutputDescriptor::new("/tmp/out", "Song", 1);
        assert_eq!(descriptor.file_name(), "Song_V1_Split_Sheet.docx");
        assert_eq!(
            descriptor.path(),
            PathBuf::from("/tmp/out/Song_V1_Split_Sheet.docx")
        );
    }

    #[test]
    fn test_version_never_below_one() {
        let descriptor = OutputDescriptor::new("out", "Song", 0);
        assert_eq!(descriptor.version, 1);
        assert_eq!(descriptor.next_version().version, 2);
    }
}
