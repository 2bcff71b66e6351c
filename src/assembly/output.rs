use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::assembly::AssemblyError;
use crate::core::document::Document;
use crate::core::types::{OutputDescriptor, UNTITLED_BASE_NAME};
use crate::docx::{writer, DocxError};
use crate::utils::validation::sanitize_base_name;

/// File name base for a song: the sanitized title, or `Untitled`
pub fn base_name_for(song: Option<&str>) -> String {
    song.map_or_else(|| UNTITLED_BASE_NAME.to_string(), sanitize_base_name)
}

/// First free versioned path for `song` in `directory`, probing from V1
pub fn next_output(directory: &Path, song: Option<&str>) -> OutputDescriptor {
    probe_from(OutputDescriptor::new(directory, base_name_for(song), 1))
}

fn probe_from(mut descriptor: OutputDescriptor) -> OutputDescriptor {
    while descriptor.path().exists() {
        descriptor = descriptor.next_version();
    }
    descriptor
}

/// Save `doc` under the first free versioned name and return its path.
///
/// The file is written to a temporary file in `directory` and then renamed
/// onto the versioned path without replacing anything already there. When
/// another writer claims the slot first, the next free version is used.
///
/// # Errors
///
/// Returns `AssemblyError::IoFailure` if `directory` does not exist, is not
/// a directory, or the document cannot be written. The directory is never
/// created.
pub fn save(doc: &Document, directory: &Path, song: Option<&str>) -> Result<PathBuf, AssemblyError> {
    let io_failure = |path: &Path, source: DocxError| AssemblyError::IoFailure {
        path: path.to_path_buf(),
        source,
    };

    if !directory.is_dir() {
        let source = io::Error::new(
            io::ErrorKind::NotFound,
            "output directory does not exist or is not a directory",
        );
        return Err(io_failure(directory, source.into()));
    }

    let bytes = writer::to_bytes(doc).map_err(|e| io_failure(directory, e))?;
    let mut staged = stage(directory, &bytes).map_err(|e| io_failure(directory, e.into()))?;
    let mut descriptor = next_output(directory, song);

    loop {
        let path = descriptor.path();
        match staged.persist_noclobber(&path) {
            Ok(_) => {
                info!("Saved {}", path.display());
                return Ok(path);
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                debug!("{} was claimed concurrently, trying next version", path.display());
                staged = e.file;
                descriptor = probe_from(descriptor.next_version());
            }
            Err(e) => return Err(io_failure(&path, e.error.into())),
        }
    }
}

/// Atomically replace the file at `path` with `doc`
///
/// # Errors
///
/// Returns `AssemblyError::IoFailure` if the document cannot be written.
pub fn overwrite(doc: &Document, path: &Path) -> Result<(), AssemblyError> {
    let io_failure = |source: DocxError| AssemblyError::IoFailure {
        path: path.to_path_buf(),
        source,
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let bytes = writer::to_bytes(doc).map_err(io_failure)?;
    let staged = stage(directory, &bytes).map_err(|e| io_failure(e.into()))?;
    staged
        .persist(path)
        .map_err(|e| io_failure(e.error.into()))?;

    debug!("Rewrote {}", path.display());
    Ok(())
}

fn stage(directory: &Path, bytes: &[u8]) -> io::Result<NamedTempFile> {
    let mut staged = NamedTempFile::new_in(directory)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    Ok(staged)
}
