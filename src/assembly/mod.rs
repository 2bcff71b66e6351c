//! Split sheet document assembly.
//!
//! - [`styles`]: Copies paragraph styles from a template into a new document
//! - [`DocumentAssembler`]: Title, date line, body text and placeholder substitution
//! - [`table`]: Contributor table and signature blocks
//! - [`output`]: Versioned, collision-free output naming and saving
//!
//! ## Output naming
//!
//! Documents are saved as `{base}_V{n}_Split_Sheet.docx`, where `base` is the
//! sanitized song title (or `Untitled`) and `n` is the smallest version not
//! yet present in the output directory.
//!
//! [`DocumentAssembler`]: assembler::DocumentAssembler

use std::path::PathBuf;

use thiserror::Error;

use crate::docx::DocxError;

pub mod assembler;
pub mod output;
pub mod styles;
pub mod table;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Failed to load document {path}: {source}")]
    DocumentLoadFailure {
        path: PathBuf,
        #[source]
        source: DocxError,
    },

    #[error("Failed to write {path}: {source}")]
    IoFailure {
        path: PathBuf,
        #[source]
        source: DocxError,
    },
}

impl AssemblyError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::DocumentLoadFailure { path, .. } | Self::IoFailure { path, .. } => path,
        }
    }
}
