//! Reading and writing `.docx` word-processing packages.
//!
//! A `.docx` file is a zip archive of XML parts. Only the parts needed for
//! split sheets are handled:
//!
//! | Part | Content |
//! |------|---------|
//! | `word/document.xml` | Body paragraphs and tables |
//! | `word/styles.xml` | Style definitions |
//! | `[Content_Types].xml`, `_rels/.rels`, `word/_rels/document.xml.rels` | Package plumbing (written only) |
//!
//! Text formatting below the paragraph level (runs, direct formatting,
//! images, headers and footers) is not preserved: a paragraph is its plain
//! text plus a style name.
//!
//! ## Example
//!
//! ```rust,no_run
//! use split_sheet::docx::{reader, writer};
//! use std::path::Path;
//!
//! let doc = reader::read_document(Path::new("template.docx")).unwrap();
//! for p in doc.paragraphs() {
//!     println!("[{}] {}", p.style.as_deref().unwrap_or("-"), p.text);
//! }
//! writer::save_to_path(&doc, Path::new("copy.docx")).unwrap();
//! ```

use thiserror::Error;

pub mod reader;
pub mod writer;

/// Main document part
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Style definitions part
pub const STYLES_PART: &str = "word/styles.xml";

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const PACKAGE_RELS_PART: &str = "_rels/.rels";
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// WordprocessingML main namespace
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

#[derive(Error, Debug)]
pub enum DocxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid document package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Not a .docx package (missing zip signature)")]
    NotAPackage,

    #[error("Document package is missing part '{0}'")]
    MissingPart(&'static str),
}
