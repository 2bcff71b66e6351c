//! Core data types for split sheet assembly.
//!
//! - [`ContributorRecord`]: One roster row (writer, publisher, IPIs, PRO)
//! - [`AcceptedContributors`]: Contributors accepted during a session, unique by writer name
//! - [`Document`]: In-memory rich-text document (paragraphs, tables, styles)
//! - [`StyleRegistry`], [`Style`]: Named style definitions
//! - [`OutputDescriptor`]: Versioned output file location
//!
//! [`ContributorRecord`]: contributor::ContributorRecord
//! [`AcceptedContributors`]: contributor::AcceptedContributors
//! [`Document`]: document::Document
//! [`StyleRegistry`]: style::StyleRegistry
//! [`Style`]: style::Style
//! [`OutputDescriptor`]: types::OutputDescriptor

pub mod contributor;
pub mod document;
pub mod style;
pub mod types;
