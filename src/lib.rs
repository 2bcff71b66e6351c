//! # split-sheet
//!
//! A library for assembling music "split sheets": documents that record who
//! owns which share of a song's composition rights.
//!
//! A split sheet is built from three inputs: a template document whose
//! paragraph styles are reused, a body text containing `SONG TITLE` and
//! `ARTIST NAME` placeholders, and a roster of known writers with their
//! publishers, IPI numbers and performance-rights organizations.
//!
//! `split-sheet` fills in the placeholders, lets the user pick contributors
//! from the roster by fuzzy name search, and saves the result under a
//! versioned name that never overwrites an earlier sheet.
//!
//! ## Features
//!
//! - **Fuzzy writer search**: Typos, word order and partial names still find the roster row
//! - **Style carry-over**: Template paragraph styles are copied into every new sheet
//! - **Contributor table**: Writers, publishers, PROs and grouped signature blocks
//! - **Versioned output**: `Song_V1_Split_Sheet.docx`, `Song_V2_Split_Sheet.docx`, ...
//!
//! ## Example
//!
//! ```rust,no_run
//! use split_sheet::assembly::{assembler, output, table};
//! use split_sheet::session::Session;
//! use split_sheet::{MatchingEngine, RosterTable};
//! use std::path::Path;
//!
//! let request = assembler::AssemblyRequest {
//!     add_date: true,
//!     company_name: Some("Acme Music".to_string()),
//!     song_name: Some("Midnight Drive".to_string()),
//!     artist_name: None,
//! };
//! let mut doc = assembler::DocumentAssembler::new()
//!     .assemble_from_paths(Path::new("template.docx"), Path::new("body.docx"), &request)
//!     .unwrap()
//!     .document;
//!
//! let roster = RosterTable::load_from_file(Path::new("roster.csv")).unwrap();
//! let mut session = Session::new(MatchingEngine::new(&roster));
//! session.handle("jane doe");
//! session.handle("1");
//! session.handle("0");
//!
//! table::append_contributor_table(&mut doc, session.accepted());
//! let path = output::save(&doc, Path::new("out"), request.song_name.as_deref()).unwrap();
//! println!("Saved {}", path.display());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Contributor records, the document model and styles
//! - [`matching`]: Name similarity and roster search
//! - [`roster`]: Roster loading
//! - [`docx`]: `.docx` reading and writing
//! - [`assembly`]: Document assembly, contributor table and versioned saving
//! - [`session`]: The interactive contributor-selection state machine
//! - [`config`]: Run configuration
//! - [`cli`]: Command-line interface implementation

pub mod assembly;
pub mod cli;
pub mod config;
pub mod core;
pub mod docx;
pub mod matching;
pub mod roster;
pub mod session;
pub mod utils;

// Re-export commonly used types for convenience
pub use assembly::AssemblyError;
pub use core::contributor::{AcceptedContributors, ContributorRecord};
pub use core::document::{Block, Document, Paragraph, Table};
pub use core::types::*;
pub use matching::engine::{MatchCandidate, MatchingEngine};
pub use roster::store::RosterTable;
