//! Contributor roster loading.
//!
//! The roster is the reference table of known writers, their publishers,
//! IPI numbers and performance-rights organizations. It is read once per run
//! from a delimited text file and never modified afterwards.
//!
//! ## Format
//!
//! | Column | Description |
//! |--------|-------------|
//! | Writer Name | Name the user searches for |
//! | Writer IPI | Writer's IPI number |
//! | Publisher Name | Administering publisher |
//! | Publisher IPI | Publisher's IPI number |
//! | Writer PRO | Performance-rights organization |
//!
//! Header spelling is forgiving (`WriterName`, `writer_name` and `Writer Name`
//! are all accepted) and extra columns are ignored.
//!
//! ## Example
//!
//! ```rust,no_run
//! use split_sheet::RosterTable;
//! use std::path::Path;
//!
//! let roster = RosterTable::load_from_file(Path::new("roster.csv")).unwrap();
//! for record in roster.iter() {
//!     println!("{} ({})", record.writer_name, record.writer_pro);
//! }
//! ```

pub mod store;
