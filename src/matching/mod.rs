//! Contributor name matching.
//!
//! - [`similarity`]: Pure string similarity on a 0-100 scale
//! - [`MatchingEngine`]: Finds roster rows whose writer name clears a threshold
//!
//! ## Scoring
//!
//! Names are case-folded and stripped of punctuation, then compared with a
//! weighted ratio built on Indel similarity:
//!
//! - **Ratio**: similarity of the whole strings
//! - **Token sort**: similarity after sorting words, so "Doe Jane" finds "Jane Doe"
//! - **Partial**: best substring window, so "jane" finds "Jane Doe"
//!
//! ## Example
//!
//! ```rust
//! use split_sheet::{ContributorRecord, MatchingEngine, RosterTable};
//!
//! let roster = RosterTable::from_records(vec![ContributorRecord::new("Jane Doe")]);
//! let engine = MatchingEngine::new(&roster);
//!
//! let matches = engine.find_matches("jane doe");
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].record.writer_name, "Jane Doe");
//! ```
//!
//! [`MatchingEngine`]: engine::MatchingEngine

pub mod engine;
pub mod similarity;
