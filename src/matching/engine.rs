use serde::Serialize;
use tracing::debug;

use crate::core::contributor::ContributorRecord;
use crate::matching::similarity;
use crate::roster::store::RosterTable;
use crate::utils::validation::DEFAULT_MATCH_THRESHOLD;

/// A roster row offered for a search query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchCandidate {
    /// The matched roster row
    pub record: ContributorRecord,

    /// Similarity of the row's writer name to the query, 0-100
    pub score: u8,

    /// Position of the row in the roster
    pub roster_index: usize,
}

/// Configuration for the matching engine
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Minimum score (inclusive) for a row to be offered
    pub threshold: u8,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

/// Resolves typed names against the contributor roster
pub struct MatchingEngine<'a> {
    roster: &'a RosterTable,
    config: MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create a new matching engine with the default threshold
    pub fn new(roster: &'a RosterTable) -> Self {
        Self {
            roster,
            config: MatchingConfig::default(),
        }
    }

    /// Create a new matching engine with custom configuration
    pub fn with_config(roster: &'a RosterTable, config: MatchingConfig) -> Self {
        Self { roster, config }
    }

    pub fn threshold(&self) -> u8 {
        self.config.threshold
    }

    pub fn roster(&self) -> &'a RosterTable {
        self.roster
    }

    /// Find roster rows whose writer name scores at or above the threshold.
    ///
    /// Results keep roster order rather than being ranked by score: the
    /// session selects candidates by position. Duplicate roster names each
    /// surface as their own candidate. An empty roster, or a query with no
    /// letters or digits, yields an empty result at any threshold.
    pub fn find_matches(&self, query: &str) -> Vec<MatchCandidate> {
        // No letters or digits: every row would score 0 and pass a 0 threshold
        if similarity::normalize(query).is_empty() {
            return Vec::new();
        }

        let matches: Vec<MatchCandidate> = self
            .roster
            .iter()
            .enumerate()
            .filter_map(|(roster_index, record)| {
                let score = similarity::score(&record.writer_name, query);
                (score >= self.config.threshold).then(|| MatchCandidate {
                    record: record.clone(),
                    score,
                    roster_index,
                })
            })
            .collect();

        debug!(
            "Query '{}' matched {} of {} roster rows (threshold {})",
            query,
            matches.len(),
            self.roster.len(),
            self.config.threshold
        );

        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_roster() -> RosterTable {
        RosterTable::from_records(vec![
            ContributorRecord::new("Jane Doe")
                .with_writer_ipi("00012345678")
                .with_publisher("Doe Songs", "00087654321")
                .with_pro("ASCAP"),
            ContributorRecord::new("Marcus Whitfield").with_pro("BMI"),
            ContributorRecord::new("Jane Dough").with_pro("PRS"),
            ContributorRecord::new("Jane Doe").with_writer_ipi("99999999999"),
        ])
    }

    #[test]
    fn test_find_matches_preserves_roster_order() {
        let roster = make_test_roster();
        let engine = MatchingEngine::new(&roster);

        let matches = engine.find_matches("jane doe");
        let indices: Vec<usize> = matches.iter().map(|m| m.roster_index).collect();
        assert_eq!(indices, vec![0, 2, 3]);

        // Positional order, not score order: the weaker "Jane Dough" stays in the middle
        assert!(matches[1].score < matches[0].score);
    }

    #[test]
    fn test_duplicate_roster_names_both_surface() {
        let roster = make_test_roster();
        let engine = MatchingEngine::new(&roster);

        let exact: Vec<MatchCandidate> = engine
            .find_matches("Jane Doe")
            .into_iter()
            .filter(|m| m.score == similarity::MAX_SCORE)
            .collect();
        assert_eq!(exact.len(), 2);
        assert_eq!(exact[0].record.writer_ipi, "00012345678");
        assert_eq!(exact[1].record.writer_ipi, "99999999999");
    }

    #[test]
    fn test_every_qualifying_row_is_returned() {
        let roster = make_test_roster();
        let engine = MatchingEngine::new(&roster);
        let query = "jane";

        let expected: Vec<usize> = roster
            .iter()
            .enumerate()
            .filter(|(_, r)| similarity::score(&r.writer_name, query) >= engine.threshold())
            .map(|(i, _)| i)
            .collect();
        let actual: Vec<usize> = engine
            .find_matches(query)
            .iter()
            .map(|m| m.roster_index)
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_empty_roster_and_query() {
        let empty = RosterTable::new();
        assert!(MatchingEngine::new(&empty).find_matches("jane").is_empty());

        let roster = make_test_roster();
        assert!(MatchingEngine::new(&roster).find_matches("").is_empty());
    }

    #[test]
    fn test_blank_query_at_zero_threshold() {
        let roster = make_test_roster();
        let engine = MatchingEngine::with_config(&roster, MatchingConfig { threshold: 0 });
        assert!(engine.find_matches("").is_empty());
        assert!(engine.find_matches("  -- ").is_empty());
        assert_eq!(engine.find_matches("j").len(), roster.len());
    }

    #[test]
    fn test_no_rows_clear_threshold() {
        let roster = make_test_roster();
        let engine = MatchingEngine::new(&roster);
        assert!(engine.find_matches("Zebulon Quartermaine").is_empty());
    }

    #[test]
    fn test_custom_threshold() {
        let roster = make_test_roster();
        let strict = MatchingEngine::with_config(&roster, MatchingConfig { threshold: 100 });
        assert_eq!(strict.find_matches("jane doe").len(), 2);

        let lenient = MatchingEngine::with_config(&roster, MatchingConfig { threshold: 0 });
        assert_eq!(lenient.find_matches("anything").len(), roster.len());
    }

    #[test]
    fn test_single_row_case_insensitive_query() {
        let roster = RosterTable::from_records(vec![ContributorRecord::new("Jane Doe")]);
        let matches = MatchingEngine::new(&roster).find_matches("jane doe");
        assert_eq!(matches.len(), 1);
        assert!(matches[0].score >= DEFAULT_MATCH_THRESHOLD);
    }
}
