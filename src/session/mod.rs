//! Interactive contributor selection.
//!
//! The session is a small state machine fed one line of input at a time:
//!
//! | State | Input | Result |
//! |-------|-------|--------|
//! | Searching | `0` | Finished |
//! | Searching | a name | CandidatesShown, or a notice when nothing matches |
//! | CandidatesShown | `0` | Finished |
//! | CandidatesShown | `9` | Searching |
//! | CandidatesShown | `k` in `1..=n` | candidate `k` accepted, back to Searching |
//!
//! Anything else produces a [`SessionNotice`] and leaves the state alone.
//! Notices are recoverable; they are returned as values, never as errors.
//! The machine does no I/O itself; see [`prompt`] for a console driver.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::contributor::{AcceptedContributors, ContributorRecord};
use crate::matching::engine::{MatchCandidate, MatchingEngine};

pub mod prompt;

/// Input that finishes the session from any state
pub const FINISH_INPUT: &str = "0";

/// Input that abandons the shown candidates
pub const BACK_INPUT: &str = "9";

pub const SEARCH_PROMPT: &str = "Enter writer's name or press 0 to finish: ";
pub const SELECT_PROMPT: &str = "Enter the number next to the writer you want to add, press 9 to go back to writer search, or press 0 to exit: ";

/// Recoverable conditions reported back to the user
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SessionNotice {
    #[error("No matches found. Please try again.")]
    NoMatches,

    #[error("This writer has already been added, please choose another.")]
    DuplicateContributor(String),

    #[error("Invalid selection. Please try again.")]
    InvalidSelection { input: usize, available: usize },

    #[error("Invalid input. Please enter a number.")]
    NotANumber(String),

    #[error("Please enter a writer's name, or 0 to finish.")]
    EmptyQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Searching,
    CandidatesShown { candidates: Vec<MatchCandidate> },
    Finished,
}

/// What a single input did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The query matched this many roster rows; they are now shown
    CandidatesFound(usize),
    Accepted(ContributorRecord),
    BackToSearch,
    Finished,
    Notice(SessionNotice),
}

/// Search, pick and accept contributors until the user finishes
pub struct Session<'a> {
    engine: MatchingEngine<'a>,
    state: SessionState,
    accepted: AcceptedContributors,
}

impl<'a> Session<'a> {
    pub fn new(engine: MatchingEngine<'a>) -> Self {
        Self {
            engine,
            state: SessionState::Searching,
            accepted: AcceptedContributors::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    /// The prompt matching the current state
    pub fn prompt(&self) -> &'static str {
        match self.state {
            SessionState::CandidatesShown { .. } => SELECT_PROMPT,
            SessionState::Searching | SessionState::Finished => SEARCH_PROMPT,
        }
    }

    /// Candidates currently on offer, numbered from 1 by position
    pub fn candidates(&self) -> &[MatchCandidate] {
        match &self.state {
            SessionState::CandidatesShown { candidates } => candidates,
            _ => &[],
        }
    }

    pub fn accepted(&self) -> &AcceptedContributors {
        &self.accepted
    }

    /// End the session, keeping everything accepted so far
    pub fn finish(&mut self) {
        if !self.is_finished() {
            info!("Session finished with {} contributors", self.accepted.len());
        }
        self.state = SessionState::Finished;
    }

    pub fn into_contributors(self) -> AcceptedContributors {
        self.accepted
    }

    /// Feed one line of user input to the machine
    pub fn handle(&mut self, input: &str) -> SessionEvent {
        let input = input.trim();

        if input == FINISH_INPUT {
            self.finish();
            return SessionEvent::Finished;
        }

        match &self.state {
            SessionState::Finished => SessionEvent::Finished,
            SessionState::Searching => self.search(input),
            SessionState::CandidatesShown { candidates } => {
                if input == BACK_INPUT {
                    self.state = SessionState::Searching;
                    return SessionEvent::BackToSearch;
                }

                let choice = match input.parse::<usize>() {
                    Ok(k) => k,
                    Err(_) => return SessionEvent::Notice(SessionNotice::NotANumber(input.to_string())),
                };
                let Some(candidate) = choice.checked_sub(1).and_then(|i| candidates.get(i)) else {
                    return SessionEvent::Notice(SessionNotice::InvalidSelection {
                        input: choice,
                        available: candidates.len(),
                    });
                };

                let record = candidate.record.clone();
                self.state = SessionState::Searching;
                self.accept(record)
            }
        }
    }

    fn search(&mut self, query: &str) -> SessionEvent {
        if query.is_empty() {
            return SessionEvent::Notice(SessionNotice::EmptyQuery);
        }
        if self.accepted.contains_writer(query) {
            return SessionEvent::Notice(SessionNotice::DuplicateContributor(query.to_string()));
        }

        let candidates = self.engine.find_matches(query);
        if candidates.is_empty() {
            return SessionEvent::Notice(SessionNotice::NoMatches);
        }

        let found = candidates.len();
        self.state = SessionState::CandidatesShown { candidates };
        SessionEvent::CandidatesFound(found)
    }

    fn accept(&mut self, record: ContributorRecord) -> SessionEvent {
        if self.accepted.contains_writer(&record.writer_name) {
            // A different query can still land on an accepted writer
            return SessionEvent::Notice(SessionNotice::DuplicateContributor(record.writer_name));
        }
        debug!("Accepted {}", record.writer_name);
        self.accepted.push(record.clone());
        SessionEvent::Accepted(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::engine::MatchingConfig;
    use crate::roster::store::RosterTable;

    fn roster() -> RosterTable {
        RosterTable::from_records(vec![
            ContributorRecord::new("Jane Doe").with_writer_ipi("111"),
            ContributorRecord::new("John Roe").with_writer_ipi("222"),
            ContributorRecord::new("Jane Doe").with_writer_ipi("333"),
        ])
    }

    fn feed(session: &mut Session<'_>, inputs: &[&str]) -> Vec<SessionEvent> {
        inputs.iter().map(|i| session.handle(i)).collect()
    }

    #[test]
    fn test_finish_immediately() {
        let roster = roster();
        let mut session = Session::new(MatchingEngine::new(&roster));
        assert_eq!(session.handle("0"), SessionEvent::Finished);
        assert!(session.is_finished());
        assert!(session.into_contributors().is_empty());
    }

    #[test]
    fn test_search_select_finish() {
        let roster = roster();
        let mut session = Session::new(MatchingEngine::new(&roster));

        assert_eq!(session.handle("john roe"), SessionEvent::CandidatesFound(1));
        assert_eq!(session.prompt(), SELECT_PROMPT);
        assert_eq!(session.candidates()[0].record.writer_name, "John Roe");

        match session.handle(" 1 ") {
            SessionEvent::Accepted(record) => assert_eq!(record.writer_ipi, "222"),
            other => panic!("expected Accepted, got {other:?}"),
        }
        assert_eq!(session.state(), &SessionState::Searching);
        assert_eq!(session.handle("0"), SessionEvent::Finished);

        let accepted = session.into_contributors();
        assert_eq!(accepted.len(), 1);
    }

    #[test]
    fn test_back_to_search() {
        let roster = roster();
        let mut session = Session::new(MatchingEngine::new(&roster));
        session.handle("jane doe");
        assert_eq!(session.handle("9"), SessionEvent::BackToSearch);
        assert!(session.candidates().is_empty());
        assert!(session.accepted().is_empty());
    }

    #[test]
    fn test_invalid_selections_keep_candidates() {
        let roster = roster();
        let mut session = Session::new(MatchingEngine::new(&roster));
        session.handle("jane doe");
        let shown = session.candidates().len();

        let events = feed(&mut session, &["5", "abc", ""]);
        assert_eq!(
            events[0],
            SessionEvent::Notice(SessionNotice::InvalidSelection {
                input: 5,
                available: shown
            })
        );
        assert_eq!(
            events[1],
            SessionEvent::Notice(SessionNotice::NotANumber("abc".to_string()))
        );
        assert_eq!(
            events[2],
            SessionEvent::Notice(SessionNotice::NotANumber(String::new()))
        );
        assert_eq!(session.candidates().len(), shown);
    }

    #[test]
    fn test_duplicate_query_rejected() {
        let roster = roster();
        let mut session = Session::new(MatchingEngine::new(&roster));
        feed(&mut session, &["jane doe", "1"]);

        assert_eq!(
            session.handle("JANE DOE"),
            SessionEvent::Notice(SessionNotice::DuplicateContributor("JANE DOE".to_string()))
        );
        assert_eq!(session.state(), &SessionState::Searching);
    }

    #[test]
    fn test_duplicate_roster_name_rejected_on_selection() {
        let roster = roster();
        let engine = MatchingEngine::with_config(&roster, MatchingConfig { threshold: 50 });
        let mut session = Session::new(engine);
        feed(&mut session, &["jane doe", "1"]);

        // A looser query reaches the second "Jane Doe" row
        assert!(matches!(session.handle("jane"), SessionEvent::CandidatesFound(_)));
        let second = session
            .candidates()
            .iter()
            .position(|c| c.record.writer_ipi == "333")
            .unwrap();
        let event = session.handle(&(second + 1).to_string());
        assert!(matches!(
            event,
            SessionEvent::Notice(SessionNotice::DuplicateContributor(_))
        ));
        assert_eq!(session.accepted().len(), 1);
        assert_eq!(session.state(), &SessionState::Searching);
    }

    #[test]
    fn test_no_matches_and_empty_query() {
        let roster = roster();
        let mut session = Session::new(MatchingEngine::new(&roster));
        assert_eq!(
            session.handle("Zebulon Quartermaine"),
            SessionEvent::Notice(SessionNotice::NoMatches)
        );
        assert_eq!(session.handle("   "), SessionEvent::Notice(SessionNotice::EmptyQuery));
        assert_eq!(session.state(), &SessionState::Searching);
    }

    #[test]
    fn test_finish_from_candidates() {
        let roster = roster();
        let mut session = Session::new(MatchingEngine::new(&roster));
        feed(&mut session, &["john roe", "1", "jane doe"]);
        assert_eq!(session.handle("0"), SessionEvent::Finished);
        assert_eq!(session.into_contributors().len(), 1);
    }
}
