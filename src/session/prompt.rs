use std::io::{self, BufRead, Write};

use crate::matching::engine::MatchCandidate;
use crate::session::{Session, SessionEvent};

pub const DATE_PROMPT: &str = "Press 1 to add date or 0 to continue: ";
pub const SONG_PROMPT: &str = "Enter song name: ";
pub const ARTIST_PROMPT: &str = "Please enter artist name: ";

/// Line-oriented user interaction
pub trait Prompter {
    /// Show `text` and read one line. `None` means the input is exhausted.
    fn prompt_line(&mut self, text: &str) -> io::Result<Option<String>>;

    /// Like [`Prompter::prompt_line`], but an empty answer is `None` too
    fn prompt_optional(&mut self, text: &str) -> io::Result<Option<String>> {
        Ok(self.prompt_line(text)?.filter(|answer| !answer.is_empty()))
    }

    fn notify(&mut self, message: &str) -> io::Result<()>;
}

/// Prompter over any line reader and writer (stdin/stdout in the binary)
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn prompt_line(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn notify(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{message}")
    }
}

/// One line of the candidate list, numbered from 1
pub fn describe_candidate(number: usize, candidate: &MatchCandidate) -> String {
    let r = &candidate.record;
    format!(
        "{number}: {} (IPI {}) | {} (IPI {}) | PRO {} | score {}",
        r.writer_name, r.writer_ipi, r.publisher_name, r.publisher_ipi, r.writer_pro, candidate.score
    )
}

/// Drive `session` with `prompter` until the user finishes or input runs out
///
/// # Errors
///
/// Returns any I/O error raised by the prompter. Contributors accepted before
/// the error stay in the session.
pub fn run_session<P: Prompter + ?Sized>(session: &mut Session<'_>, prompter: &mut P) -> io::Result<()> {
    while !session.is_finished() {
        let Some(line) = prompter.prompt_line(session.prompt())? else {
            session.finish();
            break;
        };

        match session.handle(&line) {
            SessionEvent::CandidatesFound(_) => {
                for (i, candidate) in session.candidates().iter().enumerate() {
                    prompter.notify(&describe_candidate(i + 1, candidate))?;
                }
            }
            SessionEvent::Accepted(record) => {
                prompter.notify(&format!("Added {}", record.writer_name))?;
            }
            SessionEvent::Notice(notice) => prompter.notify(&notice.to_string())?,
            SessionEvent::BackToSearch | SessionEvent::Finished => {}
        }
    }
    Ok(())
}
