use std::path::Path;

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use crate::assembly::styles::merge_paragraph_styles;
use crate::assembly::AssemblyError;
use crate::core::document::{Block, Document};
use crate::core::style::TITLE_STYLE;
use crate::docx::reader;

/// Title used when the configuration names no company
pub const DEFAULT_COMPANY_NAME: &str = "Company Name Not Specified";

/// Placeholder in the body text replaced by the quoted song title
pub const SONG_TITLE_TOKEN: &str = "SONG TITLE";

/// Placeholder in the body text replaced by the quoted artist name
pub const ARTIST_NAME_TOKEN: &str = "ARTIST NAME";

/// Session metadata that goes into the document head and placeholders
#[derive(Debug, Clone, Default)]
pub struct AssemblyRequest {
    pub add_date: bool,
    pub company_name: Option<String>,
    pub song_name: Option<String>,
    pub artist_name: Option<String>,
}

/// Something the user should hear about that did not stop assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssemblyWarning {
    /// No song name was given; `SONG TITLE` placeholders were left in place
    MissingSongTitle,
}

impl std::fmt::Display for AssemblyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSongTitle => write!(
                f,
                "Please remember to specify a song title in the split sheet at a later date"
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssembledDocument {
    pub document: Document,
    pub warnings: Vec<AssemblyWarning>,
}

/// Builds the draft split sheet from a template and a body document
pub struct DocumentAssembler {
    today: NaiveDate,
}

impl DocumentAssembler {
    /// Assembler that dates documents with the local calendar date
    pub fn new() -> Self {
        Self {
            today: Local::now().date_naive(),
        }
    }

    /// Assembler with a fixed date, for reproducible output
    pub fn with_date(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Load the template and body documents and assemble them.
    ///
    /// # Errors
    ///
    /// Returns `AssemblyError::DocumentLoadFailure` if either document cannot be
    /// read. Nothing is assembled in that case.
    pub fn assemble_from_paths(
        &self,
        template_path: &Path,
        text_path: &Path,
        request: &AssemblyRequest,
    ) -> Result<AssembledDocument, AssemblyError> {
        let load = |path: &Path| {
            reader::read_document(path).map_err(|source| AssemblyError::DocumentLoadFailure {
                path: path.to_path_buf(),
                source,
            })
        };

        let template = load(template_path)?;
        let body = load(text_path)?;
        Ok(self.assemble(&template, &body, request))
    }

    /// Build a fresh document: template paragraph styles, a title, the
    /// optional date line, then every body paragraph with placeholders filled.
    pub fn assemble(
        &self,
        template: &Document,
        body: &Document,
        request: &AssemblyRequest,
    ) -> AssembledDocument {
        let mut doc = Document::new();
        let copied = merge_paragraph_styles(template, &mut doc);
        debug!("Copied {} paragraph styles from template", copied);

        let company = request
            .company_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_COMPANY_NAME);
        doc.add_paragraph(company, Some(TITLE_STYLE));

        if request.add_date {
            doc.add_paragraph(dated_line(self.today), None);
        }

        for paragraph in body.paragraphs() {
            doc.add_paragraph(paragraph.text.clone(), paragraph.style.as_deref());
        }

        let replaced = substitute_placeholders(
            &mut doc,
            request.song_name.as_deref(),
            request.artist_name.as_deref(),
        );
        info!("Assembled document with {} blocks", doc.blocks().len());
        debug!("Filled placeholders in {} paragraphs", replaced);

        let mut warnings = Vec::new();
        if request.song_name.is_none() {
            warnings.push(AssemblyWarning::MissingSongTitle);
        }

        AssembledDocument {
            document: doc,
            warnings,
        }
    }
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// `"Dated the 5 day of March, 2024"`: no leading zero, full month name
pub fn dated_line(date: NaiveDate) -> String {
    format!(
        "Dated the {} day of {}, {}",
        date.day(),
        date.format("%B"),
        date.year()
    )
}

/// Replace `SONG TITLE` and `ARTIST NAME` in top-level paragraphs with the
/// quoted values. Matching is case-sensitive and every occurrence is
/// replaced. An absent value leaves its token untouched.
///
/// Returns the number of paragraphs changed.
pub fn substitute_placeholders(doc: &mut Document, song: Option<&str>, artist: Option<&str>) -> usize {
    let replacements: Vec<(&str, String)> = [(SONG_TITLE_TOKEN, song), (ARTIST_NAME_TOKEN, artist)]
        .into_iter()
        .filter_map(|(token, value)| value.map(|v| (token, format!("\"{v}\""))))
        .collect();

    let mut changed = 0;
    for paragraph in doc.paragraphs_mut() {
        let mut touched = false;
        for (token, value) in &replacements {
            if paragraph.text.contains(token) {
                paragraph.text = paragraph.text.replace(token, value);
                touched = true;
            }
        }
        if touched {
            changed += 1;
        }
    }
    changed
}

/// Whether the body still carries a placeholder that was never filled
pub fn has_unfilled_placeholders(doc: &Document) -> bool {
    doc.blocks().iter().any(|block| match block {
        Block::Paragraph(p) => p.text.contains(SONG_TITLE_TOKEN) || p.text.contains(ARTIST_NAME_TOKEN),
        Block::Table(_) => false,
    })
}
