use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::contributor::ContributorRecord;
use crate::utils::validation::normalize_key;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Failed to read roster {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Roster {path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },
}

/// Required roster columns, in the order they are stored on [`ContributorRecord`]
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "Writer Name",
    "Writer IPI",
    "Publisher Name",
    "Publisher IPI",
    "Writer PRO",
];

/// Reference table of known contributors, in source order.
///
/// Writer names are not guaranteed unique; duplicate rows are kept as-is.
#[derive(Debug, Clone, Default)]
pub struct RosterTable {
    records: Vec<ContributorRecord>,
}

impl RosterTable {
    /// Create an empty roster
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ContributorRecord>) -> Self {
        Self { records }
    }

    /// Load a roster from a CSV file (or TSV, by extension)
    ///
    /// # Errors
    ///
    /// Returns `RosterError::Read` if the file cannot be opened or parsed, or
    /// `RosterError::MissingColumn` if a required column is absent.
    pub fn load_from_file(path: &Path) -> Result<Self, RosterError> {
        let delimiter = delimiter_for(path);
        let file = std::fs::File::open(path).map_err(|e| RosterError::Read {
            path: path.to_path_buf(),
            source: csv::Error::from(e),
        })?;
        Self::from_reader(file, delimiter, path)
    }

    /// Parse a roster from delimited text. `origin` is only used in error messages.
    ///
    /// # Errors
    ///
    /// See [`RosterTable::load_from_file`].
    pub fn from_reader<R: Read>(reader: R, delimiter: u8, origin: &Path) -> Result<Self, RosterError> {
        let read_error = |source| RosterError::Read {
            path: origin.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers().map_err(read_error)?.clone();
        let normalized: Vec<String> = headers.iter().map(normalize_key).collect();

        let mut columns = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, column) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
            let wanted = normalize_key(column);
            *slot = normalized
                .iter()
                .position(|h| *h == wanted)
                .ok_or_else(|| RosterError::MissingColumn {
                    path: origin.to_path_buf(),
                    column,
                })?;
        }

        let mut records = Vec::new();
        for (i, row) in reader.records().enumerate() {
            let row = row.map_err(read_error)?;
            let cell = |idx: usize| row.get(columns[idx]).unwrap_or("").to_string();

            let writer_name = cell(0);
            if writer_name.is_empty() {
                // Data rows are 1-based after the header line
                debug!("Skipping roster row {} with empty writer name", i + 2);
                continue;
            }

            records.push(ContributorRecord {
                writer_name,
                writer_ipi: cell(1),
                publisher_name: cell(2),
                publisher_ipi: cell(3),
                writer_pro: cell(4),
            });
        }

        debug!("Loaded {} roster rows from {}", records.len(), origin.display());
        Ok(Self { records })
    }

    pub fn records(&self) -> &[ContributorRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContributorRecord> {
        self.records.iter()
    }

    /// Number of rows in the roster
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the roster is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Tab for `.tsv`/`.tab` files, comma otherwise
pub fn delimiter_for(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("tsv" | "tab") => b'\t',
        _ => b',',
    }
}
