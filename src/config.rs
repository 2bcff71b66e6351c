//! Run configuration from a key/value table plus command-line overrides.
//!
//! The configuration file has a `Key` and a `Value` column (CSV, or TSV by
//! extension). Keys are matched loosely: `Company Name`, `CompanyName` and
//! `company_name` are the same key.
//!
//! | Key | Required | Meaning |
//! |-----|----------|---------|
//! | Company Name | no | Document title |
//! | Template Path | yes | `.docx` whose paragraph styles are copied |
//! | Text Path | yes | `.docx` with the body paragraphs |
//! | Excel Path / Roster Path | yes | Contributor roster |
//! | Output Directory | yes | Where split sheets are saved |
//! | Match Threshold | no | Minimum similarity score (default 75) |
//!
//! Relative paths in the file are resolved against the file's directory.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::roster::store::delimiter_for;
use crate::utils::validation::{normalize_key, parse_threshold, DEFAULT_MATCH_THRESHOLD};

pub const KEY_COLUMN: &str = "Key";
pub const VALUE_COLUMN: &str = "Value";

pub const COMPANY_NAME_KEY: &str = "Company Name";
pub const TEMPLATE_PATH_KEY: &str = "Template Path";
pub const TEXT_PATH_KEY: &str = "Text Path";
pub const ROSTER_PATH_KEY: &str = "Roster Path";
/// Older name of [`ROSTER_PATH_KEY`], from when the roster was a spreadsheet
pub const EXCEL_PATH_KEY: &str = "Excel Path";
pub const OUTPUT_DIRECTORY_KEY: &str = "Output Directory";
pub const MATCH_THRESHOLD_KEY: &str = "Match Threshold";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Configuration {path} is missing column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("Missing required configuration value '{0}'")]
    MissingKey(&'static str),

    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Read a key/value configuration file into a map keyed by normalized key
///
/// # Errors
///
/// Returns `ConfigError::Read` if the file cannot be read or parsed, or
/// `ConfigError::MissingColumn` if it lacks a `Key` or `Value` column.
pub fn load_key_values(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let file = std::fs::File::open(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })?;
    parse_key_values(file, delimiter_for(path), path)
}

/// Parse key/value rows. Later rows win over earlier ones; rows with an
/// empty key or value are skipped.
///
/// # Errors
///
/// See [`load_key_values`].
pub fn parse_key_values<R: Read>(
    reader: R,
    delimiter: u8,
    origin: &Path,
) -> Result<HashMap<String, String>, ConfigError> {
    let read_error = |source| ConfigError::Read {
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
    let column = |name: &'static str| {
        let wanted = normalize_key(name);
        headers
            .iter()
            .position(|h| normalize_key(h) == wanted)
            .ok_or_else(|| ConfigError::MissingColumn {
                path: origin.to_path_buf(),
                column: name,
            })
    };
    let key_idx = column(KEY_COLUMN)?;
    let value_idx = column(VALUE_COLUMN)?;

    let mut values = HashMap::new();
    for row in reader.records() {
        let row = row.map_err(read_error)?;
        let key = row.get(key_idx).unwrap_or("");
        let value = row.get(value_idx).unwrap_or("");
        if key.is_empty() || value.is_empty() {
            continue;
        }
        values.insert(normalize_key(key), value.to_string());
    }

    debug!("Read {} configuration values from {}", values.len(), origin.display());
    Ok(values)
}

/// Values given on the command line; each one replaces the file's value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub company_name: Option<String>,
    pub template_path: Option<PathBuf>,
    pub text_path: Option<PathBuf>,
    pub roster_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub threshold: Option<u8>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitSheetConfig {
    pub company_name: Option<String>,
    pub template_path: PathBuf,
    pub text_path: PathBuf,
    pub roster_path: PathBuf,
    pub output_dir: PathBuf,
    pub threshold: u8,
}

impl SplitSheetConfig {
    /// Load `config_path` (if any) and apply `overrides` on top.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read, a value is invalid,
    /// or a required value is missing from both the file and the overrides.
    pub fn resolve(config_path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let (values, base_dir) = match config_path {
            Some(path) => {
                let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
                (load_key_values(path)?, base)
            }
            None => (HashMap::new(), PathBuf::new()),
        };
        Self::from_key_values(&values, &base_dir, overrides)
    }

    /// Build from normalized key/values, resolving relative paths against `base_dir`
    ///
    /// # Errors
    ///
    /// See [`SplitSheetConfig::resolve`].
    pub fn from_key_values(
        values: &HashMap<String, String>,
        base_dir: &Path,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| values.get(&normalize_key(key)).map(String::as_str);
        let path = |key: &str| get(key).map(|v| resolve_path(base_dir, v));

        let required = |value: Option<PathBuf>, key: &'static str| value.ok_or(ConfigError::MissingKey(key));

        let template_path = required(
            overrides.template_path.or_else(|| path(TEMPLATE_PATH_KEY)),
            TEMPLATE_PATH_KEY,
        )?;
        let text_path = required(overrides.text_path.or_else(|| path(TEXT_PATH_KEY)), TEXT_PATH_KEY)?;
        let roster_path = required(
            overrides
                .roster_path
                .or_else(|| path(ROSTER_PATH_KEY))
                .or_else(|| path(EXCEL_PATH_KEY)),
            ROSTER_PATH_KEY,
        )?;
        let output_dir = required(
            overrides.output_dir.or_else(|| path(OUTPUT_DIRECTORY_KEY)),
            OUTPUT_DIRECTORY_KEY,
        )?;

        let threshold = match (overrides.threshold, get(MATCH_THRESHOLD_KEY)) {
            (Some(t), _) => t,
            (None, Some(raw)) => parse_threshold(raw).map_err(|e| ConfigError::InvalidValue {
                key: MATCH_THRESHOLD_KEY,
                value: raw.to_string(),
                reason: e.to_string(),
            })?,
            (None, None) => DEFAULT_MATCH_THRESHOLD,
        };

        let company_name = overrides
            .company_name
            .or_else(|| get(COMPANY_NAME_KEY).map(str::to_string));

        Ok(Self {
            company_name,
            template_path,
            text_path,
            roster_path,
            output_dir,
            threshold,
        })
    }
}

fn resolve_path(base_dir: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
