//! Centralized validation and helper functions.

use crate::core::types::UNTITLED_BASE_NAME;

/// Maximum length of the base part of an output file name
pub const MAX_BASE_NAME_LENGTH: usize = 200;

/// Default minimum similarity score for a roster row to be offered
pub const DEFAULT_MATCH_THRESHOLD: u8 = 75;

/// Zip local-file-header signature that every `.docx` package starts with
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Characters that may not appear in a file name on common platforms
const UNSAFE_FILENAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Match threshold must be an integer between 0 and 100, got '{0}'")]
    InvalidThreshold(String),
}

/// Normalize a configuration key or column header for lookup.
///
/// Lowercases and drops spaces, underscores and hyphens, so that
/// `"Writer Name"`, `"WriterName"` and `"writer_name"` compare equal.
///
/// # Examples
///
/// ```
/// use split_sheet::utils::validation::normalize_key;
///
/// assert_eq!(normalize_key("Writer Name"), "writername");
/// assert_eq!(normalize_key("writer_name"), "writername");
/// assert_eq!(normalize_key(" Output-Directory "), "outputdirectory");
/// ```
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Turn a song title into a safe file name base.
///
/// Path separators, reserved punctuation and control characters become `_`;
/// the result is trimmed and truncated. An empty result falls back to
/// `"Untitled"`, so the output always stays inside the output directory.
#[must_use]
pub fn sanitize_base_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_control() || UNSAFE_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .take(MAX_BASE_NAME_LENGTH)
        .collect();

    let sanitized = sanitized.trim().trim_start_matches('.').to_string();
    if sanitized.is_empty() {
        UNTITLED_BASE_NAME.to_string()
    } else {
        sanitized
    }
}

/// Parse a match threshold in `0..=100`
///
/// # Errors
///
/// Returns `ValidationError::InvalidThreshold` if the value is not an integer
/// or is out of range.
pub fn parse_threshold(value: &str) -> Result<u8, ValidationError> {
    match value.trim().parse::<u8>() {
        Ok(n) if n <= 100 => Ok(n),
        _ => Err(ValidationError::InvalidThreshold(value.to_string())),
    }
}

/// Check the magic number of a `.docx` package (a zip archive)
#[must_use]
pub fn looks_like_docx(content: &[u8]) -> bool {
    content.starts_with(ZIP_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Company Name"), "companyname");
        assert_eq!(normalize_key("CompanyName"), "companyname");
        assert_eq!(normalize_key("WRITER_PRO"), "writerpro");
    }

    #[test]
    fn test_sanitize_base_name_keeps_plain_titles() {
        assert_eq!(sanitize_base_name("Song"), "Song");
        assert_eq!(sanitize_base_name("  Midnight Drive  "), "Midnight Drive");
        assert_eq!(sanitize_base_name("Don't Stop (Remix)"), "Don't Stop (Remix)");
    }

    #[test]
    fn test_sanitize_base_name_blocks_traversal() {
        assert_eq!(sanitize_base_name("../etc/passwd"), "_etc_passwd");
        assert_eq!(sanitize_base_name("AC/DC"), "AC_DC");
        assert_eq!(sanitize_base_name("a\\b:c*d?e\"f<g>h|i"), "a_b_c_d_e_f_g_h_i");
        assert_eq!(sanitize_base_name("tab\there"), "tab_here");
    }

    #[test]
    fn test_sanitize_base_name_empty_falls_back() {
        assert_eq!(sanitize_base_name(""), UNTITLED_BASE_NAME);
        assert_eq!(sanitize_base_name("   "), UNTITLED_BASE_NAME);
        assert_eq!(sanitize_base_name("..."), UNTITLED_BASE_NAME);
    }

    #[test]
    fn test_sanitize_base_name_truncates() {
        let long = "a".repeat(500);
        assert_eq!(sanitize_base_name(&long).len(), MAX_BASE_NAME_LENGTH);
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold("75").unwrap(), 75);
        assert_eq!(parse_threshold(" 0 ").unwrap(), 0);
        assert_eq!(parse_threshold("100").unwrap(), 100);
        assert!(parse_threshold("101").is_err());
        assert!(parse_threshold("-1").is_err());
        assert!(parse_threshold("high").is_err());
    }

    #[test]
    fn test_looks_like_docx() {
        assert!(looks_like_docx(b"PK\x03\x04rest"));
        assert!(!looks_like_docx(b"{\\rtf1"));
        assert!(!looks_like_docx(b""));
    }
}
