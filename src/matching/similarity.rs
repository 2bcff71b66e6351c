use rapidfuzz::distance::indel;
use serde::Serialize;

/// Highest possible similarity score
pub const MAX_SCORE: u8 = 100;

/// Scale applied to the token-sort component so that a reordered name ranks
/// just below an exact one
const TOKEN_SORT_SCALE: f64 = 0.95;

/// Length ratio from which the partial (substring) component is considered
const PARTIAL_MIN_LENGTH_RATIO: f64 = 1.5;

/// Length ratio beyond which a partial match counts for much less
const PARTIAL_LONG_LENGTH_RATIO: f64 = 8.0;

const PARTIAL_SCALE: f64 = 0.9;
const PARTIAL_LONG_SCALE: f64 = 0.6;

/// Breakdown of a name similarity calculation.
///
/// All component values are on a 0-100 scale; `score` is the rounded
/// maximum of the (scaled) components.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameSimilarity {
    /// Indel similarity of the normalized strings
    pub ratio: f64,

    /// Indel similarity after sorting whitespace-separated tokens
    pub token_sort_ratio: f64,

    /// Best similarity of the shorter string against any equally long window
    /// of the longer one; only computed when the lengths differ enough
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_ratio: Option<f64>,

    /// Final score in `0..=100`
    pub score: u8,
}

impl NameSimilarity {
    /// Compare `candidate` against `target`.
    ///
    /// Both sides are case-folded and stripped of punctuation first. An empty
    /// string on either side (after normalization) scores 0.
    #[must_use]
    pub fn calculate(candidate: &str, target: &str) -> Self {
        let a = normalize(candidate);
        let b = normalize(target);

        if a.is_empty() || b.is_empty() {
            return Self {
                ratio: 0.0,
                token_sort_ratio: 0.0,
                partial_ratio: None,
                score: 0,
            };
        }

        let ratio = indel_ratio(&a, &b);
        let token_sort_ratio = indel_ratio(&sort_tokens(&a), &sort_tokens(&b));

        let (shorter, longer) = if a.chars().count() <= b.chars().count() {
            (&a, &b)
        } else {
            (&b, &a)
        };
        let length_ratio = count_to_f64(longer.chars().count()) / count_to_f64(shorter.chars().count());

        let mut best = ratio.max(token_sort_ratio * TOKEN_SORT_SCALE);

        let partial_ratio = if length_ratio >= PARTIAL_MIN_LENGTH_RATIO {
            let partial = partial_indel_ratio(shorter, longer);
            let scale = if length_ratio > PARTIAL_LONG_LENGTH_RATIO {
                PARTIAL_LONG_SCALE
            } else {
                PARTIAL_SCALE
            };
            best = best.max(partial * scale);
            Some(partial)
        } else {
            None
        };

        Self {
            ratio,
            token_sort_ratio,
            partial_ratio,
            score: to_score(best),
        }
    }
}

/// Similarity of `candidate` to `target` on a 0-100 scale.
///
/// Pure and deterministic; never fails. Empty input scores 0.
///
/// # Examples
///
/// ```
/// use split_sheet::matching::similarity::score;
///
/// assert_eq!(score("Jane Doe", "jane doe"), 100);
/// assert!(score("Jane Doe", "jane") >= 75);
/// assert_eq!(score("", "jane"), 0);
/// ```
#[must_use]
pub fn score(candidate: &str, target: &str) -> u8 {
    NameSimilarity::calculate(candidate, target).score
}

/// Case-fold, replace non-alphanumerics with spaces and collapse whitespace
pub(crate) fn normalize(s: &str) -> String {
    let folded: String = s
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn sort_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Indel similarity on a 0-100 scale
fn indel_ratio(a: &str, b: &str) -> f64 {
    indel::normalized_similarity(a.chars(), b.chars()) * 100.0
}

/// Best indel similarity of `shorter` against every window of `longer` of the same length
fn partial_indel_ratio(shorter: &str, longer: &str) -> f64 {
    let short: Vec<char> = shorter.chars().collect();
    let long: Vec<char> = longer.chars().collect();

    if short.is_empty() || long.len() < short.len() {
        return indel_ratio(shorter, longer);
    }

    let mut best = 0.0_f64;
    for window in long.windows(short.len()) {
        let similarity =
            indel::normalized_similarity(window.iter().copied(), short.iter().copied()) * 100.0;
        if similarity > best {
            best = similarity;
            if best >= 100.0 {
                break;
            }
        }
    }
    best
}

#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

#[inline]
fn to_score(value: f64) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0-100
    {
        value.round().clamp(0.0, f64::from(MAX_SCORE)) as u8
    }
}
