use regex::Regex;
use thiserror::Error;

/// Faults raised while turning raw résumé text into an `EntityRecord`.
///
/// Every pattern the extractor relies on is compiled up front, so in practice
/// these surface at construction time rather than per document.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid skill lexicon: {0}")]
    Lexicon(String),
}

/// Compiles `pattern`, attaching the pattern text to any engine error.
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, ExtractionError> {
    Regex::new(pattern).map_err(|source| ExtractionError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}
