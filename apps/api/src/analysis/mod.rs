// Résumé analysis: entity extraction, skill matching, ATS compliance.
// Everything below `handlers` is synchronous and CPU-bound; handlers run it
// inside tokio::task::spawn_blocking.

pub mod compliance;
pub mod error;
pub mod extractor;
pub mod handlers;
pub mod lexicon;
pub mod matcher;
mod ordered;
pub mod pipeline;
pub mod report;
pub mod sections;
pub mod similarity;

// Re-export the public API consumed by config, state and main.
pub use error::ExtractionError;
pub use lexicon::SkillLexicon;
pub use pipeline::{parse_required_skills, Analyzer};
