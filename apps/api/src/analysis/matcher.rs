//! Skill Matcher: partitions a required-skill list into matched / missing
//! against the skills found on a résumé.
//!
//! Per required skill (lower-cased, trimmed):
//! 1. exact equality with a résumé skill → 1.0, no further scanning
//! 2. otherwise best similarity over résumé skills, kept only if > 0.7
//! 3. if still below 0.8 and raw text is available, spelling variants of the
//!    required skill are searched as whole words in the raw text; a hit forces 1.0
//! 4. matched iff the best score is ≥ 0.7
//!
//! score = round(100 × matched / required), 0 when nothing is required.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::error::compile_pattern;
use crate::analysis::extractor::EntityRecord;
use crate::analysis::lexicon::whole_word_pattern;
use crate::analysis::similarity::{GestaltScorer, SimilarityScorer};

/// A required skill counts as matched at or above this score.
pub const MATCH_THRESHOLD: f64 = 0.7;
/// Below this score the raw-text fallback scan runs.
pub const FALLBACK_THRESHOLD: f64 = 0.8;
pub const MAX_SCORE: u32 = 100;

/// How a required skill's final score was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Exact,
    Similar,
    TextScan,
    None,
}

/// Per-skill detail behind the matched / missing partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEvaluation {
    pub skill: String,
    /// Résumé skill that produced the best similarity, if any cleared the threshold.
    pub best_match: Option<String>,
    pub similarity: f64,
    pub source: MatchSource,
    pub matched: bool,
}

/// Owned outcome of matching two skill lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillPartition {
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub score: u32,
    pub evaluations: Vec<SkillEvaluation>,
}

/// Match outcome plus read-only views of the source record's certifications and achievements.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult<'a> {
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub score: u32,
    pub max_score: u32,
    pub evaluations: Vec<SkillEvaluation>,
    pub certifications: &'a [String],
    pub achievements: &'a BTreeSet<String>,
}

impl<'a> MatchResult<'a> {
    pub fn new(partition: SkillPartition, record: &'a EntityRecord) -> Self {
        let SkillPartition {
            matched_skills,
            missing_skills,
            score,
            evaluations,
        } = partition;
        Self {
            matched_skills,
            missing_skills,
            score,
            max_score: MAX_SCORE,
            evaluations,
            certifications: &record.certifications,
            achievements: &record.achievements,
        }
    }
}

/// Stateless matcher over a pluggable similarity backend.
#[derive(Debug, Clone, Default)]
pub struct SkillMatcher<S = GestaltScorer> {
    scorer: S,
}

impl<S: SimilarityScorer> SkillMatcher<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    /// Scores `record`'s skills against `required_skills`.
    pub fn score<'a>(
        &self,
        record: &'a EntityRecord,
        required_skills: &[String],
        raw_text: Option<&str>,
    ) -> MatchResult<'a> {
        let partition = self.match_skills(&record.skills, required_skills, raw_text);
        MatchResult::new(partition, record)
    }

    /// Partitions `required_skills` (normalized, first occurrence kept) into matched / missing.
    pub fn match_skills(
        &self,
        resume_skills: &[String],
        required_skills: &[String],
        raw_text: Option<&str>,
    ) -> SkillPartition {
        let resume: Vec<String> = resume_skills.iter().map(|s| normalize(s)).collect();
        let required = normalize_required(required_skills);

        let mut partition = SkillPartition::default();
        for skill in required {
            let evaluation = self.evaluate(&skill, &resume, raw_text);
            if evaluation.matched {
                partition.matched_skills.push(skill);
            } else {
                partition.missing_skills.push(skill);
            }
            partition.evaluations.push(evaluation);
        }

        partition.score = percentage(
            partition.matched_skills.len(),
            partition.evaluations.len(),
        );
        partition
    }

    fn evaluate(&self, skill: &str, resume: &[String], raw_text: Option<&str>) -> SkillEvaluation {
        let mut best_score = 0.0_f64;
        let mut best_match: Option<String> = None;
        let mut source = MatchSource::None;

        for candidate in resume {
            if candidate == skill {
                best_score = 1.0;
                best_match = Some(candidate.clone());
                source = MatchSource::Exact;
                break;
            }
            let current = self.scorer.similarity(skill, candidate);
            if current > best_score && current > MATCH_THRESHOLD {
                best_score = current;
                best_match = Some(candidate.clone());
                source = MatchSource::Similar;
            }
        }

        if best_score < FALLBACK_THRESHOLD {
            if let Some(text) = raw_text {
                if mentioned_in_text(skill, text) {
                    best_score = 1.0;
                    source = MatchSource::TextScan;
                }
            }
        }

        SkillEvaluation {
            skill: skill.to_string(),
            best_match,
            similarity: best_score,
            source,
            matched: best_score >= MATCH_THRESHOLD,
        }
    }
}

fn normalize(skill: &str) -> String {
    skill.trim().to_lowercase()
}

fn normalize_required(required: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    required
        .iter()
        .map(|s| normalize(s))
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// `round(100 × matched / total)` with ties to even, 0 when `total` is 0.
pub fn percentage(matched: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((matched as f64 / total as f64) * 100.0).round_ties_even() as u32
}

/// Spellings tried by the raw-text scan: as-is, spaces removed, spaces as hyphens,
/// slash as a space, slash as " and ".
pub fn spelling_variants(skill: &str) -> Vec<String> {
    let candidates = [
        skill.to_string(),
        skill.replace(' ', ""),
        skill.replace(' ', "-"),
        skill.replace('/', " "),
        skill.replace('/', " and "),
    ];

    let mut variants: Vec<String> = Vec::new();
    for candidate in candidates {
        if !candidate.trim().is_empty() && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants
}

fn mentioned_in_text(skill: &str, text: &str) -> bool {
    let variants = spelling_variants(skill);
    if variants.is_empty() {
        return false;
    }

    match compile_pattern(&whole_word_pattern(&variants)) {
        Ok(pattern) => pattern.is_match(text),
        Err(e) => {
            warn!("Skipping raw-text scan for '{skill}': {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn matcher() -> SkillMatcher {
        SkillMatcher::new(GestaltScorer)
    }

    /// Scores every pair as the same fixed value.
    struct FixedScorer(f64);

    impl SimilarityScorer for FixedScorer {
        fn similarity(&self, _a: &str, _b: &str) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_basic_partition_and_score() {
        let result = matcher().match_skills(
            &skills(&["python", "sql"]),
            &skills(&["python", "sql", "java"]),
            Some("John Doe\nSKILLS\npython, sql\n\nEXPERIENCE\n..."),
        );
        assert_eq!(result.matched_skills, vec!["python", "sql"]);
        assert_eq!(result.missing_skills, vec!["java"]);
        assert_eq!(result.score, 67);
    }

    #[test]
    fn test_empty_required_list() {
        let result = matcher().match_skills(&skills(&["python"]), &[], Some("python"));
        assert_eq!(result.score, 0);
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn test_no_resume_skills_all_missing() {
        let result = matcher().match_skills(&[], &skills(&["rust", "go"]), None);
        assert_eq!(result.missing_skills, vec!["rust", "go"]);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_exact_match_is_case_and_whitespace_insensitive() {
        let result = matcher().match_skills(
            &skills(&["  Docker ", "kubernetes"]),
            &skills(&["DOCKER"]),
            None,
        );
        assert_eq!(result.matched_skills, vec!["docker"]);
        assert_eq!(result.evaluations[0].source, MatchSource::Exact);
    }

    #[test]
    fn test_exact_match_wins_regardless_of_scorer() {
        let matcher = SkillMatcher::new(FixedScorer(0.0));
        let result = matcher.match_skills(&skills(&["a", "b", "sql"]), &skills(&["sql"]), None);
        assert_eq!(result.matched_skills, vec!["sql"]);
        assert_eq!(result.evaluations[0].similarity, 1.0);
    }

    #[test]
    fn test_similar_skill_above_threshold_matches() {
        let result = matcher().match_skills(&skills(&["postgres"]), &skills(&["postgresql"]), None);
        assert_eq!(result.matched_skills, vec!["postgresql"]);
        let eval = &result.evaluations[0];
        assert_eq!(eval.source, MatchSource::Similar);
        assert_eq!(eval.best_match.as_deref(), Some("postgres"));
    }

    #[test]
    fn test_similarity_at_threshold_is_not_a_candidate() {
        // Candidates must strictly exceed 0.7
        let matcher = SkillMatcher::new(FixedScorer(0.7));
        let result = matcher.match_skills(&skills(&["x"]), &skills(&["y"]), None);
        assert_eq!(result.missing_skills, vec!["y"]);
    }

    #[test]
    fn test_fallback_scan_matches_prose_mention() {
        let text = "Experience\n- Built machine learning pipelines for fraud detection";
        let result = matcher().match_skills(
            &skills(&["ml"]),
            &skills(&["machine learning"]),
            Some(text),
        );
        assert_eq!(result.matched_skills, vec!["machine learning"]);
        assert_eq!(result.evaluations[0].source, MatchSource::TextScan);
    }

    #[test]
    fn test_fallback_needs_raw_text() {
        let result = matcher().match_skills(&skills(&["ml"]), &skills(&["machine learning"]), None);
        assert_eq!(result.missing_skills, vec!["machine learning"]);
    }

    #[test]
    fn test_fallback_skipped_when_similarity_is_strong() {
        // 0.85 ≥ 0.8 so the raw text is never consulted
        let matcher = SkillMatcher::new(FixedScorer(0.85));
        let result = matcher.match_skills(
            &skills(&["something"]),
            &skills(&["rust"]),
            Some("rust everywhere"),
        );
        assert_eq!(result.evaluations[0].source, MatchSource::Similar);
    }

    #[test]
    fn test_fallback_overrides_weak_candidate() {
        let matcher = SkillMatcher::new(FixedScorer(0.75));
        let result = matcher.match_skills(
            &skills(&["something"]),
            &skills(&["rust"]),
            Some("Shipped services in Rust"),
        );
        let eval = &result.evaluations[0];
        assert_eq!(eval.source, MatchSource::TextScan);
        assert_eq!(eval.similarity, 1.0);
    }

    #[test]
    fn test_fallback_spelling_variants() {
        let m = matcher();
        let r = m.match_skills(&[], &skills(&["ci/cd"]), Some("Set up CI and CD pipelines"));
        assert_eq!(r.matched_skills, vec!["ci/cd"]);
        let r = m.match_skills(&[], &skills(&["power bi"]), Some("Dashboards in PowerBI"));
        assert_eq!(r.matched_skills, vec!["power bi"]);
        let r = m.match_skills(&[], &skills(&["machine learning"]), Some("machine-learning"));
        assert_eq!(r.matched_skills, vec!["machine learning"]);
    }

    #[test]
    fn test_fallback_is_whole_word() {
        let result = matcher().match_skills(&[], &skills(&["java"]), Some("Expert in JavaScript"));
        assert_eq!(result.missing_skills, vec!["java"]);
    }

    #[test]
    fn test_required_duplicates_collapse() {
        let result = matcher().match_skills(
            &skills(&["python"]),
            &skills(&["Python", "python ", "go"]),
            None,
        );
        assert_eq!(result.matched_skills, vec!["python"]);
        assert_eq!(result.missing_skills, vec!["go"]);
        assert_eq!(result.score, 50);
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let required = skills(&["python", "react", "aws", "figma", "excel"]);
        let result = matcher().match_skills(
            &skills(&["python", "reactjs", "excel"]),
            &required,
            Some("Deployed on AWS"),
        );
        assert_eq!(
            result.matched_skills.len() + result.missing_skills.len(),
            required.len()
        );
        for skill in &required {
            let in_matched = result.matched_skills.contains(skill);
            let in_missing = result.missing_skills.contains(skill);
            assert!(in_matched ^ in_missing, "{skill} must be in exactly one list");
        }
        assert_eq!(
            result.score,
            percentage(result.matched_skills.len(), required.len())
        );
    }

    #[test]
    fn test_empty_skill_only_matches_empty() {
        let m = matcher();
        let r = m.match_skills(&skills(&["python"]), &skills(&[""]), Some("python"));
        assert_eq!(r.missing_skills, vec![""]);
        let r = m.match_skills(&skills(&[""]), &skills(&[""]), None);
        assert_eq!(r.matched_skills, vec![""]);
    }

    #[test]
    fn test_score_passes_record_fields_through() {
        let record = EntityRecord {
            skills: skills(&["python"]),
            certifications: skills(&["AWS Certified"]),
            achievements: BTreeSet::from(["Reduced costs by 20%".to_string()]),
            ..EntityRecord::default()
        };

        let result = matcher().score(&record, &skills(&["python"]), None);
        assert_eq!(result.score, 100);
        assert_eq!(result.max_score, 100);
        assert_eq!(result.certifications, record.certifications.as_slice());
        assert!(std::ptr::eq(result.achievements, &record.achievements));
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(4, 4), 100);
        // 12.5 and 62.5 round to the even neighbour
        assert_eq!(percentage(1, 8), 12);
        assert_eq!(percentage(5, 8), 62);
        assert_eq!(percentage(3, 8), 38);
    }

    #[test]
    fn test_spelling_variants() {
        assert_eq!(
            spelling_variants("ci/cd"),
            vec!["ci/cd", "ci cd", "ci and cd"]
        );
        assert_eq!(
            spelling_variants("machine learning"),
            vec!["machine learning", "machinelearning", "machine-learning"]
        );
        assert!(spelling_variants("").is_empty());
    }
}
