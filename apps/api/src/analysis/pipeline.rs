//! Analysis pipeline: extraction, skill matching and ATS checks over one document.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::compliance::{check_ats_compliance, ComplianceWarning};
use crate::analysis::error::ExtractionError;
use crate::analysis::extractor::{EntityExtractor, EntityRecord};
use crate::analysis::lexicon::SkillLexicon;
use crate::analysis::matcher::{MatchResult, SkillMatcher, SkillPartition};
use crate::analysis::similarity::GestaltScorer;

/// Required skills as sent by clients: a JSON list or one comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RequiredSkills {
    List(Vec<String>),
    Csv(String),
}

impl Default for RequiredSkills {
    fn default() -> Self {
        RequiredSkills::List(Vec::new())
    }
}

impl RequiredSkills {
    /// Trimmed, lower-cased, non-blank skills; `fallback` when nothing remains.
    pub fn resolve(&self, fallback: &[String]) -> Vec<String> {
        let skills = match self {
            RequiredSkills::List(items) => normalize_skills(items.iter().map(String::as_str)),
            RequiredSkills::Csv(raw) => parse_required_skills(raw),
        };
        if skills.is_empty() {
            fallback.to_vec()
        } else {
            skills
        }
    }
}

/// Splits a comma-separated skill field, dropping blank entries.
pub fn parse_required_skills(raw: &str) -> Vec<String> {
    normalize_skills(raw.split(','))
}

fn normalize_skills<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Everything learned about one résumé in a single pass.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub required_skills: Vec<String>,
    pub entities: EntityRecord,
    pub skill_match: SkillPartition,
    pub ats_warnings: Vec<ComplianceWarning>,
}

impl AnalysisReport {
    /// Match view borrowing certifications and achievements from `entities`.
    pub fn match_result(&self) -> MatchResult<'_> {
        MatchResult::new(self.skill_match.clone(), &self.entities)
    }
}

/// Extractor and matcher sharing one lexicon. Built once at startup.
pub struct Analyzer {
    extractor: EntityExtractor,
    matcher: SkillMatcher,
}

impl Analyzer {
    pub fn new(lexicon: Arc<SkillLexicon>) -> Result<Self, ExtractionError> {
        Ok(Self {
            extractor: EntityExtractor::new(lexicon)?,
            matcher: SkillMatcher::new(GestaltScorer),
        })
    }

    pub fn extractor(&self) -> &EntityExtractor {
        &self.extractor
    }

    pub fn matcher(&self) -> &SkillMatcher {
        &self.matcher
    }

    pub fn analyze(
        &self,
        text: &str,
        required_skills: &[String],
    ) -> Result<AnalysisReport, ExtractionError> {
        let entities = self.extractor.extract(text)?;
        let skill_match = self
            .matcher
            .match_skills(&entities.skills, required_skills, Some(text));
        let ats_warnings = check_ats_compliance(text);

        let report = AnalysisReport {
            analysis_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            required_skills: required_skills.to_vec(),
            entities,
            skill_match,
            ats_warnings,
        };

        info!(
            "Analysis {}: {}% match ({} of {} skills), {} ATS warnings",
            report.analysis_id,
            report.skill_match.score,
            report.skill_match.matched_skills.len(),
            report.skill_match.evaluations.len(),
            report.ats_warnings.len()
        );

        Ok(report)
    }
}
