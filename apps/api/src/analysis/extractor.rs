//! Entity Extractor: turns raw résumé text into a structured `EntityRecord`.
//!
//! Pattern and lexicon based; no NLP model. Every pattern is compiled once in
//! `EntityExtractor::new`, so `extract` is a pure function of its input text.

use std::collections::BTreeSet;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::error::{compile_pattern, ExtractionError};
use crate::analysis::lexicon::SkillLexicon;
use crate::analysis::ordered::OrderedSet;
use crate::analysis::sections::{
    find_sections, first_section, CERTIFICATION_HEADERS, SKILL_HEADERS,
};

const NAME_SEPARATORS: &[&str] = &["---", "___", "==="];

const EMAIL_PATTERN: &str = r"[\w.+-]+@[\w-]+(?:\.[\w-]+)*\.[A-Za-z]+";

const PHONE_PATTERN: &str = r"\+?\d[\d \t-]{8,}\d";
const MIN_PHONE_DIGITS: usize = 10;

/// Degree token, rest of its line, then `<institution> | ... <yyyy ... yyyy>` on the next line.
const EDUCATION_PATTERN: &str = r"(?i)\b(B\.?\s?Tech|M\.?\s?Tech|MBA|B\.?\s?E|B\.?\s?Sc|B\.?\s?Com|B\.?\s?A)\b[^\n]*\n([^\n|]*)\|[^\n]*?(\d{4}[^\n]*?\d{4})";

/// Action verb, then the shortest run up to and including a number with optional `%`/`+`.
const ACHIEVEMENT_PATTERN: &str = r"(?i)\b(?:achieved|implemented|increased|reduced|improved|optimized|saved|led|managed|developed|delivered|completed)\b[^\n]*?\b\d+(?:%|\+|\b)";

const BULLET_PATTERN: &str = r"^[•●▪◦·*\-–]\s*";
const PARENTHETICAL_PATTERN: &str = r"\s*\([^)]*\)";

/// Certification lines shorter than this are treated as noise.
const MIN_CERTIFICATION_CHARS: usize = 6;

/// Structured information pulled from one résumé. Immutable once extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub name: Option<String>,
    pub emails: BTreeSet<String>,
    pub phones: BTreeSet<String>,
    /// `"<Degree> from <Institution> (<years>)"`, document order.
    pub education: Vec<String>,
    /// Canonical lexicon names: skills-section discoveries first, then the rest of the document.
    pub skills: Vec<String>,
    pub certifications: Vec<String>,
    pub achievements: BTreeSet<String>,
}

pub struct EntityExtractor {
    lexicon: Arc<SkillLexicon>,
    email: Regex,
    phone: Regex,
    education: Regex,
    achievement: Regex,
    bullet: Regex,
    parenthetical: Regex,
}

impl EntityExtractor {
    pub fn new(lexicon: Arc<SkillLexicon>) -> Result<Self, ExtractionError> {
        if lexicon.is_empty() {
            return Err(ExtractionError::Lexicon(
                "skill lexicon has no entries".to_string(),
            ));
        }
        Ok(Self {
            lexicon,
            email: compile_pattern(EMAIL_PATTERN)?,
            phone: compile_pattern(PHONE_PATTERN)?,
            education: compile_pattern(EDUCATION_PATTERN)?,
            achievement: compile_pattern(ACHIEVEMENT_PATTERN)?,
            bullet: compile_pattern(BULLET_PATTERN)?,
            parenthetical: compile_pattern(PARENTHETICAL_PATTERN)?,
        })
    }

    pub fn lexicon(&self) -> &SkillLexicon {
        &self.lexicon
    }

    /// Extracts every entity kind from `text`. Accepts any input, including the empty string.
    pub fn extract(&self, text: &str) -> Result<EntityRecord, ExtractionError> {
        let record = EntityRecord {
            name: extract_name(text),
            emails: self
                .email
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect(),
            phones: self.extract_phones(text),
            education: self.extract_education(text),
            skills: self.extract_skills(text),
            certifications: self.extract_certifications(text),
            achievements: self
                .achievement
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect(),
        };

        debug!(
            "Extracted entities: {} skills, {} education, {} certifications, {} achievements",
            record.skills.len(),
            record.education.len(),
            record.certifications.len(),
            record.achievements.len()
        );

        Ok(record)
    }

    fn extract_phones(&self, text: &str) -> BTreeSet<String> {
        self.phone
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|candidate| {
                candidate.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
            })
            .map(String::from)
            .collect()
    }

    fn extract_education(&self, text: &str) -> Vec<String> {
        let mut education = OrderedSet::new();
        for caps in self.education.captures_iter(text) {
            let degree = title_case(&caps[1]);
            let institution = caps[2].trim();
            let years = caps[3].trim();
            education.insert(format!("{degree} from {institution} ({years})"));
        }
        education.into_vec()
    }

    /// Section block first, then a whole-document pass for anything not yet found.
    fn extract_skills(&self, text: &str) -> Vec<String> {
        let mut skills = OrderedSet::new();

        if let Some(section) = first_section(text, SKILL_HEADERS) {
            let block = section.text();
            for entry in self.lexicon.entries() {
                if entry.is_mentioned_in(&block) {
                    skills.insert(entry.canonical());
                }
            }
        }

        for entry in self.lexicon.entries() {
            if !skills.contains(entry.canonical()) && entry.is_mentioned_in(text) {
                skills.insert(entry.canonical());
            }
        }

        skills.into_vec()
    }

    fn extract_certifications(&self, text: &str) -> Vec<String> {
        let mut certifications = OrderedSet::new();

        for section in find_sections(text, CERTIFICATION_HEADERS) {
            for line in section.lines {
                let line = line.trim();
                let without_bullet = self.bullet.replace(line, "");
                let cleaned = self.parenthetical.replace_all(&without_bullet, "");
                let cleaned = cleaned.trim();

                if cleaned.chars().count() < MIN_CERTIFICATION_CHARS {
                    continue;
                }
                let upper = cleaned.to_uppercase();
                if CERTIFICATION_HEADERS.contains(&upper.as_str()) {
                    continue;
                }
                certifications.insert(cleaned);
            }
        }

        certifications.into_vec()
    }
}

/// First line of the document, unless it is blank or a separator rule.
fn extract_name(text: &str) -> Option<String> {
    let first_line = text.split('\n').next().unwrap_or_default().trim();
    if first_line.is_empty() || NAME_SEPARATORS.iter().any(|sep| first_line.contains(sep)) {
        return None;
    }
    Some(first_line.to_string())
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest ("b.tech" → "B.Tech").
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESUME: &str = "Priya Sharma
priya.sharma@example.com | +91 98765 43210

SUMMARY
Backend engineer with 5 years of experience building data platforms.

TECHNICAL SKILLS
Python, SQL, Docker

EXPERIENCE
Acme Analytics
- Developed a Kubernetes deployment pipeline that reduced release time by 40%
- Led migration of 12 services to AWS

EDUCATION
B.Tech in Computer Science
IIT Delhi | 2015 - 2019

CERTIFICATIONS
- AWS Certified Solutions Architect (2021)
- Certified Kubernetes Administrator
- CKA
";

    fn extractor() -> EntityExtractor {
        EntityExtractor::new(Arc::new(SkillLexicon::builtin().unwrap())).unwrap()
    }

    #[test]
    fn test_full_resume_extraction() {
        let record = extractor().extract(SAMPLE_RESUME).unwrap();

        assert_eq!(record.name.as_deref(), Some("Priya Sharma"));
        assert!(record.emails.contains("priya.sharma@example.com"));
        assert!(record.phones.contains("+91 98765 43210"));
        assert_eq!(
            record.education,
            vec!["B.Tech from IIT Delhi (2015 - 2019)".to_string()]
        );
        assert_eq!(
            record.certifications,
            vec![
                "AWS Certified Solutions Architect".to_string(),
                "Certified Kubernetes Administrator".to_string(),
            ]
        );
    }

    #[test]
    fn test_section_skills_precede_document_skills() {
        let record = extractor().extract(SAMPLE_RESUME).unwrap();
        // Section block holds python, sql, docker; kubernetes and aws only appear in prose
        assert_eq!(&record.skills[..3], &["python", "sql", "docker"]);
        let k8s = record.skills.iter().position(|s| s == "kubernetes").unwrap();
        let aws = record.skills.iter().position(|s| s == "aws").unwrap();
        assert!(k8s >= 3 && aws >= 3);
    }

    #[test]
    fn test_skills_are_canonical_and_unique() {
        let lexicon = SkillLexicon::builtin().unwrap();
        let text = "SKILLS\nk8s, Kubernetes, ML\n\nBuilt machine learning models on kubernetes";
        let record = extractor().extract(text).unwrap();

        assert!(record.skills.iter().all(|s| lexicon.contains(s)));
        assert_eq!(
            record.skills.iter().filter(|s| *s == "kubernetes").count(),
            1
        );
        assert!(record.skills.contains(&"machine learning".to_string()));
        assert!(!record.skills.contains(&"k8s".to_string()));
    }

    #[test]
    fn test_minimal_lexicon_injection() {
        let lexicon = Arc::new(SkillLexicon::new([("rust", vec!["rust", "rustlang"])]).unwrap());
        let extractor = EntityExtractor::new(lexicon).unwrap();
        let record = extractor
            .extract("Jane\nSKILLS\nRustlang, Python\n")
            .unwrap();
        assert_eq!(record.skills, vec!["rust"]);
    }

    #[test]
    fn test_empty_lexicon_rejected() {
        let empty = SkillLexicon::new(Vec::<(&str, Vec<&str>)>::new()).unwrap();
        let err = EntityExtractor::new(Arc::new(empty));
        assert!(matches!(err, Err(ExtractionError::Lexicon(_))));
    }

    #[test]
    fn test_scenario_basic_skills_block() {
        let record = extractor()
            .extract("John Doe\nSKILLS\npython, sql\n\nEXPERIENCE\n...")
            .unwrap();
        assert_eq!(record.name.as_deref(), Some("John Doe"));
        assert_eq!(record.skills, vec!["python", "sql"]);
    }

    #[test]
    fn test_no_contact_details() {
        let record = extractor()
            .extract("Jordan Lee\nSoftware developer with a passion for clean code")
            .unwrap();
        assert!(record.emails.is_empty());
        assert!(record.phones.is_empty());
    }

    #[test]
    fn test_empty_input_does_not_fail() {
        let record = extractor().extract("").unwrap();
        assert_eq!(record, EntityRecord::default());
    }

    #[test]
    fn test_name_skips_separator_line() {
        let record = extractor().extract("=====\nJane Doe").unwrap();
        assert!(record.name.is_none());
        let record = extractor().extract("   \nJane Doe").unwrap();
        assert!(record.name.is_none());
    }

    #[test]
    fn test_emails_and_phones_deduplicated() {
        let text = "a.b@mail.co.uk, a.b@mail.co.uk\n555-123-4567 and 555-123-4567\n";
        let record = extractor().extract(text).unwrap();
        assert_eq!(record.emails.len(), 1);
        assert!(record.emails.contains("a.b@mail.co.uk"));
        assert_eq!(record.phones.len(), 1);
        assert!(record.phones.contains("555-123-4567"));
    }

    #[test]
    fn test_year_ranges_are_not_phones() {
        let record = extractor()
            .extract("Acme Corp 2015 - 2019\nGlobex 2019-2023")
            .unwrap();
        assert!(record.phones.is_empty());
    }

    #[test]
    fn test_education_requires_institution_and_years() {
        let text = "M.Tech in Data Science\nStanford University\n\nMBA\nIIM Ahmedabad | 2020-2022";
        let record = extractor().extract(text).unwrap();
        assert_eq!(
            record.education,
            vec!["Mba from IIM Ahmedabad (2020-2022)".to_string()]
        );
    }

    #[test]
    fn test_education_degree_is_title_cased() {
        let text = "b.sc physics\nDelhi University | Aug 2012 to May 2015";
        let record = extractor().extract(text).unwrap();
        assert_eq!(
            record.education,
            vec!["B.Sc from Delhi University (2012 to May 2015)".to_string()]
        );
    }

    #[test]
    fn test_certification_cleaning() {
        let record = extractor()
            .extract("CERTIFICATIONS\n- AWS Certified (2021)\n- X")
            .unwrap();
        assert_eq!(record.certifications, vec!["AWS Certified".to_string()]);
    }

    #[test]
    fn test_certifications_ending_in_a_label_are_kept() {
        let text = "CERTIFICATIONS\n- AWS Certified Developer\nScrum Master Certificate\n- PMP Certificate\n- Google Cloud Engineer";
        let record = extractor().extract(text).unwrap();
        assert_eq!(
            record.certifications,
            vec![
                "AWS Certified Developer",
                "Scrum Master Certificate",
                "PMP Certificate",
                "Google Cloud Engineer"
            ]
        );
    }

    #[test]
    fn test_skill_sub_heading_keeps_section_precedence() {
        let text = "SKILLS\nPython\nCommunication Skills\nDocker\n\nEXPERIENCE\nUsed aws";
        let record = extractor().extract(text).unwrap();
        assert_eq!(record.skills, vec!["python", "docker", "communication", "aws"]);
    }

    #[test]
    fn test_certifications_across_sections() {
        let text = "LICENSES\n• Registered Nurse (RN)\n\nTRAININGS\n* Advanced Cardiac Life Support\n";
        let record = extractor().extract(text).unwrap();
        assert_eq!(
            record.certifications,
            vec![
                "Registered Nurse".to_string(),
                "Advanced Cardiac Life Support".to_string(),
            ]
        );
    }

    #[test]
    fn test_achievements_end_with_quantity() {
        let text = "Increased revenue by 25% in one year\nManaged a team of 8 engineers\nImproved morale";
        let record = extractor().extract(text).unwrap();
        assert!(record.achievements.contains("Increased revenue by 25%"));
        assert!(record.achievements.contains("Managed a team of 8"));
        assert_eq!(record.achievements.len(), 2);
    }

    #[test]
    fn test_achievement_verb_needs_word_boundary() {
        let record = extractor()
            .extract("The ledger had 40 entries")
            .unwrap();
        assert!(record.achievements.is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = extractor();
        let first = extractor.extract(SAMPLE_RESUME).unwrap();
        let second = extractor.extract(SAMPLE_RESUME).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("b.tech"), "B.Tech");
        assert_eq!(title_case("MBA"), "Mba");
        assert_eq!(title_case("B Sc"), "B Sc");
    }
}
