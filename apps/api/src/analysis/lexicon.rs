//! Skill Lexicon: canonical skill names and the textual variations that map onto them.
//!
//! Built once at startup and shared read-only (`Arc<SkillLexicon>`) by the extractor.
//! Entry order is significant: when two canonical skills share a variation,
//! the entry defined first wins.

use std::collections::HashSet;

use regex::Regex;

use crate::analysis::error::{compile_pattern, ExtractionError};

/// Default skill table. Variations are matched case-insensitively on word boundaries.
const BUILTIN_SKILLS: &[(&str, &[&str])] = &[
    // Programming languages
    ("javascript", &["javascript", "js", "es6", "ecmascript"]),
    ("python", &["python", "py"]),
    ("java", &["java", "j2ee", "j2se"]),
    ("c++", &["c++", "cpp"]),
    ("c#", &["c#", "csharp"]),
    ("php", &["php"]),
    ("ruby", &["ruby", "ruby on rails"]),
    ("swift", &["swift"]),
    ("kotlin", &["kotlin"]),
    ("typescript", &["typescript", "ts"]),
    ("go", &["go", "golang"]),
    ("r", &["r"]),
    // Frontend
    ("html", &["html", "html5"]),
    ("css", &["css", "css3"]),
    ("react", &["react", "reactjs", "react.js"]),
    ("angular", &["angular", "angularjs"]),
    ("vue.js", &["vue.js", "vuejs", "vue"]),
    ("bootstrap", &["bootstrap"]),
    ("jquery", &["jquery"]),
    ("sass", &["sass", "scss"]),
    ("web accessibility", &["web accessibility", "a11y"]),
    // Backend
    ("node.js", &["node.js", "nodejs", "node"]),
    ("express", &["express", "express.js"]),
    ("django", &["django"]),
    ("flask", &["flask"]),
    ("spring", &["spring", "spring boot"]),
    ("laravel", &["laravel"]),
    ("asp.net", &["asp.net", "aspnet"]),
    // Databases
    ("mongodb", &["mongodb", "mongo"]),
    ("mysql", &["mysql"]),
    ("postgresql", &["postgresql", "postgres"]),
    ("sql", &["sql", "structured query language"]),
    ("oracle", &["oracle"]),
    ("sqlite", &["sqlite"]),
    ("redis", &["redis"]),
    // Data science / AI
    ("machine learning", &["machine learning", "ml"]),
    ("deep learning", &["deep learning", "dl"]),
    ("tensorflow", &["tensorflow", "tf"]),
    ("pytorch", &["pytorch"]),
    ("pandas", &["pandas"]),
    ("numpy", &["numpy"]),
    ("scikit-learn", &["scikit-learn", "sklearn"]),
    ("statistics", &["statistics", "stats"]),
    ("data visualization", &["data visualization", "dataviz"]),
    ("tableau", &["tableau"]),
    ("power bi", &["power bi", "powerbi"]),
    // DevOps / cloud
    ("aws", &["aws", "amazon web services"]),
    ("azure", &["azure", "microsoft azure"]),
    ("gcp", &["gcp", "google cloud"]),
    ("docker", &["docker"]),
    ("kubernetes", &["kubernetes", "k8s"]),
    ("terraform", &["terraform"]),
    ("ansible", &["ansible"]),
    ("jenkins", &["jenkins"]),
    ("git", &["git", "github", "gitlab"]),
    (
        "ci/cd",
        &["ci/cd", "continuous integration", "continuous deployment"],
    ),
    // Tools
    ("jira", &["jira"]),
    ("figma", &["figma"]),
    ("excel", &["excel", "advanced excel"]),
    ("photoshop", &["photoshop"]),
    ("illustrator", &["illustrator"]),
    // Business / soft skills
    ("agile", &["agile", "scrum"]),
    ("project management", &["project management", "pm"]),
    ("business analysis", &["business analysis", "ba"]),
    ("communication", &["communication", "communication skills"]),
    // Digital marketing
    (
        "digital marketing",
        &["digital marketing", "digitalmarketing", "online marketing"],
    ),
    (
        "seo/sem",
        &[
            "seo",
            "sem",
            "search engine optimization",
            "search engine marketing",
        ],
    ),
    (
        "google analytics",
        &["google analytics", "ga", "googleanalytics"],
    ),
    (
        "social media marketing",
        &["social media marketing", "smm", "social media"],
    ),
    (
        "content creation",
        &["content creation", "content marketing", "content strategy"],
    ),
    ("market research", &["market research", "competitive analysis"]),
];

/// Case-insensitive pattern matching any of `terms` bounded by non-word characters
/// or the ends of the text. Unlike `\b`, this also bounds terms such as `c++` or `c#`.
pub(crate) fn whole_word_pattern<T: AsRef<str>>(terms: &[T]) -> String {
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t.as_ref()))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"(?i)(?:^|\W)(?:{alternation})(?:\W|$)")
}

/// One canonical skill with its variations and the compiled whole-word matcher.
#[derive(Debug, Clone)]
pub struct SkillEntry {
    canonical: String,
    variations: Vec<String>,
    pattern: Regex,
}

impl SkillEntry {
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn variations(&self) -> &[String] {
        &self.variations
    }

    /// True if any variation occurs in `text` as a whole word (case-insensitive).
    pub fn is_mentioned_in(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

#[derive(Debug, Clone)]
pub struct SkillLexicon {
    entries: Vec<SkillEntry>,
}

impl SkillLexicon {
    /// Builds a lexicon from `(canonical, variations)` pairs, preserving their order.
    ///
    /// Variations are trimmed and lower-cased; blank and repeated variations are dropped.
    /// Fails on blank or duplicate canonical names and on entries left without variations.
    pub fn new<I, C, V, S>(entries: I) -> Result<Self, ExtractionError>
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut built = Vec::new();

        for (canonical, variations) in entries {
            let canonical = canonical.into().trim().to_string();
            if canonical.is_empty() {
                return Err(ExtractionError::Lexicon(
                    "canonical skill name cannot be blank".to_string(),
                ));
            }
            if !seen.insert(canonical.to_lowercase()) {
                return Err(ExtractionError::Lexicon(format!(
                    "duplicate canonical skill '{canonical}'"
                )));
            }

            let mut normalized: Vec<String> = Vec::new();
            for variation in variations {
                let v = variation.into().trim().to_lowercase();
                if !v.is_empty() && !normalized.contains(&v) {
                    normalized.push(v);
                }
            }
            if normalized.is_empty() {
                return Err(ExtractionError::Lexicon(format!(
                    "skill '{canonical}' has no variations"
                )));
            }

            let pattern = compile_pattern(&whole_word_pattern(&normalized))?;

            built.push(SkillEntry {
                canonical,
                variations: normalized,
                pattern,
            });
        }

        Ok(Self { entries: built })
    }

    /// The default lexicon covering languages, frameworks, data, cloud, tooling and marketing skills.
    pub fn builtin() -> Result<Self, ExtractionError> {
        Self::new(
            BUILTIN_SKILLS
                .iter()
                .map(|(canonical, variations)| (*canonical, variations.iter().copied())),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in definition order.
    pub fn entries(&self) -> &[SkillEntry] {
        &self.entries
    }
}
