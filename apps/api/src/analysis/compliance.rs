//! ATS compliance checks: flags length, content and formatting problems that
//! commonly break applicant tracking system parsers.
//!
//! Runs on raw text only; independent of extraction and matching.

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const MIN_WORDS: usize = 200;
pub const MAX_WORDS: usize = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    TooShort,
    TooLong,
    MissingMetrics,
    WeakActionVerbs,
    Tables,
    HeadersFooters,
    Graphics,
    Columns,
    Icons,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceWarning {
    pub kind: WarningKind,
    pub message: String,
}

impl ComplianceWarning {
    fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

// Static patterns, compiled once on first use.
lazy_static::lazy_static! {
    // Percentages, "N+", dollar and rupee amounts, "N years" / "N yrs"
    static ref METRIC_RE: Regex =
        Regex::new(r"\b\d+%|\b\d+\+|\$\d+|\d+\s*(?:years|yrs)|₹\d+").unwrap();
    static ref ACTION_VERB_RE: Regex = Regex::new(
        r"(?i)\b(?:achieved|implemented|developed|managed|led|improved|increased)\b"
    )
    .unwrap();
    static ref FORMATTING_RULES: Vec<(WarningKind, &'static str, Regex)> = vec![
        (
            WarningKind::Tables,
            "tables",
            Regex::new(r"(?i)\b(?:table|row|column)\b").unwrap(),
        ),
        (
            WarningKind::HeadersFooters,
            "headers and footers",
            Regex::new(r"(?i)\b(?:header|footer)\b").unwrap(),
        ),
        (
            WarningKind::Graphics,
            "graphics",
            Regex::new(r"[■□▢▣▤▥▦▧▨▩▪▫▬▭▮▯⛔█]").unwrap(),
        ),
        (
            WarningKind::Columns,
            "columns",
            Regex::new(r"(?i)column|text\s*box").unwrap(),
        ),
        (
            WarningKind::Icons,
            "icons",
            Regex::new(r"[⚡★☆♡♥♠♣♦]").unwrap(),
        ),
    ];
}

/// Runs every check in order: length, metrics, action verbs, then each formatting category.
pub fn check_ats_compliance(text: &str) -> Vec<ComplianceWarning> {
    let mut warnings = Vec::new();

    let word_count = text.split_whitespace().count();
    if word_count < MIN_WORDS {
        warnings.push(ComplianceWarning::new(
            WarningKind::TooShort,
            format!(
                "Resume too short: only {word_count} words (aim for {MIN_WORDS}-{MAX_WORDS} words)"
            ),
        ));
    } else if word_count > MAX_WORDS {
        warnings.push(ComplianceWarning::new(
            WarningKind::TooLong,
            format!("Resume too long: {word_count} words (ideal is {MIN_WORDS}-{MAX_WORDS} words)"),
        ));
    }

    if !METRIC_RE.is_match(text) {
        warnings.push(ComplianceWarning::new(
            WarningKind::MissingMetrics,
            "Add quantifiable metrics: include numbers like 'increased sales by 30%' or 'managed $1M budget'",
        ));
    }

    if !ACTION_VERB_RE.is_match(text) {
        warnings.push(ComplianceWarning::new(
            WarningKind::WeakActionVerbs,
            "Use strong action verbs: start bullet points with words like 'Developed', 'Implemented', 'Led'",
        ));
    }

    for (kind, label, pattern) in FORMATTING_RULES.iter() {
        if pattern.is_match(text) {
            warnings.push(ComplianceWarning::new(
                *kind,
                format!("Avoid {label}: these may not parse correctly in ATS systems"),
            ));
        }
    }

    warnings
}
