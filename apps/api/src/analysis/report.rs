//! Report rendering: plain-text analysis report and a markdown entity summary.
//! Both are built in memory; callers decide where the text goes.

use std::cmp::Reverse;

use crate::analysis::extractor::EntityRecord;
use crate::analysis::pipeline::AnalysisReport;

const NOT_AVAILABLE: &str = "N/A";
const NONE: &str = "None";

/// Plain-text report: contact details, skill breakdown, match percentage, ATS findings.
pub fn render_text_report(report: &AnalysisReport) -> String {
    let entities = &report.entities;
    let skill_match = &report.skill_match;

    let warnings = if report.ats_warnings.is_empty() {
        "No issues found".to_string()
    } else {
        report
            .ats_warnings
            .iter()
            .map(|w| w.message.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Resume Analysis Report\n\
         \n\
         Name: {name}\n\
         Email: {email}\n\
         Phone: {phone}\n\
         \n\
         SKILL ANALYSIS\n\
         Required Skills: {required}\n\
         Resume Skills: {resume}\n\
         Matched Skills: {matched}\n\
         Missing Skills: {missing}\n\
         Match Percentage: {score}%\n\
         \n\
         ATS COMPLIANCE CHECK:\n\
         {warnings}\n",
        name = entities.name.as_deref().unwrap_or(NOT_AVAILABLE),
        email = entities
            .emails
            .iter()
            .next()
            .map_or(NOT_AVAILABLE, String::as_str),
        phone = entities
            .phones
            .iter()
            .next()
            .map_or(NOT_AVAILABLE, String::as_str),
        required = report.required_skills.join(", "),
        resume = join_or_none(&entities.skills),
        matched = join_or_none(&skill_match.matched_skills),
        missing = join_or_none(&skill_match.missing_skills),
        score = skill_match.score,
    )
}

/// Markdown summary of the extracted entities. Empty sections are omitted.
pub fn render_entity_summary(entities: &EntityRecord) -> String {
    let mut lines = vec![
        "# Extracted Resume Information".to_string(),
        String::new(),
        "## Basic Information".to_string(),
    ];

    if let Some(name) = &entities.name {
        lines.push(format!("- **Name**: {name}"));
    }
    if let Some(email) = entities.emails.iter().next() {
        lines.push(format!("- **Email**: {email}"));
    }
    if let Some(phone) = entities.phones.iter().next() {
        lines.push(format!("- **Phone**: {phone}"));
    }

    if !entities.skills.is_empty() {
        let mut skills: Vec<&String> = entities.skills.iter().collect();
        skills.sort();
        lines.push(String::new());
        lines.push("## Technical Skills".to_string());
        lines.push(
            skills
                .iter()
                .map(|s| format!("`{s}`"))
                .collect::<Vec<_>>()
                .join(", "),
        );
    }

    if !entities.education.is_empty() {
        lines.push(String::new());
        lines.push("## Education".to_string());
        lines.extend(entities.education.iter().map(|e| format!("- {e}")));
    }

    if !entities.certifications.is_empty() {
        lines.push(String::new());
        lines.push("## Certifications".to_string());
        lines.extend(entities.certifications.iter().map(|c| format!("- {c}")));
    }

    if !entities.achievements.is_empty() {
        // Longest first; equal lengths keep set order
        let mut achievements: Vec<&String> = entities.achievements.iter().collect();
        achievements.sort_by_key(|a| Reverse(a.chars().count()));
        lines.push(String::new());
        lines.push("## Key Achievements".to_string());
        lines.extend(
            achievements
                .iter()
                .map(|a| format!("- {}", capitalize(a.trim_matches('.')))),
        );
    }

    lines.join("\n")
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        NONE.to_string()
    } else {
        items.join(", ")
    }
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
