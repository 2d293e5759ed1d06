//! Axum route handlers for the Analysis API.

use std::collections::BTreeSet;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::compliance::{check_ats_compliance, ComplianceWarning};
use crate::analysis::extractor::EntityRecord;
use crate::analysis::matcher::MatchResult;
use crate::analysis::pipeline::{parse_required_skills, AnalysisReport, RequiredSkills};
use crate::analysis::report::{render_entity_summary, render_text_report};
use crate::decode::{extract_text, DocumentKind};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_skills: Vec<String>,
    #[serde(default)]
    pub required_skills: RequiredSkills,
    pub raw_text: Option<String>,
    /// Passed through to the response unchanged.
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub achievements: BTreeSet<String>,
}

#[derive(Debug, Serialize)]
pub struct LexiconSkill {
    pub skill: String,
    pub variations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ComplianceResponse {
    pub word_count: usize,
    pub warnings: Vec<ComplianceWarning>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default)]
    pub required_skills: RequiredSkills,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse<'a> {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub required_skills: &'a [String],
    pub entities: &'a EntityRecord,
    pub match_result: MatchResult<'a>,
    pub ats_warnings: &'a [ComplianceWarning],
    /// Markdown rendering of `entities`.
    pub summary: String,
}

impl<'a> AnalyzeResponse<'a> {
    pub fn new(report: &'a AnalysisReport) -> Self {
        Self {
            analysis_id: report.analysis_id,
            analyzed_at: report.analyzed_at,
            required_skills: &report.required_skills,
            entities: &report.entities,
            match_result: report.match_result(),
            ats_warnings: &report.ats_warnings,
            summary: render_entity_summary(&report.entities),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/skills
/// Lists the recognised skills with the spellings matched for each.
pub async fn handle_list_skills(State(state): State<AppState>) -> Json<Vec<LexiconSkill>> {
    let skills = state
        .analyzer
        .extractor()
        .lexicon()
        .entries()
        .iter()
        .map(|entry| LexiconSkill {
            skill: entry.canonical().to_string(),
            variations: entry.variations().to_vec(),
        })
        .collect();
    Json(skills)
}

/// POST /api/v1/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<EntityRecord>, AppError> {
    let analyzer = state.analyzer.clone();
    let record =
        tokio::task::spawn_blocking(move || analyzer.extractor().extract(&req.text)).await??;
    Ok(Json(record))
}

/// POST /api/v1/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Response, AppError> {
    let required = req.required_skills.resolve(&state.config.default_required_skills);
    let analyzer = state.analyzer.clone();
    let response = tokio::task::spawn_blocking(move || {
        let record = EntityRecord {
            skills: req.resume_skills,
            certifications: req.certifications,
            achievements: req.achievements,
            ..EntityRecord::default()
        };
        let result = analyzer
            .matcher()
            .score(&record, &required, req.raw_text.as_deref());
        Json(result).into_response()
    })
    .await?;

    Ok(response)
}

/// POST /api/v1/compliance
pub async fn handle_compliance(Json(req): Json<TextRequest>) -> Json<ComplianceResponse> {
    Json(ComplianceResponse {
        word_count: req.text.split_whitespace().count(),
        warnings: check_ats_compliance(&req.text),
    })
}

/// POST /api/v1/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Response, AppError> {
    let report = run_analysis(&state, req).await?;
    Ok(Json(AnalyzeResponse::new(&report)).into_response())
}

/// POST /api/v1/report
/// Same input as `/analyze`; responds with the plain-text report.
pub async fn handle_report(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let report = run_analysis(&state, req).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_text_report(&report),
    ))
}

/// POST /api/v1/analyze/upload
/// Multipart fields: `file` (PDF, DOCX or plain text), `required_skills` (comma-separated, optional).
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut document: Option<(DocumentKind, String, Vec<u8>)> = None;
    let mut required_skills = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let kind = DocumentKind::detect(field.file_name(), field.content_type())?;
                let bytes = field.bytes().await.map_err(multipart_error)?;
                document = Some((kind, file_name, bytes.to_vec()));
            }
            Some("required_skills") => {
                let raw = field.text().await.map_err(multipart_error)?;
                required_skills = parse_required_skills(&raw);
            }
            _ => {}
        }
    }

    let (kind, file_name, bytes) = document
        .ok_or_else(|| AppError::Validation("Multipart field 'file' is required".to_string()))?;
    info!("Received upload '{file_name}' ({} bytes, {kind:?})", bytes.len());

    let text = tokio::task::spawn_blocking(move || extract_text(kind, bytes)).await??;
    let req = AnalyzeRequest {
        text,
        required_skills: RequiredSkills::List(required_skills),
    };
    let report = run_analysis(&state, req).await?;
    Ok(Json(AnalyzeResponse::new(&report)).into_response())
}

async fn run_analysis(state: &AppState, req: AnalyzeRequest) -> Result<AnalysisReport, AppError> {
    let required = req.required_skills.resolve(&state.config.default_required_skills);
    let analyzer = state.analyzer.clone();
    let report =
        tokio::task::spawn_blocking(move || analyzer.analyze(&req.text, &required)).await??;
    Ok(report)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(err.body_text())
    }
}
