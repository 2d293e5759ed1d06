use anyhow::{Context, Result};

use crate::analysis::parse_required_skills;

const DEFAULT_REQUIRED_SKILLS: &str = "python, machine learning, sql, html, css, javascript";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Request body limit for uploads and JSON payloads.
    pub max_upload_bytes: usize,
    /// Used when a request leaves its required-skill field blank.
    pub default_required_skills: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let default_required_skills = parse_required_skills(
            &std::env::var("DEFAULT_REQUIRED_SKILLS")
                .unwrap_or_else(|_| DEFAULT_REQUIRED_SKILLS.to_string()),
        );

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            default_required_skills,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            default_required_skills: parse_required_skills(DEFAULT_REQUIRED_SKILLS),
        }
    }
}
