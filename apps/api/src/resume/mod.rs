//! Resume analysis: validates an uploaded PDF locally, then forwards it to
//! the resume analyzer as multipart field `resume`.
//!
//! Validation happens before any network call. Analyzer failures are shown to
//! the user; there is no mock analysis.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::api_client::{ApiClient, ApiError};

pub mod handlers;

pub const FIELD_NAME: &str = "resume";
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;
const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResumeValidationError {
    #[error("No resume file uploaded")]
    MissingFile,

    #[error("Only PDF files are allowed")]
    NotPdf,

    #[error("The uploaded file is empty")]
    Empty,

    #[error("File is too large ({size} bytes). Maximum size is 5 MB")]
    TooLarge { size: usize },

    #[error("Invalid upload: {0}")]
    Malformed(String),
}

/// A resume accepted by local validation.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub data: Bytes,
}

impl ResumeUpload {
    /// `application/pdf` content type, non-empty, at most 5 MB. The file name
    /// alone never makes an upload a PDF.
    pub fn validate(
        file_name: Option<&str>,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<Self, ResumeValidationError> {
        let file_name = file_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("resume.pdf")
            .to_string();

        let is_pdf = content_type.is_some_and(|ct| ct.trim().eq_ignore_ascii_case(PDF_MIME));
        if !is_pdf {
            return Err(ResumeValidationError::NotPdf);
        }
        if data.is_empty() {
            return Err(ResumeValidationError::Empty);
        }
        if data.len() > MAX_RESUME_BYTES {
            return Err(ResumeValidationError::TooLarge { size: data.len() });
        }

        Ok(Self { file_name, data })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryCareer {
    pub role: String,
    pub match_percentage: f64,
    pub confidence: String,
    pub confidence_message: String,
}

/// Analyzer report. `breakdown` and `skill_gap` are passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeAnalysis {
    pub overall_score: f64,
    pub ats_status: String,
    pub ats_message: String,
    pub breakdown: Value,
    pub skills: Vec<String>,
    pub keywords: Vec<String>,
    pub education: Vec<String>,
    pub projects: Vec<String>,
    pub experience: Vec<String>,
    pub primary_career: PrimaryCareer,
    pub alternate_roles: Vec<String>,
    pub skill_gap: Value,
    pub improvement_suggestions: Vec<String>,
}

pub async fn analyze(api: &ApiClient, upload: ResumeUpload) -> Result<ResumeAnalysis, ApiError> {
    info!(
        "Forwarding resume '{}' ({} bytes) for analysis",
        upload.file_name,
        upload.data.len()
    );

    let part = Part::bytes(upload.data.to_vec())
        .file_name(upload.file_name)
        .mime_str(PDF_MIME)?;
    let form = Form::new().part(FIELD_NAME, part);

    let analysis: ResumeAnalysis = api.post_multipart("resume/analyze", form).await?;
    info!(
        "Resume scored {:.0}/100 (primary role: {})",
        analysis.overall_score, analysis.primary_career.role
    );
    Ok(analysis)
}
