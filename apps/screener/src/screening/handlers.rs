//! Axum route handlers for the Screening API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobInput;
use crate::models::result::ScoringResult;
use crate::models::resume::ResumeInput;
use crate::screening::{BatchResult, BatchScreeningRequest, ScreeningRequest};
use crate::state::AppState;

/// Words per page used for the page estimate of an uploaded PDF.
const WORDS_PER_PAGE: usize = 250;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfAnalysis {
    pub word_count: usize,
    pub character_count: usize,
    pub line_count: usize,
    pub estimated_pages: usize,
}

impl PdfAnalysis {
    pub fn from_text(text: &str) -> Self {
        let word_count = text.split_whitespace().count();
        Self {
            word_count,
            character_count: text.chars().count(),
            line_count: text.lines().count(),
            estimated_pages: (word_count / WORDS_PER_PAGE).max(1),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PdfScreeningResponse {
    pub scoring_result: ScoringResult,
    pub pdf_analysis: PdfAnalysis,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screen/resume
///
/// Scores one resume (raw text or structured) against one job.
pub async fn handle_screen_resume(
    State(state): State<AppState>,
    Json(request): Json<ScreeningRequest>,
) -> Result<Json<ScoringResult>, AppError> {
    let request_id = Uuid::new_v4();
    let as_of = request.as_of.unwrap_or_else(today);

    async move {
        info!(explain = request.explain, "Screening request received");
        let result = state.screener.screen(&request, as_of).await?;
        Ok::<_, AppError>(Json(result))
    }
    .instrument(info_span!("screen_resume", %request_id))
    .await
}

/// POST /api/v1/screen/batch
///
/// Scores many resumes against one job and ranks them. Explanations default to off.
pub async fn handle_screen_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchScreeningRequest>,
) -> Result<Json<BatchResult>, AppError> {
    let request_id = Uuid::new_v4();
    let as_of = request.as_of.unwrap_or_else(today);

    async move {
        info!(resumes = request.resumes.len(), "Batch screening request received");
        let result = state
            .screener
            .screen_batch(&request.resumes, &request.job, request.explain, as_of)
            .await?;
        Ok::<_, AppError>(Json(result))
    }
    .instrument(info_span!("screen_batch", %request_id))
    .await
}

/// Fields collected from the PDF screening form.
#[derive(Debug, Default)]
struct PdfForm {
    file_name: Option<String>,
    content_type: Option<String>,
    pdf: Option<Vec<u8>>,
    job_description: String,
    job_title: Option<String>,
    explain: bool,
}

async fn read_pdf_form(mut multipart: Multipart) -> Result<PdfForm, AppError> {
    let mut form = PdfForm {
        explain: true,
        ..Default::default()
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume_pdf" => {
                form.file_name = field.file_name().map(str::to_string);
                form.content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume_pdf: {e}")))?;
                form.pdf = Some(bytes.to_vec());
            }
            "job_description" | "job_title" | "explain" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))?;
                match name.as_str() {
                    "job_description" => form.job_description = value,
                    "job_title" => form.job_title = Some(value).filter(|t| !t.trim().is_empty()),
                    _ => {
                        form.explain = value.trim().parse::<bool>().map_err(|_| {
                            AppError::Validation(format!(
                                "explain must be 'true' or 'false', got '{value}'"
                            ))
                        })?
                    }
                }
            }
            _ => {} // unknown fields are ignored
        }
    }

    Ok(form)
}

fn is_pdf(form: &PdfForm, bytes: &[u8]) -> bool {
    let named_pdf = form
        .file_name
        .as_deref()
        .is_some_and(|n| n.to_ascii_lowercase().ends_with(".pdf"));
    let typed_pdf = form.content_type.as_deref() == Some("application/pdf");
    (named_pdf || typed_pdf) && bytes.starts_with(b"%PDF")
}

/// POST /api/v1/screen/pdf
///
/// Multipart form: `resume_pdf` (file), `job_description` (text), optional
/// `job_title` and `explain`. The PDF's text is screened as a raw-text resume.
pub async fn handle_screen_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PdfScreeningResponse>, AppError> {
    let request_id = Uuid::new_v4();

    async move {
        let mut form = read_pdf_form(multipart).await?;
        let bytes = form
            .pdf
            .take()
            .ok_or_else(|| AppError::Validation("resume_pdf file is required".to_string()))?;
        if !is_pdf(&form, &bytes) {
            return Err(AppError::Validation(
                "Only PDF files are supported".to_string(),
            ));
        }

        info!(
            file = form.file_name.as_deref().unwrap_or("<unnamed>"),
            bytes = bytes.len(),
            "PDF screening request received"
        );

        // pdf-extract can panic on malformed documents; that is a bad upload too.
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    AppError::UnprocessableEntity(
                        "Failed to extract text from PDF: malformed document".to_string(),
                    )
                } else {
                    AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}"))
                }
            })?
            .map_err(|e| {
                AppError::UnprocessableEntity(format!("Failed to extract text from PDF: {e}"))
            })?;

        if text.trim().is_empty() {
            return Err(AppError::UnprocessableEntity(
                "No text content found in the PDF".to_string(),
            ));
        }

        let pdf_analysis = PdfAnalysis::from_text(&text);
        let request = ScreeningRequest {
            resume: ResumeInput::RawText { text },
            job: JobInput::RawText {
                text: form.job_description,
                title: form.job_title,
            },
            explain: form.explain,
            as_of: None,
        };
        let scoring_result = state.screener.screen(&request, today()).await?;

        Ok::<_, AppError>(Json(PdfScreeningResponse {
            scoring_result,
            pdf_analysis,
        }))
    }
    .instrument(info_span!("screen_pdf", %request_id))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_analysis_counts() {
        let analysis = PdfAnalysis::from_text("Jane Doe\nData analyst\nPython SQL");
        assert_eq!(analysis.word_count, 6);
        assert_eq!(analysis.line_count, 3);
        assert_eq!(analysis.character_count, 32);
        assert_eq!(analysis.estimated_pages, 1);
    }

    #[test]
    fn test_pdf_analysis_page_estimate() {
        let text = "word ".repeat(760);
        assert_eq!(PdfAnalysis::from_text(&text).estimated_pages, 3);
    }

    #[test]
    fn test_pdf_detection_requires_magic_bytes() {
        let form = PdfForm {
            file_name: Some("Resume.PDF".to_string()),
            ..Default::default()
        };
        assert!(is_pdf(&form, b"%PDF-1.7 ..."));
        assert!(!is_pdf(&form, b"PK\x03\x04"));

        let docx = PdfForm {
            file_name: Some("resume.docx".to_string()),
            content_type: Some("application/octet-stream".to_string()),
            ..Default::default()
        };
        assert!(!is_pdf(&docx, b"%PDF-1.7"));
    }
}
