//! Axum route handlers for the Evaluation API.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::evaluation::pipeline::{run_pipeline, EvaluationInput, PipelineState};
use crate::evaluation::report::render_markdown;
use crate::state::AppState;

/// POST /api/v1/evaluations
///
/// Runs the five-step evaluation and returns every output, records and error values alike.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(input): Json<EvaluationInput>,
) -> Result<Json<PipelineState>, AppError> {
    validate(&input)?;
    let result = run_pipeline(input, state.llm.as_ref()).await?;
    Ok(Json(result))
}

/// POST /api/v1/evaluations/report
///
/// Same as `handle_evaluate`, rendered as a Markdown report.
pub async fn handle_report(
    State(state): State<AppState>,
    Json(input): Json<EvaluationInput>,
) -> Result<impl IntoResponse, AppError> {
    validate(&input)?;
    let result = run_pipeline(input, state.llm.as_ref()).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        render_markdown(&result),
    ))
}

/// POST /api/v1/evaluations/upload
///
/// Multipart form: `resume` (PDF file) and `jd_text` (text).
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PipelineState>, AppError> {
    let mut resume_pdf = None;
    let mut jd_text = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("resume") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume: {e}")))?;
                resume_pdf = Some(bytes);
            }
            Some("jd_text") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read jd_text: {e}")))?;
                jd_text = Some(text);
            }
            _ => {}
        }
    }

    let resume_pdf = resume_pdf
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::Validation("resume PDF is required".to_string()))?;
    let jd_text = jd_text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("jd_text cannot be empty".to_string()))?;

    let resume_text = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&resume_pdf).map_err(|e| e.to_string())
    })
    .await
    .map_err(|_| AppError::UnprocessableEntity("Could not read the resume PDF".to_string()))?
    .map_err(|e| AppError::UnprocessableEntity(format!("Could not read the resume PDF: {e}")))?;

    if resume_text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Couldn't extract text from PDF".to_string(),
        ));
    }
    info!(chars = resume_text.len(), "extracted resume text from PDF");

    let input = EvaluationInput {
        resume_text,
        jd_text,
    };
    let result = run_pipeline(input, state.llm.as_ref()).await?;
    Ok(Json(result))
}

fn validate(input: &EvaluationInput) -> Result<(), AppError> {
    if input.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    if input.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }
    Ok(())
}
