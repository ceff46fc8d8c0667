//! The five pipeline steps. Each one builds its prompt, makes exactly one model
//! call and normalizes the reply. Decode and coercion failures come back in-band
//! as `StepFailure`; only transport errors surface as `Err(LlmError)`.

use tracing::{info, warn};

use crate::evaluation::models::{
    prompt_context, ComparisonResult, JdAnalysis, Resume, ScoreResult, StepOutput, SuggestionList,
};
use crate::evaluation::normalizer::{normalize, normalize_with};
use crate::evaluation::prompts::{
    fill_template, COMPARE_PROMPT, JD_ANALYZE_PROMPT, RESUME_EXTRACT_PROMPT, SCORE_PROMPT,
    SUGGESTIONS_PROMPT,
};
use crate::llm_client::{LlmError, ModelService};

/// Extracts a structured `Resume` from raw resume text.
pub async fn extract_resume(
    resume_text: &str,
    llm: &dyn ModelService,
) -> Result<StepOutput<Resume>, LlmError> {
    let prompt = fill_template(RESUME_EXTRACT_PROMPT, &[("resume_text", resume_text)]);
    let raw = llm.generate(&prompt).await?;
    Ok(logged("extract_resume", normalize(&raw, "Resume")))
}

/// Extracts required skills, experience, industry and responsibilities from a JD.
pub async fn analyze_jd(
    jd_text: &str,
    llm: &dyn ModelService,
) -> Result<StepOutput<JdAnalysis>, LlmError> {
    let prompt = fill_template(JD_ANALYZE_PROMPT, &[("jd_text", jd_text)]);
    let raw = llm.generate(&prompt).await?;
    Ok(logged("analyze_jd", normalize(&raw, "JDAnalysis")))
}

/// Compares the extracted resume with the analyzed JD.
/// Either input may be an error value; it is passed to the model as-is.
pub async fn compare(
    parsed_resume: &StepOutput<Resume>,
    analyzed_jd: &StepOutput<JdAnalysis>,
    llm: &dyn ModelService,
) -> Result<StepOutput<ComparisonResult>, LlmError> {
    let parsed_resume = prompt_context(parsed_resume);
    let analyzed_jd = prompt_context(analyzed_jd);
    let prompt = fill_template(
        COMPARE_PROMPT,
        &[
            ("parsed_resume", parsed_resume.as_str()),
            ("analyzed_jd", analyzed_jd.as_str()),
        ],
    );
    let raw = llm.generate(&prompt).await?;
    Ok(logged("compare", normalize(&raw, "ComparisonResult")))
}

/// Rates the candidate 0–10 from the comparison.
pub async fn score(
    comparison: &StepOutput<ComparisonResult>,
    llm: &dyn ModelService,
) -> Result<StepOutput<ScoreResult>, LlmError> {
    let comparison = prompt_context(comparison);
    let prompt = fill_template(SCORE_PROMPT, &[("comparison", comparison.as_str())]);
    let raw = llm.generate(&prompt).await?;
    Ok(logged("score", normalize(&raw, "ScoreResult")))
}

/// Asks for three ways to improve the resume against the raw input texts.
pub async fn suggest(
    resume_text: &str,
    jd_text: &str,
    llm: &dyn ModelService,
) -> Result<StepOutput<SuggestionList>, LlmError> {
    let prompt = fill_template(
        SUGGESTIONS_PROMPT,
        &[("resume_text", resume_text), ("jd_text", jd_text)],
    );
    let raw = llm.generate(&prompt).await?;
    let output = normalize_with(&raw, "suggestions", |value| {
        SuggestionList::from_value(value).ok_or_else(|| "Suggestions not a list".to_string())
    });
    Ok(logged("suggest", output))
}

fn logged<T>(step: &str, output: StepOutput<T>) -> StepOutput<T> {
    match &output {
        Ok(_) => info!(step, "step produced a structured record"),
        Err(failure) => warn!(
            step,
            diagnostic = %failure.diagnostic,
            raw_len = failure.raw.len(),
            "step produced an error value"
        ),
    }
    output
}
