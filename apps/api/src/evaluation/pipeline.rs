//! Evaluation pipeline — runs the five steps in fixed order.
//!
//! Flow: extract_resume → analyze_jd → compare → score → suggest.
//!
//! Steps run one after another; no two model calls overlap. An in-band error
//! value from one step is forwarded to the next and never halts the run. A
//! transport failure aborts the run and is returned to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::evaluation::models::{
    step_output, ComparisonResult, JdAnalysis, Resume, ScoreResult, StepOutput, SuggestionList,
};
use crate::evaluation::steps::{analyze_jd, compare, extract_resume, score, suggest};
use crate::llm_client::{LlmError, ModelService};

/// Raw inputs to a single evaluation.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationInput {
    pub resume_text: String,
    pub jd_text: String,
}

/// Everything one pipeline run produced. Built only once all five steps have
/// completed, and discarded after the response is sent.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineState {
    pub run_id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    pub resume_text: String,
    pub jd_text: String,
    #[serde(with = "step_output")]
    pub parsed_resume: StepOutput<Resume>,
    #[serde(with = "step_output")]
    pub analyzed_jd: StepOutput<JdAnalysis>,
    #[serde(with = "step_output")]
    pub comparison: StepOutput<ComparisonResult>,
    #[serde(with = "step_output")]
    pub score: StepOutput<ScoreResult>,
    #[serde(with = "step_output")]
    pub suggestions: StepOutput<SuggestionList>,
}

impl PipelineState {
    /// Number of steps that produced an error value instead of a record.
    pub fn failed_steps(&self) -> usize {
        [
            self.parsed_resume.is_err(),
            self.analyzed_jd.is_err(),
            self.comparison.is_err(),
            self.score.is_err(),
            self.suggestions.is_err(),
        ]
        .into_iter()
        .filter(|failed| *failed)
        .count()
    }
}

/// Runs the full evaluation against `llm`.
pub async fn run_pipeline(
    input: EvaluationInput,
    llm: &dyn ModelService,
) -> Result<PipelineState, LlmError> {
    let run_id = Uuid::new_v4();
    let span = info_span!("evaluation", %run_id);

    async move {
        info!(
            resume_chars = input.resume_text.len(),
            jd_chars = input.jd_text.len(),
            "evaluation started"
        );

        let parsed_resume = extract_resume(&input.resume_text, llm).await?;
        let analyzed_jd = analyze_jd(&input.jd_text, llm).await?;
        let comparison = compare(&parsed_resume, &analyzed_jd, llm).await?;
        let score = score(&comparison, llm).await?;
        let suggestions = suggest(&input.resume_text, &input.jd_text, llm).await?;

        let state = PipelineState {
            run_id,
            evaluated_at: Utc::now(),
            resume_text: input.resume_text,
            jd_text: input.jd_text,
            parsed_resume,
            analyzed_jd,
            comparison,
            score,
            suggestions,
        };

        info!(failed_steps = state.failed_steps(), "evaluation finished");
        Ok::<_, LlmError>(state)
    }
    .instrument(span)
    .await
}
