//! Markdown rendering of a finished evaluation.

use serde::Serialize;

use crate::evaluation::models::{StepFailure, StepOutput, SuggestionList};
use crate::evaluation::pipeline::PipelineState;

/// Renders every pipeline output as its own Markdown section.
pub fn render_markdown(state: &PipelineState) -> String {
    let sections = [
        ("Parsed Resume Info", render_record(&state.parsed_resume)),
        ("Job Description Analysis", render_record(&state.analyzed_jd)),
        ("Resume-JD Comparison", render_record(&state.comparison)),
        ("AI Fit Score", render_record(&state.score)),
        ("Improvement Suggestions", render_suggestions(&state.suggestions)),
    ];

    let mut out = format!("# Resume Evaluation\n\n_Run {}_\n", state.run_id);
    for (title, body) in sections {
        out.push_str(&format!("\n## {title}\n\n{body}\n"));
    }
    out
}

fn render_record<T: Serialize>(output: &StepOutput<T>) -> String {
    match output {
        Ok(record) => match serde_json::to_string_pretty(record) {
            Ok(json) => format!("```json\n{json}\n```"),
            Err(_) => "_No data_".to_string(),
        },
        Err(failure) => render_failure(failure),
    }
}

fn render_suggestions(output: &StepOutput<SuggestionList>) -> String {
    match output {
        Ok(list) if list.is_empty() => "_No suggestions_".to_string(),
        Ok(list) => list
            .iter()
            .map(|s| format!("- {s}"))
            .collect::<Vec<_>>()
            .join("\n"),
        Err(failure) => render_failure(failure),
    }
}

fn render_failure(failure: &StepFailure) -> String {
    format!(
        "**Error:** {}\n\n<details><summary>Raw Output</summary>\n<pre>{}</pre></details>",
        failure.diagnostic,
        escape_html(&failure.raw)
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
