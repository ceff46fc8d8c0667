// All LLM prompt templates for the evaluation pipeline.
// Placeholders are `{name}` tokens substituted by `fill_template` before sending.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").unwrap());

/// Substitutes `{name}` placeholders in a single pass over `template`.
///
/// Substituted text is never rescanned, so a value containing `{jd_text}` stays
/// literal. Placeholders without a value are left untouched.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Resume extraction prompt. Replace `{resume_text}`.
pub const RESUME_EXTRACT_PROMPT: &str = r#"Extract structured details from the resume below and output as JSON in this format:
{
  'name': str,
  'skills': list[str],
  'education': list[{'institution': str, 'degree': str, 'duration': str}],
  'experience': list[{'company': str, 'role': str, 'duration': str, 'description': str}],
  'certifications': list[{'name': str, 'issuing_organization': str}],
  'projects': list[{'name': str, 'description': str}]
}
Resume:
{resume_text}
"#;

/// Job description analysis prompt. Replace `{jd_text}`.
pub const JD_ANALYZE_PROMPT: &str = r#"Analyze this job description and output as JSON in this format:
{
  'required_skills': list[str],
  'experience': str,
  'industry': str,
  'key_responsibilities': list[str]
}
JD:
{jd_text}
"#;

/// Resume vs JD comparison prompt. Replace `{parsed_resume}` and `{analyzed_jd}`.
pub const COMPARE_PROMPT: &str = r#"Compare this resume with the job description and output as JSON in this format:
{
  'skill_match': str,
  'experience_match': str,
  'overall_fit': str
}
Resume:
{parsed_resume}
Job Description:
{analyzed_jd}
"#;

/// Scoring prompt. Replace `{comparison}`.
pub const SCORE_PROMPT: &str = r#"Rate this candidate from 0 to 10 based on the following comparison and output as JSON:
{
  'score': int,
  'reason': str
}
Comparison:
{comparison}
"#;

/// Suggestion prompt. Replace `{resume_text}` and `{jd_text}`.
pub const SUGGESTIONS_PROMPT: &str = r#"Suggest 3 ways to improve the resume to better match this job. Output as JSON list of suggestions:
['suggestion1', 'suggestion2', 'suggestion3']
Resume:
{resume_text}
Job Description:
{jd_text}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_substitutes_every_placeholder() {
        let prompt = fill_template(
            SUGGESTIONS_PROMPT,
            &[("resume_text", "Jane Doe"), ("jd_text", "Rust role")],
        );
        assert!(prompt.contains("Resume:\nJane Doe\nJob Description:\nRust role\n"));
        assert!(!prompt.contains("{resume_text}"));
        assert!(!prompt.contains("{jd_text}"));
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let prompt = fill_template(
            "A={a} B={b}",
            &[("a", "literal {b} token"), ("b", "SECRET")],
        );
        assert_eq!(prompt, "A=literal {b} token B=SECRET");
    }

    #[test]
    fn test_fill_template_keeps_schema_braces_and_unknown_placeholders() {
        let prompt = fill_template(RESUME_EXTRACT_PROMPT, &[("resume_text", "cv")]);
        assert!(prompt.contains("'education': list[{'institution': str, 'degree': str, 'duration': str}]"));
        assert!(prompt.ends_with("Resume:\ncv\n"));

        assert_eq!(fill_template("{unknown} {x}", &[("x", "1")]), "{unknown} 1");
    }
}
