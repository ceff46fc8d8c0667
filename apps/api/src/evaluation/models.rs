//! Typed records produced by the evaluation pipeline, plus the in-band error value
//! that stands in for any record the model failed to produce.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Resume
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub role: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub issuing_organization: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
}

/// Structured details extracted from resume text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub name: String,
    pub skills: Vec<String>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub certifications: Vec<Certification>,
    pub projects: Vec<Project>,
}

// ────────────────────────────────────────────────────────────────────────────
// Job description, comparison, score, suggestions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JdAnalysis {
    pub required_skills: Vec<String>,
    pub experience: String,
    pub industry: String,
    pub key_responsibilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub skill_match: String,
    pub experience_match: String,
    pub overall_fit: String,
}

/// Candidate rating. The 0–10 range is requested in the prompt but not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    #[serde(deserialize_with = "deserialize_lenient_int")]
    pub score: i64,
    pub reason: String,
}

/// Improvement suggestions. Three are requested; the count is not enforced.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct SuggestionList(pub Vec<String>);

impl SuggestionList {
    /// Coerces a decoded JSON value into a suggestion list.
    /// Non-string items are kept as their compact JSON rendering.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(Self(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            )),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

/// Accepts `7`, `7.0` or `"7"`.
fn deserialize_lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| {
                        f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64
                    })
                    .map(|f| f as i64)
            })
            .ok_or_else(|| de::Error::custom(format!("expected an integer, got {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("expected an integer, got \"{s}\""))),
        other => Err(de::Error::custom(format!("expected an integer, got {other}"))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-band error value
// ────────────────────────────────────────────────────────────────────────────

/// A step whose model output could not be decoded or coerced.
/// Carries the diagnostic and the untouched model text for display.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{diagnostic}")]
pub struct StepFailure {
    #[serde(rename = "error")]
    pub diagnostic: String,
    pub raw: String,
}

impl StepFailure {
    pub fn new(diagnostic: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            diagnostic: diagnostic.into(),
            raw: raw.into(),
        }
    }
}

/// Outcome of a single pipeline step: the record, or the in-band failure.
pub type StepOutput<T> = Result<T, StepFailure>;

/// Renders a prior step's outcome for embedding into a later prompt.
pub fn prompt_context<T: Serialize>(output: &StepOutput<T>) -> String {
    match output {
        Ok(record) => serde_json::to_string_pretty(record).unwrap_or_default(),
        Err(failure) => serde_json::to_string_pretty(failure).unwrap_or_default(),
    }
}

/// Serializes a `StepOutput` as `{"status": "ok", "value": …}` or
/// `{"status": "error", "error": …, "raw": …}`.
pub mod step_output {
    use super::*;

    #[derive(Serialize)]
    #[serde(tag = "status", rename_all = "snake_case")]
    enum Tagged<'a, T> {
        Ok { value: &'a T },
        Error { error: &'a str, raw: &'a str },
    }

    pub fn serialize<T, S>(output: &StepOutput<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        let tagged = match output {
            Ok(value) => Tagged::Ok { value },
            Err(failure) => Tagged::Error {
                error: &failure.diagnostic,
                raw: &failure.raw,
            },
        };
        tagged.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resume_deserializes_full_shape() {
        let value = json!({
            "name": "Ada Lovelace",
            "skills": ["Rust", "Analytical engines"],
            "education": [{"institution": "Home", "degree": "Mathematics", "duration": "1830-1835"}],
            "experience": [{
                "company": "Babbage & Co",
                "role": "Programmer",
                "duration": "1842-1843",
                "description": "Wrote the first published algorithm"
            }],
            "certifications": [{"name": "Royal Society", "issuing_organization": "RS"}],
            "projects": [{"name": "Note G", "description": "Bernoulli numbers"}]
        });
        let resume: Resume = serde_json::from_value(value).unwrap();
        assert_eq!(resume.name, "Ada Lovelace");
        assert_eq!(resume.skills.len(), 2);
        assert_eq!(resume.certifications[0].issuing_organization, "RS");
    }

    #[test]
    fn test_resume_missing_field_is_rejected() {
        let value = json!({"name": "Ada", "skills": []});
        let err = serde_json::from_value::<Resume>(value).unwrap_err();
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_score_accepts_integer_float_and_string() {
        for raw in [json!(7), json!(7.0), json!("7"), json!(" 7 ")] {
            let score: ScoreResult =
                serde_json::from_value(json!({"score": raw, "reason": "ok"})).unwrap();
            assert_eq!(score.score, 7);
        }
    }

    #[test]
    fn test_score_range_not_enforced() {
        let score: ScoreResult =
            serde_json::from_value(json!({"score": 42, "reason": "generous"})).unwrap();
        assert_eq!(score.score, 42);
    }

    #[test]
    fn test_score_rejects_fraction_and_text() {
        assert!(serde_json::from_value::<ScoreResult>(json!({"score": 7.5, "reason": ""})).is_err());
        assert!(
            serde_json::from_value::<ScoreResult>(json!({"score": "seven", "reason": ""})).is_err()
        );
        assert!(serde_json::from_value::<ScoreResult>(json!({"score": null, "reason": ""})).is_err());
    }

    #[test]
    fn test_score_rejects_float_outside_integer_range() {
        for raw in [json!(1e20), json!(-1e20), json!(9.3e18)] {
            let err = serde_json::from_value::<ScoreResult>(json!({"score": raw, "reason": ""}))
                .unwrap_err();
            assert!(err.to_string().contains("expected an integer"));
        }
    }

    #[test]
    fn test_suggestion_list_requires_array() {
        assert!(SuggestionList::from_value(json!({"a": 1})).is_none());
        assert!(SuggestionList::from_value(json!("one")).is_none());

        let list = SuggestionList::from_value(json!(["Add metrics", {"tip": "x"}, 3])).unwrap();
        assert_eq!(list.0, vec!["Add metrics", r#"{"tip":"x"}"#, "3"]);
    }

    #[test]
    fn test_prompt_context_renders_failure_with_error_and_raw() {
        let output: StepOutput<ComparisonResult> =
            Err(StepFailure::new("Failed to parse ComparisonResult", "garbage"));
        let rendered = prompt_context(&output);
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["error"], "Failed to parse ComparisonResult");
        assert_eq!(value["raw"], "garbage");
    }

    #[test]
    fn test_prompt_context_renders_record_as_json() {
        let output: StepOutput<ComparisonResult> = Ok(ComparisonResult {
            skill_match: "high".to_string(),
            experience_match: "medium".to_string(),
            overall_fit: "good".to_string(),
        });
        let value: Value = serde_json::from_str(&prompt_context(&output)).unwrap();
        assert_eq!(value["overall_fit"], "good");
    }

    #[test]
    fn test_step_output_serializes_tagged() {
        #[derive(Serialize)]
        struct Wrapper {
            #[serde(with = "step_output")]
            out: StepOutput<SuggestionList>,
        }

        let ok = serde_json::to_value(Wrapper {
            out: Ok(SuggestionList(vec!["a".to_string()])),
        })
        .unwrap();
        assert_eq!(ok["out"], json!({"status": "ok", "value": ["a"]}));

        let err = serde_json::to_value(Wrapper {
            out: Err(StepFailure::new("Suggestions not a list", "{}")),
        })
        .unwrap();
        assert_eq!(
            err["out"],
            json!({"status": "error", "error": "Suggestions not a list", "raw": "{}"})
        );
    }
}
