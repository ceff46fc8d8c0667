//! Scripted `ModelService` for pipeline and handler tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{LlmError, ModelService};

/// Replays canned replies in order and records every prompt it receives.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queues a transport failure after the already-scripted replies.
    pub fn then_fail(self, error: LlmError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelService for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

pub const RESUME_REPLY: &str = r#"```json
{
  "name": "Jane Doe",
  "skills": ["Rust", "PostgreSQL", "Kubernetes"],
  "education": [{"institution": "MIT", "degree": "BSc Computer Science", "duration": "2012-2016"}],
  "experience": [{
    "company": "Acme",
    "role": "Backend Engineer",
    "duration": "2016-2024",
    "description": "Built payment services in Rust"
  }],
  "certifications": [{"name": "CKA", "issuing_organization": "CNCF"}],
  "projects": [{"name": "tinykv", "description": "Embedded key-value store"}]
}
```"#;

pub const JD_REPLY: &str = r#"{'required_skills': ['Rust', 'Kafka'], 'experience': '5+ years', 'industry': 'Fintech', 'key_responsibilities': ['Own the ledger service', 'Mentor engineers']}"#;

pub const COMPARISON_REPLY: &str = r#"json
{"skill_match": "Strong on Rust, missing Kafka", "experience_match": "8 years exceeds 5", "overall_fit": "Good",}"#;

pub const SCORE_REPLY: &str = r#"{"score": "8", "reason": "Solid backend background, one gap"}"#;

pub const SUGGESTIONS_REPLY: &str = r#"["Mention Kafka exposure", "Quantify payment volume", "Lead with the ledger work"]"#;

/// Five well-formed replies in pipeline order.
pub fn happy_path() -> ScriptedModel {
    ScriptedModel::new([
        RESUME_REPLY,
        JD_REPLY,
        COMPARISON_REPLY,
        SCORE_REPLY,
        SUGGESTIONS_REPLY,
    ])
}
