// Resume evaluation: five LLM steps run in fixed order.
// All model calls go through llm_client::ModelService; no direct HTTP here.

pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod steps;

#[cfg(test)]
pub mod testing;
