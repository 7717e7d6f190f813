//! Prompt templates for the fact-checking flows.
//!
//! Each request type carries its template and the JSON shape the model must
//! answer with. Templates are rendered with minijinja in strict mode, so a
//! missing variable is an error rather than an empty string.

use minijinja::{Environment, UndefinedBehavior};
use serde::{Deserialize, Serialize};
use sleuth_core::claim::Claim;
use sleuth_core::error::{Result, SleuthError};
use std::sync::LazyLock;

static ENV: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
});

/// A typed prompt: serializable context plus a template.
pub trait PromptTemplate: Serialize {
    /// Name used in logs and error messages.
    const NAME: &'static str;
    const TEMPLATE: &'static str;

    fn to_prompt(&self) -> Result<String> {
        ENV.render_str(Self::TEMPLATE, self).map_err(|e| {
            SleuthError::internal(format!("Failed to render {} prompt: {}", Self::NAME, e))
        })
    }
}

/// Shared system instruction for every flow.
pub const SYSTEM_INSTRUCTION: &str = "You are a careful fact-checking assistant. \
You answer strictly with a single JSON object in the requested shape.";

pub const FACT_CHECK_SCHEMA: &str = r#"{
  "articles": [
    "string - summary of one relevant article or fact-check, naming its publisher"
  ]
}"#;

pub const ASSESSMENT_SCHEMA: &str = r#"{
  "accuracyScore": "number between 0 and 1 (0 = completely inaccurate, 1 = completely accurate)",
  "explanation": "string - why the claim received this score",
  "sources": ["string - URL of a source used in the assessment"]
}"#;

pub const INITIAL_CLAIM_SCHEMA: &str = r#"{
  "claim": "string - one short claim"
}"#;

/// Asks for articles and fact-checks related to a claim.
#[derive(Debug, Clone, Serialize)]
pub struct FactCheckPrompt<'a> {
    pub claim: &'a str,
    pub output_schema: &'static str,
}

impl<'a> FactCheckPrompt<'a> {
    pub fn new(claim: &'a Claim) -> Self {
        Self {
            claim: claim.as_str(),
            output_schema: FACT_CHECK_SCHEMA,
        }
    }
}

impl PromptTemplate for FactCheckPrompt<'_> {
    const NAME: &'static str = "fact_check";
    const TEMPLATE: &'static str = r#"You are an AI assistant that retrieves relevant articles and fact-checks related to a claim.

Claim: {{ claim }}

Please provide a list of relevant articles and fact-checks.
Summarize each one in a sentence or two. Return an empty list if you know of none.

Output a JSON object matching this schema:
{{ output_schema }}

IMPORTANT: Output ONLY valid JSON, no markdown formatting or code blocks."#;
}

/// Asks for an accuracy score of a claim against an evidence blob.
#[derive(Debug, Clone, Serialize)]
pub struct AssessAccuracyPrompt<'a> {
    pub claim: &'a str,
    pub evidence: &'a str,
    pub output_schema: &'static str,
}

impl<'a> AssessAccuracyPrompt<'a> {
    pub fn new(claim: &'a Claim, evidence: &'a str) -> Self {
        Self {
            claim: claim.as_str(),
            evidence,
            output_schema: ASSESSMENT_SCHEMA,
        }
    }
}

impl PromptTemplate for AssessAccuracyPrompt<'_> {
    const NAME: &'static str = "assess_accuracy";
    const TEMPLATE: &'static str = r#"You are an AI assistant that assesses the accuracy of a claim based on the provided evidence.

Provide an accuracy score between 0 and 1, where 0 is completely inaccurate and 1 is completely accurate.
Provide an explanation for the accuracy score.
List the sources used to assess the claim.

Claim: {{ claim }}
Evidence:
{% if evidence %}{{ evidence }}{% else %}(no evidence was found){% endif %}

Output a JSON object matching this schema:
{{ output_schema }}

IMPORTANT: Output ONLY valid JSON, no markdown formatting or code blocks."#;
}

/// Asks for a claim worth investigating.
#[derive(Debug, Clone, Serialize)]
pub struct InitialClaimPrompt {
    pub output_schema: &'static str,
}

impl Default for InitialClaimPrompt {
    fn default() -> Self {
        Self {
            output_schema: INITIAL_CLAIM_SCHEMA,
        }
    }
}

impl PromptTemplate for InitialClaimPrompt {
    const NAME: &'static str = "initial_claim";
    const TEMPLATE: &'static str = r#"Return a single controversial claim suitable for fact-checking.
The claim should be short, and it should be something that can be easily checked with online sources.
Make it interesting and something a user would want to investigate.

Output a JSON object matching this schema:
{{ output_schema }}

IMPORTANT: Output ONLY valid JSON, no markdown formatting or code blocks."#;
}

/// Answer shape of [`FactCheckPrompt`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FactCheckResponse {
    pub articles: Vec<String>,
}

/// Answer shape of [`InitialClaimPrompt`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InitialClaimResponse {
    pub claim: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_evidence_is_spelled_out() {
        let claim = Claim::parse("The moon is made of cheese").unwrap();
        let prompt = AssessAccuracyPrompt::new(&claim, "").to_prompt().unwrap();
        assert!(prompt.contains("(no evidence was found)"));
    }

    #[test]
    fn test_markup_in_claim_is_not_escaped() {
        let claim = Claim::parse("5 < 7 & \"quotes\" stay").unwrap();
        let prompt = FactCheckPrompt::new(&claim).to_prompt().unwrap();
        assert!(prompt.contains("Claim: 5 < 7 & \"quotes\" stay"));
    }
}
