//! Thin LLM agent layer — a role/goal/backstory prompt around one chat turn.
//!
//! The transport is [`genai`], so planner, scraper and extractor can each run
//! on a different provider purely by model name. Transient provider errors
//! are retried with a linear backoff.

use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use genai::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{Error, Result};

const MAX_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY_SECS: u64 = 5;

/// An LLM-backed agent with a fixed persona and model.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Short description of who the agent is ("an expert web interaction planner").
    pub role: String,
    /// What the agent is asked to accomplish on every invocation.
    pub goal: String,
    /// Persona context that steers the model's behavior.
    pub backstory: String,
    /// Model name; the provider is inferred from it.
    pub model: String,
    /// Sampling temperature. The demo crews all run at 0.
    pub temperature: f64,
}

/// One completed agent invocation.
#[derive(Debug, Clone)]
pub struct AgentOutput {
    /// The raw response text.
    pub text: String,
    /// Provider-reported token usage for the call.
    pub usage: TokenUsage,
}

/// Token usage for a single LLM call, as reported by the provider.
#[derive(Debug, Clone, Serialize)]
pub struct TokenUsage {
    pub model: String,
    #[serde(flatten)]
    pub tokens: genai::chat::Usage,
}

impl Agent {
    fn system_prompt(&self) -> String {
        format!(
            "You are {role}. {backstory}\n\nYour goal: {goal}",
            role = self.role,
            backstory = self.backstory,
            goal = self.goal
        )
    }

    /// Run one chat turn against the agent's model.
    pub async fn execute(&self, client: &Client, input: &str) -> Result<AgentOutput> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(self.system_prompt()),
            ChatMessage::user(input),
        ]);
        let options = ChatOptions::default().with_temperature(self.temperature);

        let mut last_err = None;
        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                let wait = RETRY_BASE_DELAY_SECS * u64::from(attempt);
                warn!("{}: retrying in {}s (attempt {})", self.role, wait, attempt);
                tokio::time::sleep(std::time::Duration::from_secs(wait)).await;
            }

            match client
                .exec_chat(&self.model, request.clone(), Some(&options))
                .await
            {
                Ok(response) => {
                    let text = response
                        .content_text_as_str()
                        .ok_or_else(|| {
                            Error::BadAgentOutput(format!("{}: empty response", self.role))
                        })?
                        .to_string();
                    debug!("{}: {} chars from {}", self.role, text.len(), self.model);
                    return Ok(AgentOutput {
                        text,
                        usage: TokenUsage {
                            model: self.model.clone(),
                            tokens: response.usage,
                        },
                    });
                }
                Err(e) => {
                    warn!("{}: llm call failed: {}", self.role, e);
                    last_err = Some(e);
                }
            }
        }

        Err(Error::Llm(last_err.expect("at least one attempt")))
    }
}

/// Pull a JSON value out of possibly-fenced LLM output.
pub fn extract_json(text: &str) -> Result<serde_json::Value> {
    let cleaned = if text.contains("```json") {
        text.split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(text)
    } else if text.contains("```") {
        text.split("```")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(text)
    } else {
        text
    };

    serde_json::from_str(cleaned.trim())
        .map_err(|e| Error::BadAgentOutput(format!("not valid JSON ({}): {}", e, text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_bare() {
        let v = extract_json(r#"{"id": 1}"#).unwrap();
        assert_eq!(v["id"], 1);
    }

    #[test]
    fn test_extract_json_fenced() {
        let v = extract_json("Sure!\n```json\n{\"id\": 2}\n```\nDone.").unwrap();
        assert_eq!(v["id"], 2);
    }

    #[test]
    fn test_extract_json_plain_fence() {
        let v = extract_json("```\n[1, 2, 3]\n```").unwrap();
        assert_eq!(v.as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_extract_json_garbage_errors() {
        let result = extract_json("I could not produce a plan, sorry.");
        assert!(matches!(result, Err(Error::BadAgentOutput(_))));
    }

    #[test]
    fn test_system_prompt_composition() {
        let agent = Agent {
            role: "a tester".into(),
            goal: "test things".into(),
            backstory: "You test.".into(),
            model: "gemini-1.5-flash".into(),
            temperature: 0.0,
        };
        let prompt = agent.system_prompt();
        assert!(prompt.starts_with("You are a tester."));
        assert!(prompt.contains("You test."));
        assert!(prompt.ends_with("Your goal: test things"));
    }

    #[test]
    fn test_token_usage_serializes_model_and_counts() {
        let usage = TokenUsage {
            model: "gemini-1.5-flash".into(),
            tokens: genai::chat::Usage::default(),
        };
        let v = serde_json::to_value(&usage).unwrap();
        assert_eq!(v["model"], "gemini-1.5-flash");
    }
}
