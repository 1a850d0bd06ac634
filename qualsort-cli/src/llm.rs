/// OpenAI-compatible API client implementing the core `Judge` trait.
use async_trait::async_trait;
use qualsort_core::{ComparisonResult, Judge, JudgeError, Verdict};
use reqwest::Client;
use serde::Serialize;

use crate::prompt::build_prompt;

/// Configuration for the LLM endpoint.
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

/// Pairwise judge backed by any OpenAI-compatible chat-completions API.
///
/// Retries up to `max_retries` times with a 1-second delay on transport
/// errors. Unparseable verdicts are not retried; they surface as
/// `JudgeError::InvalidResponse` and become error rounds upstream.
pub struct HttpJudge {
    client: Client,
    config: LlmConfig,
    max_retries: usize,
}

impl HttpJudge {
    pub fn new(config: LlmConfig, max_retries: usize) -> Self {
        HttpJudge {
            client: Client::new(),
            config,
            max_retries,
        }
    }

    /// Send one request; returns the assistant text plus the raw response
    /// body for diagnostics.
    async fn send(&self, prompt: &str) -> Result<(String, serde_json::Value), JudgeError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: self.config.temperature,
            max_tokens: 2000,
        };

        let url = format!(
            "{}/v1/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );

        let mut req_builder = self.client.post(&url).json(&request);
        if let Some(ref key) = self.config.api_key {
            req_builder = req_builder.bearer_auth(key);
        }

        let resp = req_builder
            .send()
            .await
            .map_err(|e| JudgeError::Transport(format!("HTTP request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(JudgeError::Transport(format!(
                "LLM API returned {status}: {}",
                &body[..body.len().min(200)]
            )));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| JudgeError::Transport(format!("failed to parse response JSON: {e}")))?;

        let content = body
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| JudgeError::InvalidResponse("no message content in response".to_string()))?
            .to_string();

        Ok((content, body))
    }
}

#[async_trait]
impl Judge for HttpJudge {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn compare(
        &self,
        first: &str,
        second: &str,
        criteria: &str,
    ) -> Result<ComparisonResult, JudgeError> {
        let prompt = build_prompt(criteria, first, second);

        let mut last_err = JudgeError::Transport("request not attempted".to_string());
        for attempt in 0..=self.max_retries {
            match self.send(&prompt).await {
                Ok((content, raw)) => {
                    let winner = parse_verdict(&content)?;
                    return Ok(ComparisonResult {
                        winner,
                        reasoning: content,
                        raw: Some(raw),
                    });
                }
                Err(e @ JudgeError::Transport(_)) => {
                    last_err = e;
                    if attempt < self.max_retries {
                        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err)
    }
}

/// Extract the verdict following the last "Verdict" marker in the response.
/// `A` and `B` are relative winners, `DRAW` maps to no winner.
fn parse_verdict(content: &str) -> Result<Option<Verdict>, JudgeError> {
    let pos = content
        .rfind("Verdict")
        .or_else(|| content.rfind("verdict"))
        .ok_or_else(|| JudgeError::InvalidResponse("no Verdict marker in response".to_string()))?;

    let tail = &content[pos + "Verdict".len()..];
    let token: String = tail
        .chars()
        .skip_while(|c| *c == ':' || c.is_whitespace())
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    match token.to_ascii_uppercase().as_str() {
        "A" => Ok(Some(Verdict::A)),
        "B" => Ok(Some(Verdict::B)),
        "DRAW" => Ok(None),
        other => Err(JudgeError::InvalidResponse(format!(
            "unrecognized verdict token {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verdict_tokens() {
        assert_eq!(parse_verdict("analysis...\nVerdict: A").unwrap(), Some(Verdict::A));
        assert_eq!(parse_verdict("analysis...\nVerdict: B").unwrap(), Some(Verdict::B));
        assert_eq!(parse_verdict("analysis...\nVerdict: DRAW").unwrap(), None);
    }

    #[test]
    fn test_parse_verdict_on_following_line() {
        assert_eq!(parse_verdict("text\nVerdict:\nA").unwrap(), Some(Verdict::A));
    }

    #[test]
    fn test_parse_verdict_uses_last_marker() {
        let content = "I will end with Verdict: A as instructed.\n\nVerdict: B";
        assert_eq!(parse_verdict(content).unwrap(), Some(Verdict::B));
    }

    #[test]
    fn test_parse_verdict_is_case_tolerant() {
        assert_eq!(parse_verdict("verdict: draw").unwrap(), None);
        assert_eq!(parse_verdict("Verdict: b").unwrap(), Some(Verdict::B));
    }

    #[test]
    fn test_parse_verdict_rejects_missing_marker() {
        assert!(matches!(
            parse_verdict("no conclusion here"),
            Err(JudgeError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_verdict_rejects_unknown_token() {
        assert!(matches!(
            parse_verdict("Verdict: C"),
            Err(JudgeError::InvalidResponse(_))
        ));
    }
}
