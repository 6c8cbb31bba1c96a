use futures_util::StreamExt;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{PlannerError, Result};
use crate::services::prompt::PromptPair;

/// Generation temperature, fixed across all requests.
pub const TEMPERATURE: f64 = 0.7;

#[derive(Clone, Debug)]
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIClient {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            api_key,
            base_url,
            model,
        }
    }

    /// Drive a streaming chat completion. Every delta token is forwarded to
    /// `on_token` as it arrives and appended to an accumulator; the full text
    /// is returned exactly once when the stream finishes cleanly. A transport
    /// drop mid-stream surfaces `StreamFailed`, never partial text.
    pub async fn stream_chat_completion(
        &self,
        prompt: &PromptPair,
        mut on_token: impl FnMut(&str),
    ) -> Result<String> {
        let client = reqwest::Client::new();
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user }
            ],
            "temperature": TEMPERATURE,
            "stream": true,
        });

        let response = client
            .post(build_chat_url(&self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| PlannerError::Upstream(format!("HTTP request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(upstream_error(status, response.text().await.ok()));
        }

        let mut byte_stream = response.bytes_stream();
        let mut line_buffer: Vec<u8> = Vec::new();
        let mut accumulated = String::new();
        let mut saw_done = false;

        while let Some(chunk) = byte_stream.next().await {
            let chunk = chunk.map_err(|err| {
                PlannerError::StreamFailed(format!("connection dropped mid-stream: {err}"))
            })?;
            line_buffer.extend_from_slice(&chunk);

            while let Some(pos) = line_buffer.iter().position(|&b| b == b'\n') {
                let line_bytes: Vec<u8> = line_buffer.drain(..=pos).collect();
                let line = String::from_utf8(line_bytes).map_err(|err| {
                    PlannerError::StreamFailed(format!("invalid UTF-8 in stream: {err}"))
                })?;

                match process_sse_line(line.trim_end_matches(['\r', '\n']))? {
                    SseEvent::Token(token) => {
                        on_token(&token);
                        accumulated.push_str(&token);
                    }
                    SseEvent::Done => saw_done = true,
                    SseEvent::Skip => {}
                }
            }

            if saw_done {
                break;
            }
        }

        // A stream that ends before the completion event may have dropped
        // tokens; partial text must never flow onward as a completion.
        if !saw_done {
            return Err(PlannerError::StreamFailed(
                "stream ended before the completion event".to_string(),
            ));
        }

        debug!(
            target: "trip_planner::stream",
            chars = accumulated.len(),
            "completion stream finished"
        );

        Ok(accumulated)
    }
}

#[derive(Debug)]
enum SseEvent {
    Token(String),
    Done,
    Skip,
}

#[derive(Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Deserialize, Default)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

fn process_sse_line(line: &str) -> Result<SseEvent> {
    if line.is_empty() || line.starts_with(':') {
        return Ok(SseEvent::Skip);
    }

    let Some(rest) = line.strip_prefix("data:") else {
        // Other SSE fields (event, id, retry) carry no tokens
        return Ok(SseEvent::Skip);
    };

    let data = rest.trim_start();
    if data == "[DONE]" {
        return Ok(SseEvent::Done);
    }

    let chunk: ChatChunk = serde_json::from_str(data).map_err(|err| {
        PlannerError::StreamFailed(format!("unreadable stream event: {err}"))
    })?;

    let token = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .unwrap_or_default();

    if token.is_empty() {
        Ok(SseEvent::Skip)
    } else {
        Ok(SseEvent::Token(token))
    }
}

fn upstream_error(status: StatusCode, body: Option<String>) -> PlannerError {
    let message = body
        .as_deref()
        .and_then(|text| serde_json::from_str::<Value>(text).ok())
        .and_then(|value| {
            value
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(|msg| msg.as_str())
                .map(|s| s.to_string())
        })
        .or(body)
        .unwrap_or_default();

    PlannerError::Upstream(format!("HTTP {} error: {}", status, message))
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_is_not_doubled() {
        assert_eq!(
            build_chat_url("https://api.example.com/v1/chat/completions/"),
            "https://api.example.com/v1/chat/completions"
        );
        assert_eq!(
            build_chat_url("https://api.example.com/v1"),
            "https://api.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn data_line_yields_token() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hel"}}]}"#;
        match process_sse_line(line).unwrap() {
            SseEvent::Token(token) => assert_eq!(token, "Hel"),
            _ => panic!("expected a token"),
        }
    }

    #[test]
    fn done_marker_ends_stream() {
        assert!(matches!(
            process_sse_line("data: [DONE]").unwrap(),
            SseEvent::Done
        ));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        assert!(matches!(process_sse_line("").unwrap(), SseEvent::Skip));
        assert!(matches!(
            process_sse_line(": keep-alive").unwrap(),
            SseEvent::Skip
        ));
        assert!(matches!(
            process_sse_line("event: message").unwrap(),
            SseEvent::Skip
        ));
    }

    #[test]
    fn garbage_data_is_a_stream_failure() {
        let err = process_sse_line("data: {not json}").unwrap_err();
        assert_eq!(err.error_code(), "STREAM_FAILED");
    }
}
