use super::{NOTHING_TO_SUMMARIZE, SummaryOutput, SummaryProducer};
use crate::config::SummaryConfig;
use crate::errors::{AppError, AppResult};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader};
use std::time::Duration;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You turn a person's raw work-log lines into a short weekly report. \
Group related items, call out finished work and open threads, and keep it under 200 words. \
Answer in the language the log is written in.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamEvent {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Deserialize, Default)]
struct Delta {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// OpenAI-compatible `/chat/completions` client over blocking HTTP.
pub struct ChatCompletionProducer {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    stream: bool,
}

impl ChatCompletionProducer {
    pub fn from_config(cfg: &SummaryConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| AppError::Producer(format!("cannot build HTTP client: {e}")))?;

        let api_key = std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            warn!(var = %cfg.api_key_env, "no API key in environment, calling endpoint unauthenticated");
        }

        Ok(Self {
            client,
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            api_key,
            stream: cfg.stream,
        })
    }

    fn request_body(&self, entries: &[String], scope_label: &str) -> ChatRequest<'_> {
        let mut user = format!("Work log for {}:\n", scope_label);
        for line in entries {
            user.push_str("- ");
            user.push_str(line);
            user.push('\n');
        }

        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            stream: self.stream,
            temperature: 0.3,
        }
    }
}

impl SummaryProducer for ChatCompletionProducer {
    fn name(&self) -> &str {
        "openai"
    }

    fn summarize(&self, entries: &[String], scope_label: &str) -> AppResult<SummaryOutput> {
        if entries.is_empty() {
            return Ok(SummaryOutput::Complete(NOTHING_TO_SUMMARIZE.to_string()));
        }

        let url = format!("{}/chat/completions", self.endpoint);
        let mut req = self
            .client
            .post(&url)
            .json(&self.request_body(entries, scope_label));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        debug!(%url, model = %self.model, entries = entries.len(), stream = self.stream, "requesting summary");
        let resp = req
            .send()
            .map_err(|e| AppError::Producer(format!("request failed: {e}")))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::Producer(
                "rate limited by the summary service, try again later".into(),
            ));
        }
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(AppError::Producer(format!("HTTP {}: {}", status, body.trim())));
        }

        if self.stream {
            return Ok(SummaryOutput::Stream(Box::new(SseChunks::new(
                BufReader::new(resp),
            ))));
        }

        let parsed: ChatResponse = resp
            .json()
            .map_err(|e| AppError::Producer(format!("invalid response: {e}")))?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::Producer("empty completion".into()))?;

        Ok(SummaryOutput::Complete(text))
    }
}

/// Server-sent-events decoder for streamed chat completions: yields the
/// `delta.content` of each `data:` event until `[DONE]` or end of input.
pub struct SseChunks<R> {
    reader: R,
    done: bool,
}

impl<R: BufRead> SseChunks<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }

    fn fail(&mut self, msg: String) -> Option<AppResult<String>> {
        self.done = true;
        Some(Err(AppError::Producer(msg)))
    }
}

impl<R: BufRead> Iterator for SseChunks<R> {
    type Item = AppResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        while !self.done {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => self.done = true,
                Ok(_) => {}
                Err(e) => return self.fail(format!("stream interrupted: {e}")),
            }

            let Some(payload) = line.trim().strip_prefix("data:") else {
                continue;
            };
            let payload = payload.trim();
            if payload == "[DONE]" {
                self.done = true;
                break;
            }

            let event: StreamEvent = match serde_json::from_str(payload) {
                Ok(ev) => ev,
                Err(e) => return self.fail(format!("invalid stream event: {e}")),
            };
            if let Some(err) = event.error {
                return self.fail(err.message);
            }

            let text: String = event
                .choices
                .into_iter()
                .filter_map(|c| c.delta.content)
                .collect();
            if !text.is_empty() {
                return Some(Ok(text));
            }
        }
        None
    }
}
