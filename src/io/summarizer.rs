use std::borrow::Borrow;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::config::SummaryConfig;
use crate::model::entry::{LogEntry, SummaryTemplate};
use crate::ops::prompt::{build_prompt_context, system_prompt};

#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("no logs selected")]
    NoLogs,
    #[error("no API key: set the {0} environment variable")]
    MissingKey(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API request failed ({status}): {message}")]
    Status { status: u16, message: String },
    #[error("could not decode API response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("the API returned an empty summary")]
    Empty,
}

/// Turns a prompt into report text
pub trait Summarizer {
    fn summarize(&self, prompt_context: &str, system_prompt: &str) -> Result<String, SummarizeError>;
}

/// Build the prompts for `logs` and ask `summarizer` for a report
pub fn summarize_logs<E: Borrow<LogEntry>>(
    summarizer: &dyn Summarizer,
    logs: &[E],
    template: Option<&SummaryTemplate>,
) -> Result<String, SummarizeError> {
    if logs.is_empty() {
        return Err(SummarizeError::NoLogs);
    }
    let context = build_prompt_context(logs);
    let system = system_prompt(template);
    log::info!(
        "requesting summary of {} log(s){}",
        logs.len(),
        template.map(|t| format!(" with template {:?}", t.name)).unwrap_or_default()
    );
    let summary = summarizer.summarize(&context, &system)?;
    if summary.trim().is_empty() {
        return Err(SummarizeError::Empty);
    }
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Chat-completions client
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// OpenAI-compatible chat-completions endpoint (DeepSeek by default)
pub struct ChatClient {
    http: reqwest::blocking::Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ChatClient {
    /// Build a client from `[summary]`, reading the key from the configured
    /// environment variable
    pub fn from_config(config: &SummaryConfig) -> Result<Self, SummarizeError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SummarizeError::MissingKey(config.api_key_env.clone()))?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(ChatClient {
            http,
            api_url: config.api_url.clone(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

impl Summarizer for ChatClient {
    fn summarize(&self, prompt_context: &str, system_prompt: &str) -> Result<String, SummarizeError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt_context,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(SummarizeError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        log::debug!("chat completion: {} bytes", body.len());
        completion_text(&body)
    }
}

/// First choice's message content
fn completion_text(body: &str) -> Result<String, SummarizeError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(SummarizeError::Empty)
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(e) => e.error.message,
        Err(_) if body.trim().is_empty() => "no details".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
