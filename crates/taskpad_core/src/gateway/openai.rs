//! OpenAI chat-completions gateway.
//!
//! # Invariants
//! - Missing or blank API key short-circuits to the sentinel without I/O.
//! - Request timeout is disabled; the call blocks until the service answers.
//! - Prompt and response text are never logged.
//! - A blank answer from the service is returned as empty text; only failed
//!   or undecodable calls map to the sentinel.

use super::{RewriteGateway, FALLBACK_SENTINEL};
use log::{info, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default chat-completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 800;

/// Gateway configuration resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Credential; `None` disables real calls.
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Returns the key when present and non-blank.
    fn usable_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Blocking OpenAI-backed gateway.
pub struct OpenAiGateway {
    config: GatewayConfig,
    client: Option<Client>,
}

impl OpenAiGateway {
    /// Builds the gateway. The HTTP client is only built when a key is set.
    pub fn new(config: GatewayConfig) -> Self {
        let client = if config.usable_key().is_some() {
            match Client::builder().timeout(None::<Duration>).build() {
                Ok(client) => Some(client),
                Err(err) => {
                    warn!(
                        "event=gateway_init module=gateway status=error error_code=client_build_failed error={}",
                        err
                    );
                    None
                }
            }
        } else {
            None
        };

        info!(
            "event=gateway_init module=gateway status=ok enabled={} model={}",
            client.is_some(),
            config.model
        );
        Self { config, client }
    }

    /// Whether real calls will be attempted.
    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    fn call(&self, client: &Client, api_key: &str, prompt: &str, instruction: Option<&str>) -> Result<String, String> {
        let body = build_request(&self.config.model, prompt, instruction);
        let response = client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|err| format!("transport: {err}"))?;

        let status = response.status();
        let body_text = response
            .text()
            .map_err(|err| format!("read body: {err}"))?;
        if !status.is_success() {
            return Err(format!("http status {}", status.as_u16()));
        }

        extract_reply(&body_text).ok_or_else(|| "undecodable response".to_string())
    }
}

impl RewriteGateway for OpenAiGateway {
    fn rewrite(&self, prompt: &str, instruction: Option<&str>) -> String {
        let (Some(client), Some(api_key)) = (self.client.as_ref(), self.config.usable_key()) else {
            info!("event=gateway_call module=gateway status=skipped reason=no_credential");
            return FALLBACK_SENTINEL.to_string();
        };

        let started_at = Instant::now();
        match self.call(client, api_key, prompt, instruction) {
            Ok(reply) => {
                info!(
                    "event=gateway_call module=gateway status=ok duration_ms={} prompt_chars={} reply_chars={}",
                    started_at.elapsed().as_millis(),
                    prompt.chars().count(),
                    reply.chars().count()
                );
                reply
            }
            Err(err) => {
                warn!(
                    "event=gateway_call module=gateway status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                FALLBACK_SENTINEL.to_string()
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

fn build_request<'a>(model: &'a str, prompt: &'a str, instruction: Option<&'a str>) -> ChatRequest<'a> {
    let mut messages = Vec::with_capacity(2);
    if let Some(instruction) = instruction {
        messages.push(ChatMessage {
            role: "system",
            content: instruction,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: prompt,
    });

    ChatRequest {
        model,
        messages,
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}

/// Trimmed reply text of the first choice.
///
/// `None` for malformed bodies and missing or `null` content. A present but
/// blank content yields `Some("")` so the caller can tell "nothing to
/// splice" apart from a failed call.
fn extract_reply(body: &str) -> Option<String> {
    let parsed: ChatResponse = serde_json::from_str(body).ok()?;
    let content = parsed
        .choices
        .into_iter()
        .next()?
        .message?
        .content?;
    Some(content.trim().to_string())
}
