use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o-mini";

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

/// What the engine needs from a text generator. The production
/// implementation is `NarrativeClient`.
pub trait Narrator {
    /// The main turn request: fixed system instruction plus the turn prompt.
    fn generate(&self, system: &str, prompt: &str) -> Result<String>;

    /// Auxiliary requests (story elements, turbulence) carry their own
    /// persona, sent as a lone system message.
    fn generate_single(&self, prompt: &str) -> Result<String>;

    fn has_credentials(&self) -> bool;
}

/// Blocking client for the text-generation service. One request per call,
/// no automatic retry; a failed call surfaces to the player and the same
/// input may be submitted again.
pub struct NarrativeClient {
    http: Client,
    api_key: Option<String>,
}

impl NarrativeClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: Client::new(),
            api_key,
        }
    }

    fn chat(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let Some(api_key) = &self.api_key else {
            bail!("OPENAI_API_KEY is not set");
        };

        let req = ChatCompletionRequest {
            model: MODEL.into(),
            temperature: 0.7,
            messages,
        };

        let total: usize = req.messages.iter().map(|m| m.content.len()).sum();
        log::debug!("narrative request, {total} prompt bytes");

        let resp = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(api_key)
            .json(&req)
            .send()
            .context("narrative service unreachable")?
            .error_for_status()
            .context("narrative service rejected the request")?
            .json::<ChatCompletionResponse>()
            .context("narrative service returned an unreadable reply")?;

        let content = resp
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .context("narrative service returned no choices")?;

        Ok(content)
    }
}

impl Narrator for NarrativeClient {
    fn generate(&self, system: &str, prompt: &str) -> Result<String> {
        self.chat(vec![
            ChatMessage {
                role: "system".into(),
                content: system.into(),
            },
            ChatMessage {
                role: "user".into(),
                content: prompt.into(),
            },
        ])
    }

    fn generate_single(&self, prompt: &str) -> Result<String> {
        self.chat(vec![ChatMessage {
            role: "system".into(),
            content: prompt.into(),
        }])
    }

    fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}
