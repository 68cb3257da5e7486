use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

const USER_AGENT: &str = "postcraft/0.1.0";

/// Upstream LLM vendor. Kimi is the primary (one credential, two
/// compatible endpoints), OpenRouter the aggregator fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Kimi,
    OpenRouter,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kimi => "kimi",
            Self::OpenRouter => "openrouter",
        }
    }
}

/// One (provider, model) pair in the priority-ordered fallback list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCandidate {
    pub provider: Provider,
    pub model: String,
}

impl ModelCandidate {
    pub fn new(provider: Provider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Label reported as `model_used`: Kimi models are prefixed so the
    /// caller can tell which credential served the request.
    pub fn label(&self) -> String {
        match self.provider {
            Provider::Kimi => format!("kimi:{}", self.model),
            Provider::OpenRouter => self.model.clone(),
        }
    }
}

/// Kimi keys issued by NVIDIA NIM carry an `nvapi-` prefix; everything
/// else is a Moonshot direct key.
pub fn is_nvidia_key(key: &str) -> bool {
    key.starts_with("nvapi-")
}

/// Everything needed to construct a client for one provider endpoint.
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub extra_headers: Vec<(String, String)>,
}

/// Stateless handle to one OpenAI-compatible chat-completion endpoint.
pub struct ChatClient {
    api_key: String,
    base_url: String,
    extra_headers: Vec<(String, String)>,
    http: HttpClient,
}

/// Explicit factory: configuration in, client handle out. No globals.
pub fn build_client(config: ClientConfig) -> Result<ChatClient> {
    let http = HttpClient::new(USER_AGENT)?;
    Ok(ChatClient {
        api_key: config.api_key,
        base_url: config.base_url,
        extra_headers: config.extra_headers,
        http,
    })
}

// -- Wire format --

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Msg<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
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

impl ChatClient {
    /// One chat-completion call. `structured` asks the endpoint for
    /// strict JSON output (`response_format: json_object`); callers
    /// drop it on the plain-mode retry.
    pub async fn chat(
        &self,
        model: &str,
        system: &str,
        user: &str,
        max_tokens: u32,
        structured: bool,
    ) -> Result<String> {
        let request = ChatRequest {
            model,
            max_tokens,
            messages: vec![
                Msg {
                    role: "system",
                    content: system,
                },
                Msg {
                    role: "user",
                    content: user,
                },
            ],
            response_format: structured.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let body = serde_json::to_string(&request)
            .map_err(|e| Error::parse(format!("serialize request: {e}")))?;

        let url = format!("{}/chat/completions", self.base_url);
        let auth = format!("Bearer {}", self.api_key);
        let mut headers: Vec<(&str, &str)> = vec![("Authorization", &auth)];
        for (k, v) in &self.extra_headers {
            headers.push((k.as_str(), v.as_str()));
        }

        debug!(model, structured, "sending chat completion request");
        let response_text = self.http.post_json_raw(&url, &body, &headers).await?;

        let resp: ChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| Error::parse(format!("parse completion response: {e}")))?;

        resp.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::parse("empty response from model"))
    }
}

/// Seam between the fallback loop and the transport, so tests can
/// script failures and count calls.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(
        &self,
        candidate: &ModelCandidate,
        system: &str,
        user: &str,
        structured: bool,
    ) -> Result<String>;
}

/// Production backend: one client per configured provider.
pub struct LiveBackend {
    kimi: Option<ChatClient>,
    openrouter: Option<ChatClient>,
    openrouter_key_env: String,
    max_tokens: u32,
}

impl LiveBackend {
    pub fn from_config(config: &Config) -> Result<Self> {
        let kimi = match config.kimi.resolve_key() {
            Some(key) => {
                let base_url = if is_nvidia_key(&key) {
                    config.kimi.nvidia_base_url.clone()
                } else {
                    config.kimi.moonshot_base_url.clone()
                };
                debug!(%base_url, "kimi credential configured");
                Some(build_client(ClientConfig {
                    api_key: key,
                    base_url,
                    extra_headers: Vec::new(),
                })?)
            }
            None => None,
        };

        let openrouter = match config.openrouter.resolve_key() {
            Some(key) => Some(build_client(ClientConfig {
                api_key: key,
                base_url: config.openrouter.base_url.clone(),
                extra_headers: vec![
                    ("HTTP-Referer".into(), config.openrouter.referer.clone()),
                    ("X-Title".into(), config.openrouter.app_title.clone()),
                ],
            })?),
            None => None,
        };

        Ok(Self {
            kimi,
            openrouter,
            openrouter_key_env: config.openrouter.api_key_env.clone(),
            max_tokens: config.generation.max_tokens,
        })
    }
}

#[async_trait]
impl ChatBackend for LiveBackend {
    async fn chat(
        &self,
        candidate: &ModelCandidate,
        system: &str,
        user: &str,
        structured: bool,
    ) -> Result<String> {
        let client = match candidate.provider {
            Provider::Kimi => self.kimi.as_ref().ok_or_else(|| {
                Error::config("Kimi credential not configured for this candidate")
            })?,
            Provider::OpenRouter => self.openrouter.as_ref().ok_or_else(|| {
                Error::config(format!("{} is not set", self.openrouter_key_env))
            })?,
        };
        client
            .chat(&candidate.model, system, user, self.max_tokens, structured)
            .await
    }
}
