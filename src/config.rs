use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub kimi: KimiConfig,
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Primary provider. One credential, two compatible backends: keys with
/// the `nvapi-` prefix belong to NVIDIA NIM, everything else goes to
/// Moonshot direct. Each backend has its own ranked model list.
#[derive(Debug, Deserialize)]
pub struct KimiConfig {
    #[serde(default = "default_kimi_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_moonshot_base_url")]
    pub moonshot_base_url: String,
    #[serde(default = "default_nvidia_base_url")]
    pub nvidia_base_url: String,
    #[serde(default = "default_moonshot_models")]
    pub moonshot_models: Vec<String>,
    #[serde(default = "default_nvidia_models")]
    pub nvidia_models: Vec<String>,
}

/// Secondary provider: the OpenRouter aggregator with its ranked list
/// of free models.
#[derive(Debug, Deserialize)]
pub struct OpenRouterConfig {
    #[serde(default = "default_openrouter_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_openrouter_base_url")]
    pub base_url: String,
    #[serde(default = "default_free_models")]
    pub models: Vec<String>,
    #[serde(default = "default_referer")]
    pub referer: String,
    #[serde(default = "default_app_title")]
    pub app_title: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl KimiConfig {
    /// Trimmed credential from the configured env var, `None` when unset
    /// or empty.
    pub fn resolve_key(&self) -> Option<String> {
        resolve_env(&self.api_key_env)
    }
}

impl OpenRouterConfig {
    pub fn resolve_key(&self) -> Option<String> {
        resolve_env(&self.api_key_env)
    }
}

fn resolve_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// Defaults
fn default_bind() -> String {
    "127.0.0.1:8787".into()
}
fn default_kimi_key_env() -> String {
    "KIMI_API_KEY".into()
}
fn default_moonshot_base_url() -> String {
    "https://api.moonshot.cn/v1".into()
}
fn default_nvidia_base_url() -> String {
    "https://integrate.api.nvidia.com/v1".into()
}
fn default_moonshot_models() -> Vec<String> {
    vec![
        "kimi-k2".into(),
        "kimi-k2.5".into(),
        "kimi-k2-thinking".into(),
        "moonshot-v1-8k".into(),
    ]
}
fn default_nvidia_models() -> Vec<String> {
    // Instruct first: faster on plain text tasks.
    vec![
        "moonshotai/kimi-k2-instruct".into(),
        "moonshotai/kimi-k2.5".into(),
        "moonshotai/kimi-k2-thinking".into(),
    ]
}
fn default_openrouter_key_env() -> String {
    "OPENROUTER_API_KEY".into()
}
fn default_openrouter_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn default_free_models() -> Vec<String> {
    vec![
        "meta-llama/llama-4-scout:free".into(),
        "meta-llama/llama-4-maverick:free".into(),
        "deepseek/deepseek-r1:free".into(),
        "google/gemini-2.0-flash:free".into(),
        "meta-llama/llama-3.3-70b-instruct:free".into(),
        "mistralai/mistral-small-3.1-24b-instruct:free".into(),
        "google/gemma-3-27b:free".into(),
        "qwen/qwen-2.5-72b-instruct:free".into(),
        "amazon/nova-2-lite:free".into(),
    ]
}
fn default_referer() -> String {
    std::env::var("POSTCRAFT_APP_URL").unwrap_or_else(|_| "http://localhost:3000".into())
}
fn default_app_title() -> String {
    "PostCraft".into()
}
fn default_max_tokens() -> u32 {
    4096
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for KimiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_kimi_key_env(),
            moonshot_base_url: default_moonshot_base_url(),
            nvidia_base_url: default_nvidia_base_url(),
            moonshot_models: default_moonshot_models(),
            nvidia_models: default_nvidia_models(),
        }
    }
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_openrouter_key_env(),
            base_url: default_openrouter_base_url(),
            models: default_free_models(),
            referer: default_referer(),
            app_title: default_app_title(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config {}: {e}", path.display())))?;
        toml::from_str(&content).map_err(|e| Error::config(format!("Failed to parse config: {e}")))
    }
}
