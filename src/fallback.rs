//! Multi-provider fallback orchestration.
//!
//! Tries candidate (provider, model) pairs in priority order until one
//! returns parseable JSON. Authentication failures are terminal: a
//! rejected credential stays rejected, so burning calls on the rest of
//! the list (or falling through to the next provider) only adds noise.
//! Everything else moves on to the next candidate.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::extract::extract_json;
use crate::llm::{ChatBackend, LiveBackend, ModelCandidate, Provider, is_nvidia_key};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{error, info, warn};

/// One failed attempt, kept for diagnostics only.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub model: String,
    pub error: String,
}

/// Successful generation: the parsed payload, which candidate served
/// it, and the failures burned along the way.
#[derive(Debug)]
pub struct FallbackOutcome<T> {
    pub payload: T,
    pub model_used: String,
    pub attempts: Vec<Attempt>,
}

/// Priority-ordered candidate list. Kimi models lead when its
/// credential is configured (the ranked list depends on which backend
/// the key belongs to), the OpenRouter free tier follows as fallback.
pub fn ranked_candidates(config: &Config, kimi_key: Option<&str>) -> Vec<ModelCandidate> {
    let mut candidates = Vec::new();

    if let Some(key) = kimi_key {
        let models = if is_nvidia_key(key) {
            &config.kimi.nvidia_models
        } else {
            &config.kimi.moonshot_models
        };
        for model in models {
            candidates.push(ModelCandidate::new(Provider::Kimi, model.clone()));
        }
    }

    for model in &config.openrouter.models {
        candidates.push(ModelCandidate::new(Provider::OpenRouter, model.clone()));
    }

    candidates
}

pub struct FallbackOrchestrator {
    backend: Arc<dyn ChatBackend>,
    candidates: Vec<ModelCandidate>,
}

impl FallbackOrchestrator {
    pub fn new(backend: Arc<dyn ChatBackend>, candidates: Vec<ModelCandidate>) -> Self {
        Self {
            backend,
            candidates,
        }
    }

    /// Live orchestrator: candidate list from config + configured
    /// credentials, reqwest transport underneath.
    pub fn from_config(config: &Config) -> Result<Self> {
        let kimi_key = config.kimi.resolve_key();
        let candidates = ranked_candidates(config, kimi_key.as_deref());
        let backend = LiveBackend::from_config(config)?;
        Ok(Self::new(Arc::new(backend), candidates))
    }

    pub fn candidates(&self) -> &[ModelCandidate] {
        &self.candidates
    }

    /// Run the fallback cascade for one prompt pair, parsing the
    /// winning response into `T`.
    pub async fn generate<T: DeserializeOwned>(
        &self,
        system: &str,
        user: &str,
    ) -> Result<FallbackOutcome<T>> {
        let mut attempts: Vec<Attempt> = Vec::new();

        for candidate in &self.candidates {
            let label = candidate.label();
            info!(model = %label, "attempting generation");

            match self.backend.chat(candidate, system, user, true).await {
                Ok(content) => match parse_payload::<T>(&content) {
                    Ok(payload) => {
                        return Ok(FallbackOutcome {
                            payload,
                            model_used: label,
                            attempts,
                        });
                    }
                    Err(e) => {
                        warn!(model = %label, error = %e, "response failed to parse");
                        attempts.push(Attempt {
                            model: label,
                            error: e.to_string(),
                        });
                    }
                },
                Err(Error::Unsupported { .. }) => {
                    // Endpoint rejected structured-output mode. One
                    // plain-mode retry against the same model, then
                    // give up on it. The attempt log gets a single
                    // entry either way.
                    info!(model = %label, "structured output rejected, retrying in plain mode");
                    match self.backend.chat(candidate, system, user, false).await {
                        Ok(content) => {
                            if let Ok(payload) = parse_payload::<T>(&content) {
                                return Ok(FallbackOutcome {
                                    payload,
                                    model_used: label,
                                    attempts,
                                });
                            }
                            warn!(model = %label, "plain mode response failed to parse");
                            attempts.push(Attempt {
                                model: label,
                                error: "structured output rejected, plain retry unparseable"
                                    .into(),
                            });
                        }
                        Err(retry_err) => {
                            warn!(model = %label, error = %retry_err, "plain mode retry failed");
                            attempts.push(Attempt {
                                model: label,
                                error: retry_err.to_string(),
                            });
                        }
                    }
                }
                Err(e @ (Error::Auth { .. } | Error::Config(_))) => {
                    // Bad credential or missing one: no remaining
                    // candidate can do better under it.
                    error!(model = %label, error = %e, "terminal failure, aborting cascade");
                    attempts.push(Attempt {
                        model: label,
                        error: e.to_string(),
                    });
                    return Err(e);
                }
                Err(e) => {
                    let classification = match &e {
                        Error::RateLimit { .. } => "rate_limit",
                        Error::Api { .. } => "api",
                        Error::Parse(_) => "parse",
                        _ => "transport",
                    };
                    warn!(model = %label, classification, error = %e, "attempt failed");
                    attempts.push(Attempt {
                        model: label,
                        error: e.to_string(),
                    });
                }
            }
        }

        let last_error = attempts
            .last()
            .map(|a| a.error.clone())
            .unwrap_or_else(|| "no candidates configured".into());
        error!(attempts = attempts.len(), %last_error, "all models exhausted");
        Err(Error::Exhausted {
            attempts: attempts.len(),
            last_error,
        })
    }
}

fn parse_payload<T: DeserializeOwned>(content: &str) -> Result<T> {
    let json = extract_json(content)
        .ok_or_else(|| Error::parse("no JSON object found in response"))?;
    serde_json::from_str(json).map_err(|e| Error::parse(format!("parse model JSON: {e}")))
}
