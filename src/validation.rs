//! Request validation.
//!
//! All violations for a request are collected and joined into one
//! human-readable message, so the caller sees everything wrong at once
//! rather than fixing fields one 400 at a time.

use crate::error::{Error, Result};
use crate::prompts::TEMPLATE_IDS;
use crate::types::{PostLength, Tone};
use serde::Deserialize;

pub const MAX_TOPIC_CHARS: usize = 500;
pub const MIN_TOPIC_CHARS: usize = 3;
pub const MAX_REFERENCE_CHARS: usize = 3000;
pub const MIN_BODY_CHARS: usize = 10;
pub const MAX_BODY_CHARS: usize = 3000;

/// Raw post-generation request as it arrives on the wire. Tone and
/// length stay strings here so enum violations produce the same joined
/// message as every other check.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default)]
    pub reference_post: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
}

/// Raw hook-generation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookRequest {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tone: String,
}

/// Typed parameters after validation.
#[derive(Debug)]
pub struct ValidatedGenerate {
    pub topic: String,
    pub tone: Tone,
    pub length: PostLength,
    pub reference_post: Option<String>,
    pub template_id: Option<String>,
}

#[derive(Debug)]
pub struct ValidatedHook {
    pub body: String,
    pub tone: Tone,
}

pub fn validate_generate(req: &GenerateRequest) -> Result<ValidatedGenerate> {
    let mut violations = Vec::new();

    let topic = req.topic.trim();
    let topic_chars = topic.chars().count();
    if topic_chars < MIN_TOPIC_CHARS {
        violations.push(format!("Topic must be at least {MIN_TOPIC_CHARS} characters"));
    } else if topic_chars > MAX_TOPIC_CHARS {
        violations.push(format!("Topic must be less than {MAX_TOPIC_CHARS} characters"));
    }

    let tone = parse_tone(&req.tone, &mut violations);

    let length = match req.length.as_deref() {
        None | Some("") => Some(PostLength::default()),
        Some(raw) => match raw.parse::<PostLength>() {
            Ok(length) => Some(length),
            Err(()) => {
                violations.push("Length must be one of Short, Medium, Long".into());
                None
            }
        },
    };

    let reference_post = req
        .reference_post
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());
    if let Some(reference) = reference_post
        && reference.chars().count() > MAX_REFERENCE_CHARS
    {
        violations.push(format!(
            "Reference post must be less than {MAX_REFERENCE_CHARS} characters"
        ));
    }

    let template_id = req
        .template_id
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(id) = template_id
        && !TEMPLATE_IDS.contains(&id)
    {
        violations.push(format!("Unknown template id: {id}"));
    }

    match (tone, length) {
        (Some(tone), Some(length)) if violations.is_empty() => Ok(ValidatedGenerate {
            topic: topic.to_string(),
            tone,
            length,
            reference_post: reference_post.map(str::to_string),
            template_id: template_id.map(str::to_string),
        }),
        _ => Err(Error::validation(violations.join(", "))),
    }
}

pub fn validate_hook(req: &HookRequest) -> Result<ValidatedHook> {
    let mut violations = Vec::new();

    let body = req.body.trim();
    let body_chars = body.chars().count();
    if body_chars < MIN_BODY_CHARS {
        violations.push(format!("Body must be at least {MIN_BODY_CHARS} characters"));
    } else if body_chars > MAX_BODY_CHARS {
        violations.push(format!("Body must be less than {MAX_BODY_CHARS} characters"));
    }

    let tone = parse_tone(&req.tone, &mut violations);

    match tone {
        Some(tone) if violations.is_empty() => Ok(ValidatedHook {
            body: body.to_string(),
            tone,
        }),
        _ => Err(Error::validation(violations.join(", "))),
    }
}

fn parse_tone(raw: &str, violations: &mut Vec<String>) -> Option<Tone> {
    match raw.parse::<Tone>() {
        Ok(tone) => Some(tone),
        Err(()) => {
            violations.push("Tone must be one of Professional, Friendly, Smart, Storytelling".into());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(topic: &str, tone: &str) -> GenerateRequest {
        GenerateRequest {
            topic: topic.into(),
            tone: tone.into(),
            length: None,
            reference_post: None,
            template_id: None,
        }
    }

    #[test]
    fn valid_request_passes_with_default_length() {
        let validated = validate_generate(&request("Remote work tradeoffs", "Smart")).unwrap();
        assert_eq!(validated.tone, Tone::Smart);
        assert_eq!(validated.length, PostLength::Medium);
        assert!(validated.reference_post.is_none());
    }

    #[test]
    fn short_topic_rejected() {
        let err = validate_generate(&request("ab", "Smart")).unwrap_err();
        assert!(err.to_string().contains("at least 3 characters"));
    }

    #[test]
    fn long_topic_rejected() {
        let topic = "x".repeat(501);
        let err = validate_generate(&request(&topic, "Smart")).unwrap_err();
        assert!(err.to_string().contains("less than 500 characters"));
    }

    #[test]
    fn topic_at_exact_bound_passes() {
        let topic = "x".repeat(500);
        assert!(validate_generate(&request(&topic, "Smart")).is_ok());
    }

    #[test]
    fn violations_joined_into_one_message() {
        let err = validate_generate(&request("ab", "Sarcastic")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Topic must be at least 3 characters, Tone must be one of"));
    }

    #[test]
    fn bad_length_rejected() {
        let mut req = request("A fine topic", "Friendly");
        req.length = Some("Gigantic".into());
        let err = validate_generate(&req).unwrap_err();
        assert!(err.to_string().contains("Short, Medium, Long"));
    }

    #[test]
    fn oversized_reference_post_rejected() {
        let mut req = request("A fine topic", "Friendly");
        req.reference_post = Some("y".repeat(3001));
        let err = validate_generate(&req).unwrap_err();
        assert!(err.to_string().contains("Reference post"));
    }

    #[test]
    fn unknown_template_rejected_known_accepted() {
        let mut req = request("A fine topic", "Friendly");
        req.template_id = Some("listicle".into());
        assert!(validate_generate(&req).is_ok());

        req.template_id = Some("sonnet".into());
        let err = validate_generate(&req).unwrap_err();
        assert!(err.to_string().contains("Unknown template id: sonnet"));
    }

    #[test]
    fn hook_body_bounds() {
        let ok = HookRequest {
            body: "This body is long enough.".into(),
            tone: "Storytelling".into(),
        };
        assert!(validate_hook(&ok).is_ok());

        let short = HookRequest {
            body: "tiny".into(),
            tone: "Storytelling".into(),
        };
        let err = validate_hook(&short).unwrap_err();
        assert!(err.to_string().contains("at least 10 characters"));

        let long = HookRequest {
            body: "z".repeat(3001),
            tone: "Storytelling".into(),
        };
        let err = validate_hook(&long).unwrap_err();
        assert!(err.to_string().contains("less than 3000 characters"));
    }
}
