//! HTTP surface: thin request/response adapters around validation,
//! prompt building, and the fallback orchestrator. Failures become a
//! `{ success: false, error }` envelope; the HTTP layer never retries —
//! recovery lives entirely inside the orchestrator.

use crate::error::{Error, Result};
use crate::fallback::FallbackOrchestrator;
use crate::prompts::{build_hook_prompt, build_post_prompt};
use crate::types::{HooksPayload, PostsPayload};
use crate::validation::{
    GenerateRequest, HookRequest, MAX_TOPIC_CHARS, validate_generate, validate_hook,
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub struct AppState {
    pub orchestrator: FallbackOrchestrator,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/generate", post(generate))
        .route("/api/generate/hook", post(generate_hook))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>, bind: &str) -> Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("postcraft API listening on http://{bind}");
    axum::serve(listener, router).await?;
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostWire {
    hook: String,
    body: String,
    cta: String,
    full: String,
    hashtags: String,
    character_count: usize,
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> (StatusCode, Json<Value>) {
    // Cheap guard before the full validator; both enforce the same
    // topic bound.
    if req.topic.is_empty() || req.topic.chars().count() > MAX_TOPIC_CHARS {
        return error_response(&Error::validation("Invalid topic length"));
    }

    let validated = match validate_generate(&req) {
        Ok(v) => v,
        Err(e) => return error_response(&e),
    };

    let prompts = build_post_prompt(
        &validated.topic,
        validated.tone,
        validated.length,
        validated.reference_post.as_deref(),
        validated.template_id.as_deref(),
    );

    match state
        .orchestrator
        .generate::<PostsPayload>(&prompts.system, &prompts.user)
        .await
    {
        Ok(outcome) => {
            let posts: Vec<PostWire> = outcome
                .payload
                .posts
                .iter()
                .map(|p| {
                    let full = p.full_text();
                    PostWire {
                        hook: p.hook.clone(),
                        body: p.body.clone(),
                        cta: p.cta.clone(),
                        full: full.clone(),
                        hashtags: p.hashtags.clone(),
                        character_count: full.chars().count(),
                    }
                })
                .collect();
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "posts": posts,
                    "modelUsed": outcome.model_used,
                })),
            )
        }
        Err(e) => error_response(&e),
    }
}

async fn generate_hook(
    State(state): State<Arc<AppState>>,
    Json(req): Json<HookRequest>,
) -> (StatusCode, Json<Value>) {
    let validated = match validate_hook(&req) {
        Ok(v) => v,
        Err(e) => return error_response(&e),
    };

    let prompts = build_hook_prompt(&validated.body, validated.tone);

    match state
        .orchestrator
        .generate::<HooksPayload>(&prompts.system, &prompts.user)
        .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "hooks": outcome.payload.hooks,
                "modelUsed": outcome.model_used,
            })),
        ),
        Err(e) => error_response(&e),
    }
}

fn error_response(e: &Error) -> (StatusCode, Json<Value>) {
    let status = match e {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(json!({ "success": false, "error": e.to_string() })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_400_everything_else_500() {
        let (status, _) = error_response(&Error::validation("bad"));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = error_response(&Error::Exhausted {
            attempts: 3,
            last_error: "429".into(),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.0["success"], false);
        assert!(body.0["error"].as_str().unwrap().contains("429"));
    }

    #[test]
    fn post_wire_uses_camel_case() {
        let wire = PostWire {
            hook: "h".into(),
            body: "b".into(),
            cta: "c".into(),
            full: "f".into(),
            hashtags: "#x".into(),
            character_count: 1,
        };
        let json = serde_json::to_string(&wire).unwrap();
        assert!(json.contains("\"characterCount\":1"));
    }
}
