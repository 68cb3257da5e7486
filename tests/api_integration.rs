use async_trait::async_trait;
use postcraft::api::{AppState, build_router};
use postcraft::error::{Error, Result};
use postcraft::fallback::FallbackOrchestrator;
use postcraft::llm::{ChatBackend, ModelCandidate, Provider};
use serde_json::{Value, json};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

const POSTS_JSON: &str = r##"{"posts":[
  {"hook":"Hook one","body":"Body one","cta":"CTA one","full":"","hashtags":"#a"},
  {"hook":"Hook two","body":"Body two","cta":"CTA two","full":"","hashtags":"#b"}
]}"##;

const HOOKS_JSON: &str = r#"{"hooks":[
  {"style":"Question","content":"Why does this keep happening?"},
  {"style":"Bold statement","content":"Your standup is a status meeting in disguise."},
  {"style":"Statistic","content":"70% of standups run over time."}
]}"#;

/// Fake upstream that counts calls and returns a fixed response.
struct CannedBackend {
    calls: AtomicUsize,
    response: Result<&'static str>,
}

impl CannedBackend {
    fn ok(content: &'static str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            response: Ok(content),
        })
    }

    fn rate_limited() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            response: Err(Error::rate_limit("fake", "quota exceeded")),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatBackend for CannedBackend {
    async fn chat(
        &self,
        _candidate: &ModelCandidate,
        _system: &str,
        _user: &str,
        _structured: bool,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(content) => Ok(content.to_string()),
            Err(Error::RateLimit { provider, message }) => {
                Err(Error::rate_limit(provider.clone(), message.clone()))
            }
            Err(_) => unreachable!(),
        }
    }
}

async fn spawn_app(backend: Arc<dyn ChatBackend>, models: usize) -> String {
    let candidates = (0..models)
        .map(|i| ModelCandidate::new(Provider::OpenRouter, format!("model-{i}:free")))
        .collect();
    let state = Arc::new(AppState {
        orchestrator: FallbackOrchestrator::new(backend, candidates),
    });
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let base = spawn_app(CannedBackend::ok(POSTS_JSON), 1).await;
    let resp = reqwest::get(format!("{base}/api/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn generate_returns_posts_with_character_counts() {
    let backend = CannedBackend::ok(POSTS_JSON);
    let base = spawn_app(backend.clone(), 1).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .json(&json!({"topic": "Async Rust in production", "tone": "Smart"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["modelUsed"], "model-0:free");

    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    let full = posts[0]["full"].as_str().unwrap();
    assert_eq!(full, "Hook one\n\nBody one\n\nCTA one");
    assert_eq!(
        posts[0]["characterCount"].as_u64().unwrap() as usize,
        full.chars().count()
    );
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn short_topic_rejected_before_any_upstream_call() {
    let backend = CannedBackend::ok(POSTS_JSON);
    let base = spawn_app(backend.clone(), 1).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .json(&json!({"topic": "ab", "tone": "Smart"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("at least 3 characters")
    );
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn oversized_topic_caught_by_handler_guard() {
    let backend = CannedBackend::ok(POSTS_JSON);
    let base = spawn_app(backend.clone(), 1).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .json(&json!({"topic": "x".repeat(501), "tone": "Smart"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Invalid topic length"));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn invalid_tone_rejected_before_any_upstream_call() {
    let backend = CannedBackend::ok(POSTS_JSON);
    let base = spawn_app(backend.clone(), 1).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .json(&json!({"topic": "A perfectly fine topic", "tone": "Sarcastic"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Tone must be one of"));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn orchestrator_exhaustion_maps_to_500_with_last_error() {
    let backend = CannedBackend::rate_limited();
    let base = spawn_app(backend.clone(), 3).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .json(&json!({"topic": "A perfectly fine topic", "tone": "Friendly"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("Tried 3 model(s)"));
    assert!(error.contains("quota exceeded"));
    assert_eq!(backend.call_count(), 3);
}

#[tokio::test]
async fn hook_endpoint_returns_three_hooks() {
    let backend = CannedBackend::ok(HOOKS_JSON);
    let base = spawn_app(backend.clone(), 1).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/generate/hook"))
        .json(&json!({"body": "A post body about daily standups.", "tone": "Smart"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["modelUsed"], "model-0:free");
    let hooks = body["hooks"].as_array().unwrap();
    assert_eq!(hooks.len(), 3);
    assert_eq!(hooks[0]["style"], "Question");
}

#[tokio::test]
async fn hook_body_too_short_rejected() {
    let backend = CannedBackend::ok(HOOKS_JSON);
    let base = spawn_app(backend.clone(), 1).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/generate/hook"))
        .json(&json!({"body": "tiny", "tone": "Smart"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    assert_eq!(backend.call_count(), 0);
}
