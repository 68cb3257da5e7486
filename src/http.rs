use crate::error::{Error, Result};
use reqwest::{Client, StatusCode, header};
use std::time::Duration;
use tracing::debug;

/// Thin wrapper over reqwest that classifies upstream statuses into the
/// error taxonomy. No retries here: recovery policy lives entirely in
/// the fallback orchestrator.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(180))
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::http(e.to_string()))?;

        Ok(Self { client })
    }

    pub async fn post_json_raw(
        &self,
        url: &str,
        body: &str,
        headers: &[(&str, &str)],
    ) -> Result<String> {
        let mut req = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.to_string());
        for (k, v) in headers {
            req = req.header(*k, *v);
        }

        debug!(url, "sending request");
        let resp = req.send().await.map_err(|e| Error::http(e.to_string()))?;
        handle_response(resp).await
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<String> {
    let status = resp.status();
    let url = resp.url().to_string();
    let provider = extract_domain(&url);

    match status {
        StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED => {
            resp.text().await.map_err(|e| Error::http(e.to_string()))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            let body = resp.text().await.unwrap_or_default();
            Err(Error::auth(provider, truncate(&body)))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let body = resp.text().await.unwrap_or_default();
            Err(Error::rate_limit(provider, truncate(&body)))
        }
        // Chat-completion endpoints report unsupported request features
        // (structured-output mode, mainly) as 400.
        StatusCode::BAD_REQUEST => {
            let body = resp.text().await.unwrap_or_default();
            Err(Error::unsupported(provider, truncate(&body)))
        }
        _ => {
            let body = resp.text().await.unwrap_or_default();
            Err(Error::api_with_status(
                provider,
                truncate(&body),
                status.as_u16(),
            ))
        }
    }
}

fn extract_domain(url: &str) -> String {
    url.split("//")
        .nth(1)
        .and_then(|s| s.split('/').next())
        .unwrap_or("unknown")
        .to_string()
}

fn truncate(body: &str) -> String {
    body.chars().take(500).collect()
}
