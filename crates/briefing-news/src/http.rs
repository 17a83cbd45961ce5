use std::sync::Arc;
use std::time::{Duration, Instant};

use briefing_core::config::HttpConfig;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, RETRY_AFTER};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{NewsError, Result};

/// Seconds to wait on a 429 that carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

// ─── RateLimitedClient ────────────────────────────────────────────────────────

/// Sequential HTTP client that keeps a minimum gap between requests.
pub struct RateLimitedClient {
    client: reqwest::Client,
    min_interval: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
    max_retries: u32,
}

impl RateLimitedClient {
    pub fn new(
        min_interval: Duration,
        max_retries: u32,
        user_agent: &str,
        accept_language: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(accept_language) {
            headers.insert(ACCEPT_LANGUAGE, value);
        }
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .gzip(true)
            .build()?;
        Ok(Self {
            client,
            min_interval,
            last_request: Arc::new(Mutex::new(None)),
            max_retries,
        })
    }

    pub fn from_config(config: &HttpConfig) -> Result<Self> {
        Self::new(
            Duration::from_millis(config.min_interval_ms),
            config.max_retries,
            &config.user_agent,
            &config.accept_language,
            Duration::from_secs(config.timeout_secs),
        )
    }

    async fn wait_for_rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(t) = *last {
            let elapsed = t.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    pub async fn get(&self, url: &str) -> Result<String> {
        let mut attempt = 0u32;
        loop {
            self.wait_for_rate_limit().await;
            debug!(url, attempt, "GET");
            let resp = self.client.get(url).send().await;
            match resp {
                Ok(r) if r.status() == 429 => {
                    let wait = r
                        .headers()
                        .get(RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                    if attempt >= self.max_retries {
                        return Err(NewsError::RateLimit(url.to_string(), wait));
                    }
                    warn!(url, wait, "rate limited, backing off");
                    sleep(Duration::from_secs(wait)).await;
                    attempt += 1;
                }
                Ok(r) if !r.status().is_success() => {
                    let status = r.status().as_u16();
                    return Err(NewsError::Api(url.to_string(), format!("HTTP {status}")));
                }
                Ok(r) => return r.text().await.map_err(NewsError::Http),
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(NewsError::Http(e));
                    }
                    let backoff = 2u64.pow(attempt);
                    warn!(url, error = %e, backoff, "request failed, retrying");
                    sleep(Duration::from_secs(backoff)).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn client(retries: u32) -> RateLimitedClient {
        RateLimitedClient::new(
            Duration::from_millis(0),
            retries,
            "briefing-test/0.1",
            "ko-KR,ko;q=0.9",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn sends_configured_headers() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/page")
            .match_header("user-agent", "briefing-test/0.1")
            .match_header("accept-language", "ko-KR,ko;q=0.9")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let body = client(0)
            .get(&format!("{}/page", server.url()))
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let err = client(0)
            .get(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::Api(_, ref msg) if msg == "HTTP 404"));
    }

    #[tokio::test]
    async fn rate_limit_without_retries_surfaces_wait() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/busy")
            .with_status(429)
            .with_header("retry-after", "7")
            .create_async()
            .await;

        let err = client(0)
            .get(&format!("{}/busy", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::RateLimit(_, 7)));
    }

    #[tokio::test]
    async fn retries_after_rate_limit() {
        let mut server = Server::new_async().await;
        let busy = server
            .mock("GET", "/feed")
            .with_status(429)
            .with_header("retry-after", "0")
            .expect(1)
            .create_async()
            .await;
        let ok = server
            .mock("GET", "/feed")
            .with_status(200)
            .with_body("<rss/>")
            .expect(1)
            .create_async()
            .await;

        let body = client(1)
            .get(&format!("{}/feed", server.url()))
            .await
            .unwrap();

        assert_eq!(body, "<rss/>");
        busy.assert_async().await;
        ok.assert_async().await;
    }

    #[tokio::test]
    async fn retries_after_transport_error() {
        let client = client(1);
        let start = Instant::now();
        let err = client.get("http://127.0.0.1:9/down").await.unwrap_err();

        assert!(matches!(err, NewsError::Http(_)));
        // one backoff of 2^0 seconds before giving up
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn min_interval_spaces_requests() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/tick")
            .with_status(200)
            .with_body("t")
            .expect(2)
            .create_async()
            .await;

        let client = RateLimitedClient::new(
            Duration::from_millis(200),
            0,
            "briefing-test/0.1",
            "ko",
            Duration::from_secs(5),
        )
        .unwrap();
        let url = format!("{}/tick", server.url());
        let start = Instant::now();
        client.get(&url).await.unwrap();
        client.get(&url).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(200));
    }
}
