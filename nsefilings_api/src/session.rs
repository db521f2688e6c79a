//! Primed HTTP session for talking to the origin.
//!
//! The origin rejects bare requests: it wants browser-like headers and the
//! anti-bot cookies it sets on the landing page. [`Session::prime`] performs
//! that warm-up once; every later call reuses the same client (and cookie
//! jar) unmodified.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, PRAGMA, REFERER};
use serde_json::Value;

use crate::endpoints::NSE_BASE_URL;
use crate::user_agent::get_user_agent;
use crate::Error;

const WARMUP_TIMEOUT: Duration = Duration::from_secs(5);
const JSON_TIMEOUT: Duration = Duration::from_secs(10);
const HTML_TIMEOUT: Duration = Duration::from_secs(20);

/// A cookie-carrying HTTP session that has completed the origin warm-up.
pub struct Session {
    http: reqwest::Client,
    base_url: String,
}

impl Session {
    /// Primes a session against the production origin.
    pub async fn prime() -> Result<Self, Error> {
        Self::prime_with_base(NSE_BASE_URL).await
    }

    /// Primes a session against a custom origin root. Used for testing with
    /// wiremock.
    ///
    /// Fails with [`Error::Connection`] if the warm-up request cannot reach
    /// the origin, or [`Error::HttpStatus`] if it answers non-2xx.
    pub async fn prime_with_base(base_url: &str) -> Result<Self, Error> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .default_headers(browser_headers(&base_url))
            .cookie_store(true)
            .build()?;

        let resp = http
            .get(&base_url)
            .timeout(WARMUP_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("session warm-up failed for {}: {}", base_url, e);
                Error::Connection {
                    url: base_url.clone(),
                    source: e,
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = truncate_body(&resp.text().await.unwrap_or_default());
            tracing::warn!("session warm-up answered {} for {}", status, base_url);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("session primed against {}", base_url);
        Ok(Self { http, base_url })
    }

    /// Origin root this session was primed against, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a JSON document from `path` (relative to the origin root).
    pub async fn get_json(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, Error> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .query(params)
            .timeout(JSON_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::debug!("GET {} answered {}: {}", url, status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// GET an HTML page from `path` (relative to the origin root).
    pub async fn get_html(&self, path: &str, params: &[(&str, &str)]) -> Result<String, Error> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .query(params)
            .timeout(HTML_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = truncate_body(&resp.text().await.unwrap_or_default());
            tracing::debug!("GET {} answered {}", url, status);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.text().await?)
    }
}

fn browser_headers(base_url: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json,text/html;q=0.9"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    if let Ok(referer) = HeaderValue::from_str(base_url) {
        headers.insert(REFERER, referer);
    }
    headers
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        format!("{}...[truncated]", &body[..MAX])
    }
}
