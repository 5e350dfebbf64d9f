//! The spreadsheet script as seen by the proxy: one GET, one body.
//!
//! `Upstream` is the seam the cache talks to. `HttpUpstream` is the real
//! reqwest client; tests script responses instead. Turning a raw response
//! into a `{data: [...]}` payload lives in `parse_payload` so both share it.

use std::future::Future;

use common::error::{excerpt, FetchError};
use log::{error, info};
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::redirect::Policy;
use serde_json::{json, Value};

/// Markers of the Google sign-in page served when the web app is not public.
const SIGN_IN_MARKERS: [&str; 2] = ["accounts.google.com", "signin"];

/// Everything the proxy needs from an upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Upstream: Send + Sync {
    /// Performs exactly one request against `url`. No retries.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<UpstreamResponse, FetchError>> + Send;
}

pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new() -> Result<Self, reqwest::Error> {
        // Apps Script answers on script.googleusercontent.com after a redirect.
        let client = reqwest::Client::builder()
            .redirect(Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

impl Upstream for HttpUpstream {
    async fn fetch(&self, url: &str) -> Result<UpstreamResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| {
                error!("Upstream request to {url} failed: {e}");
                FetchError::transport(e.to_string())
            })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        info!("Upstream responded {status}, content type {content_type:?}");

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        Ok(UpstreamResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            content_type,
            body,
        })
    }
}

/// Validates an upstream response and brings it into `{data: [...]}` shape.
///
/// 1. Non-2xx: `Network` with the status and a body excerpt.
/// 2. JSON content type: parsed directly. Anything else is parsed as text; when
///    that fails a sign-in page is `AuthMisconfiguration`, the rest `Parse`.
/// 3. A bare array is wrapped as `{data: [...]}`; objects pass through; any
///    other JSON value is `Shape`.
pub fn parse_payload(response: UpstreamResponse) -> Result<Value, FetchError> {
    if !response.is_success() {
        error!(
            "Upstream status {} {}: {}",
            response.status,
            response.status_text,
            excerpt(&response.body)
        );
        return Err(FetchError::Network {
            status: Some(response.status),
            status_text: response.status_text,
            details: excerpt(&response.body),
        });
    }

    let content_type = response.content_type.unwrap_or_default();
    let parsed = match serde_json::from_str::<Value>(&response.body) {
        Ok(value) => value,
        Err(e) if content_type.contains("application/json") => {
            error!("Upstream sent malformed JSON: {e}");
            return Err(FetchError::Parse {
                content_type,
                excerpt: excerpt(&response.body),
            });
        }
        Err(e) => {
            error!("Upstream body is not JSON ({e}): {}", excerpt(&response.body));
            if looks_like_sign_in(&response.body) {
                return Err(FetchError::AuthMisconfiguration);
            }
            return Err(FetchError::Parse {
                content_type,
                excerpt: excerpt(&response.body),
            });
        }
    };

    match parsed {
        Value::Array(rows) => Ok(json!({ "data": rows })),
        object @ Value::Object(_) => Ok(object),
        other => Err(FetchError::Shape(format!(
            "expected an object or array, got `{}`",
            excerpt(&other.to_string())
        ))),
    }
}

fn looks_like_sign_in(body: &str) -> bool {
    SIGN_IN_MARKERS.iter().any(|marker| body.contains(marker))
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Plays back queued results, then answers `{"data": []}` forever.
    #[derive(Default)]
    pub struct ScriptedUpstream {
        script: Mutex<VecDeque<Result<UpstreamResponse, FetchError>>>,
        calls: AtomicUsize,
        urls: Mutex<Vec<String>>,
    }

    impl ScriptedUpstream {
        pub fn push(&self, result: Result<UpstreamResponse, FetchError>) -> &Self {
            self.script.lock().unwrap().push_back(result);
            self
        }

        pub fn push_json(&self, body: &str) -> &Self {
            self.push(Ok(json_response(body)))
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn urls(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }
    }

    impl Upstream for ScriptedUpstream {
        async fn fetch(&self, url: &str) -> Result<UpstreamResponse, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(json_response(r#"{"data":[]}"#)))
        }
    }

    pub fn json_response(body: &str) -> UpstreamResponse {
        UpstreamResponse {
            status: 200,
            status_text: "OK".into(),
            content_type: Some("application/json; charset=utf-8".into()),
            body: body.into(),
        }
    }

    pub fn response(status: u16, content_type: &str, body: &str) -> UpstreamResponse {
        UpstreamResponse {
            status,
            status_text: String::new(),
            content_type: Some(content_type.into()),
            body: body.into(),
        }
    }
}
