use common::error::{excerpt, FetchError};
use common::poller::MESSAGES_ENDPOINT;
use gloo_net::http::Request;
use serde_json::Value;

/// One GET against the proxy. Error bodies are kept as an excerpt so the
/// proxy's `message`/`hint` end up in the console.
pub async fn fetch_messages() -> Result<Value, FetchError> {
    let response = Request::get(MESSAGES_ENDPOINT)
        .send()
        .await
        .map_err(|e| FetchError::transport(e.to_string()))?;

    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        return Err(FetchError::Network {
            status: Some(response.status()),
            status_text: response.status_text(),
            details: excerpt(&body),
        });
    }

    response.json::<Value>().await.map_err(|e| FetchError::Parse {
        content_type: response
            .headers()
            .get("content-type")
            .unwrap_or_default(),
        excerpt: excerpt(&e.to_string()),
    })
}
