//! # Message Retrieval Service
//!
//! Backend logic for `GET /api/messages`.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: `process` reads the optional `refresh` query flag.
//! 2.  **Proxy**: `MessageProxy::get_messages` answers from its cache or fetches
//!     the spreadsheet script once, bound to the configured upstream URL.
//! 3.  **HTTP Response**: the payload is returned untouched (normalization is the
//!     page's job) with CORS headers, a `Cache-Control` policy and
//!     `X-Cache-Status`. Failures become a `ProxyError` JSON body.

use actix_web::{web, HttpResponse};
use common::clock::Clock;
use common::requests::MessagesQuery;

use super::{CACHE_CONTROL, CACHE_STATUS_HEADER, CORS_HEADERS};
use crate::error::ProxyError;
use crate::proxy::state::GalleryState;
use crate::proxy::upstream::Upstream;

/// Actix web handler for `GET /api/messages`.
///
/// # Returns
/// - `200 OK` with `{data: [...]}` and `X-Cache-Status: HIT|MISS`.
/// - The upstream status, or `500`, with a diagnostic JSON body on failure.
pub async fn process<U: Upstream, C: Clock>(
    state: web::Data<GalleryState<U, C>>,
    query: web::Query<MessagesQuery>,
) -> Result<HttpResponse, ProxyError> {
    let fetched = state
        .proxy
        .get_messages(&state.config.upstream_url, query.force_refresh())
        .await
        .map_err(|cause| ProxyError::new(cause, state.config.environment.is_development()))?;

    let mut response = HttpResponse::Ok();
    for header in CORS_HEADERS {
        response.insert_header(header);
    }
    Ok(response
        .insert_header(("Cache-Control", CACHE_CONTROL))
        .insert_header((CACHE_STATUS_HEADER, fetched.status.as_header()))
        .json(fetched.payload))
}
