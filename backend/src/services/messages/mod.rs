//! # Messages Service Module
//!
//! Routes under `/api` that the gallery page polls.
//!
//! ## Sub-modules:
//! - `get`: serves the spreadsheet rows through the proxy cache.

mod get;

use actix_web::http::Method;
use actix_web::web::{get, method, scope};
use actix_web::{HttpResponse, Scope};
use common::clock::Clock;

use crate::proxy::upstream::Upstream;

/// The base path for all gallery API endpoints.
const API_PATH: &str = "/api";

/// Sent with every `/api/messages` response, errors included.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

/// Lets shared caches in front of the server serve a minute-old copy.
pub const CACHE_CONTROL: &str = "public, s-maxage=60, stale-while-revalidate=120";

/// Header carrying `HIT` or `MISS`.
pub const CACHE_STATUS_HEADER: &str = "X-Cache-Status";

/// Configures and returns the Actix `Scope` for the gallery API.
///
/// # Registered Routes:
///
/// *   **`GET /messages[?refresh=true]`**:
///     - **Handler**: `get::process`
///     - **Description**: Returns `{data: [...]}` as produced by the spreadsheet
///       script, from the in-memory cache when it is younger than a minute.
///       `refresh=true` skips the cache.
///
/// *   **`OPTIONS /messages`**: CORS preflight, answered with the headers above.
pub fn configure_routes<U, C>() -> Scope
where
    U: Upstream + 'static,
    C: Clock + 'static,
{
    scope(API_PATH)
        .route("/messages", get().to(get::process::<U, C>))
        .route("/messages", method(Method::OPTIONS).to(preflight))
}

async fn preflight() -> HttpResponse {
    let mut response = HttpResponse::NoContent();
    for header in CORS_HEADERS {
        response.insert_header(header);
    }
    response.finish()
}
