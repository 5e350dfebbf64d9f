//! Single-entry response cache in front of the spreadsheet script.
//!
//! The script's daily URL-fetch quota is small compared with a room full of
//! screens polling every few seconds, so the proxy answers from memory for up to
//! `PROXY_TTL` and only then calls upstream again.
//!
//! The lock is released while upstream is being fetched. Two requests that both
//! miss will both fetch, and whichever finishes last owns the cache.

use std::time::Duration;

use common::cache::{CacheEntry, PROXY_TTL};
use common::clock::Clock;
use common::error::FetchError;
use log::info;
use serde_json::Value;
use tokio::sync::RwLock;

use super::upstream::{parse_payload, Upstream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    /// Value of the `X-Cache-Status` response header.
    pub fn as_header(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub payload: Value,
    pub status: CacheStatus,
}

pub struct MessageProxy<U, C> {
    upstream: U,
    clock: C,
    ttl: Duration,
    entry: RwLock<Option<CacheEntry<Value>>>,
}

impl<U: Upstream, C: Clock> MessageProxy<U, C> {
    pub fn new(upstream: U, clock: C) -> Self {
        Self::with_ttl(upstream, clock, PROXY_TTL)
    }

    pub fn with_ttl(upstream: U, clock: C, ttl: Duration) -> Self {
        Self {
            upstream,
            clock,
            ttl,
            entry: RwLock::new(None),
        }
    }

    pub fn upstream(&self) -> &U {
        &self.upstream
    }

    /// Returns the `{data: [...]}` payload for `source`, from memory when possible.
    ///
    /// - A cache entry produced by a different source is dropped first.
    /// - Without `force_refresh`, an entry younger than the TTL is a `Hit`.
    /// - Otherwise upstream is fetched once; on success the entry is replaced
    ///   and the result is a `Miss`. Failures leave the cache as it was (or
    ///   empty, when the refresh was forced).
    pub async fn get_messages(&self, source: &str, force_refresh: bool) -> Result<Fetched, FetchError> {
        {
            let mut entry = self.entry.write().await;

            let changed_from = entry
                .as_ref()
                .filter(|e| !e.matches_source(source))
                .map(|e| e.source_key.clone());
            if let Some(previous) = changed_from {
                info!("Source changed from {previous} to {source}, clearing cache");
                *entry = None;
            }

            if force_refresh {
                info!("Force refresh requested, clearing cache");
                *entry = None;
            }

            let now = self.clock.now_millis();
            if let Some(hit) = entry.as_ref().filter(|e| e.is_valid(now, self.ttl, source)) {
                info!("Cache HIT, age {}s", hit.age_millis(now) / 1000);
                return Ok(Fetched {
                    payload: hit.payload.clone(),
                    status: CacheStatus::Hit,
                });
            }
        }

        info!("Cache MISS, fetching {source}");
        let response = self.upstream.fetch(source).await?;
        let payload = parse_payload(response)?;

        let rows = payload
            .get("data")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        *self.entry.write().await = Some(CacheEntry::new(
            payload.clone(),
            self.clock.now_millis(),
            source,
        ));
        info!("Cached {rows} rows for {}s", self.ttl.as_secs());

        Ok(Fetched {
            payload,
            status: CacheStatus::Miss,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::upstream::testing::{response, ScriptedUpstream};
    use common::clock::ManualClock;
    use serde_json::json;
    use std::sync::Arc;

    const SOURCE: &str = "https://script.google.com/macros/s/current/exec";
    const T0: u64 = 1_700_000_000_000;

    fn proxy() -> (MessageProxy<ScriptedUpstream, Arc<ManualClock>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(T0));
        (
            MessageProxy::new(ScriptedUpstream::default(), clock.clone()),
            clock,
        )
    }

    #[actix_web::test]
    async fn first_call_misses_then_hits_within_ttl() {
        let (proxy, clock) = proxy();
        proxy.upstream().push_json(r#"{"data":[{"ชื่อผู้เข้าร่วมงาน":"A"}]}"#);

        let first = proxy.get_messages(SOURCE, false).await.unwrap();
        assert_eq!(first.status, CacheStatus::Miss);

        clock.advance(PROXY_TTL.as_millis() as u64 - 1);
        let second = proxy.get_messages(SOURCE, false).await.unwrap();
        assert_eq!(second.status, CacheStatus::Hit);
        assert_eq!(second.payload, first.payload);
        assert_eq!(proxy.upstream().calls(), 1);
    }

    #[actix_web::test]
    async fn expired_entry_is_refetched() {
        let (proxy, clock) = proxy();
        proxy.get_messages(SOURCE, false).await.unwrap();

        clock.advance(PROXY_TTL.as_millis() as u64 + 1);
        let refreshed = proxy.get_messages(SOURCE, false).await.unwrap();
        assert_eq!(refreshed.status, CacheStatus::Miss);
        assert_eq!(proxy.upstream().calls(), 2);
    }

    #[actix_web::test]
    async fn source_change_forces_a_miss() {
        let (proxy, _clock) = proxy();
        proxy.get_messages(SOURCE, false).await.unwrap();

        let other = "https://script.google.com/macros/s/redeployed/exec";
        let fetched = proxy.get_messages(other, false).await.unwrap();
        assert_eq!(fetched.status, CacheStatus::Miss);
        assert_eq!(proxy.upstream().urls(), vec![SOURCE.to_string(), other.to_string()]);

        let again = proxy.get_messages(other, false).await.unwrap();
        assert_eq!(again.status, CacheStatus::Hit);
    }

    #[actix_web::test]
    async fn force_refresh_bypasses_a_fresh_entry() {
        let (proxy, _clock) = proxy();
        proxy.upstream().push_json(r#"{"data":[]}"#);
        proxy.upstream().push_json(r#"{"data":[{"ชื่อ-นามสกุล":"new"}]}"#);
        proxy.get_messages(SOURCE, false).await.unwrap();

        let forced = proxy.get_messages(SOURCE, true).await.unwrap();
        assert_eq!(forced.status, CacheStatus::Miss);
        assert_eq!(forced.payload, json!({ "data": [{ "ชื่อ-นามสกุล": "new" }] }));
    }

    #[actix_web::test]
    async fn failures_are_not_cached_and_keep_the_previous_entry() {
        let (proxy, clock) = proxy();
        proxy.upstream().push_json(r#"{"data":[{"ชื่อ-นามสกุล":"kept"}]}"#);
        proxy.get_messages(SOURCE, false).await.unwrap();

        clock.advance(PROXY_TTL.as_millis() as u64);
        proxy
            .upstream()
            .push(Ok(response(500, "text/html", "Internal error")));
        let err = proxy.get_messages(SOURCE, false).await.unwrap_err();
        assert!(matches!(err, FetchError::Network { status: Some(500), .. }));

        // Still expired, so the next call asks upstream again.
        let next = proxy.get_messages(SOURCE, false).await.unwrap();
        assert_eq!(next.status, CacheStatus::Miss);
        assert_eq!(proxy.upstream().calls(), 3);
    }

    #[actix_web::test]
    async fn sign_in_redirect_surfaces_as_auth_error() {
        let (proxy, _clock) = proxy();
        proxy.upstream().push(Ok(response(
            200,
            "text/html",
            "<html>accounts.google.com...</html>",
        )));
        assert_eq!(
            proxy.get_messages(SOURCE, false).await.unwrap_err(),
            FetchError::AuthMisconfiguration
        );
    }
}
