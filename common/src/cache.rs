//! Single-slot, time-bounded cache entries.
//!
//! Both the proxy (60 s, keyed by upstream URL) and the client poller (30 s,
//! fixed key) hold at most one entry at a time and replace it wholesale on
//! every successful fetch. The rules for when an entry may be served live here
//! so both sides agree on them.

use std::time::Duration;

/// How long the proxy serves a response before asking upstream again.
pub const PROXY_TTL: Duration = Duration::from_secs(60);

/// How long the browser reuses its persisted copy before calling the proxy.
pub const CLIENT_TTL: Duration = Duration::from_secs(30);

/// One cached payload plus the time it was fetched and the source it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub payload: T,
    /// Milliseconds since the Unix epoch.
    pub fetched_at: u64,
    /// The source (usually a URL) that produced `payload`.
    pub source_key: String,
}

impl<T> CacheEntry<T> {
    pub fn new(payload: T, fetched_at: u64, source_key: impl Into<String>) -> Self {
        Self {
            payload,
            fetched_at,
            source_key: source_key.into(),
        }
    }

    /// Age in milliseconds. A clock that went backwards yields zero.
    pub fn age_millis(&self, now: u64) -> u64 {
        now.saturating_sub(self.fetched_at)
    }

    /// `now - fetched_at < ttl`.
    pub fn is_fresh(&self, now: u64, ttl: Duration) -> bool {
        u128::from(self.age_millis(now)) < ttl.as_millis()
    }

    pub fn matches_source(&self, source: &str) -> bool {
        self.source_key == source
    }

    /// Servable iff fresh and produced by the currently configured source.
    pub fn is_valid(&self, now: u64, ttl: Duration, source: &str) -> bool {
        self.matches_source(source) && self.is_fresh(now, ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 1_700_000_000_000;
    const SOURCE: &str = "https://script.example/exec";

    fn entry() -> CacheEntry<&'static str> {
        CacheEntry::new("payload", T0, SOURCE)
    }

    #[test]
    fn fresh_until_ttl_elapses() {
        let ttl_ms = PROXY_TTL.as_millis() as u64;
        assert!(entry().is_valid(T0, PROXY_TTL, SOURCE));
        assert!(entry().is_valid(T0 + ttl_ms - 1, PROXY_TTL, SOURCE));
        assert!(!entry().is_valid(T0 + ttl_ms, PROXY_TTL, SOURCE));
        assert!(!entry().is_valid(T0 + ttl_ms + 1, PROXY_TTL, SOURCE));
    }

    #[test]
    fn other_source_is_never_valid() {
        assert!(!entry().is_valid(T0, PROXY_TTL, "https://script.example/other"));
    }

    #[test]
    fn clock_skew_does_not_underflow() {
        assert_eq!(entry().age_millis(T0 - 5_000), 0);
        assert!(entry().is_fresh(T0 - 5_000, CLIENT_TTL));
    }
}
