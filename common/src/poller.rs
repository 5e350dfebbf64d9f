//! Client side of the refresh loop.
//!
//! Every poll tick the gallery first looks for a recent copy of the message
//! list in local storage and only calls the proxy when that copy is older than
//! `CLIENT_TTL`. A successful response is normalized and written back as a
//! whole; a malformed one leaves both the screen and the stored copy untouched.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::{CLIENT_TTL, CacheEntry};
use crate::error::FetchError;
use crate::model::message::Message;
use crate::normalize::normalize;

/// Proxy endpoint polled by the gallery.
pub const MESSAGES_ENDPOINT: &str = "/api/messages";

/// Time between poll ticks. Most ticks are answered from local storage.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Local storage key of the persisted message list.
pub const STORAGE_KEY: &str = "wedding_gallery_messages";

/// Key/value persistence, implemented over `window.localStorage` in the browser.
pub trait Storage {
    fn load(&self, key: &str) -> Option<String>;
    fn store(&self, key: &str, value: &str) -> Result<(), String>;
}

/// In-memory storage for tests and for browsers that refuse localStorage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn store(&self, key: &str, value: &str) -> Result<(), String> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// What is written under `STORAGE_KEY`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessages {
    pub data: Vec<Message>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl From<StoredMessages> for CacheEntry<Vec<Message>> {
    fn from(stored: StoredMessages) -> Self {
        CacheEntry::new(stored.data, stored.timestamp, MESSAGES_ENDPOINT)
    }
}

/// Result of accepting a proxy response.
#[derive(Debug, Clone, PartialEq)]
pub struct Refreshed {
    pub messages: Vec<Message>,
    /// Set when the list could not be written to storage. The list is still usable.
    pub persist_error: Option<String>,
}

pub struct Poller<S: Storage> {
    storage: S,
    ttl: Duration,
}

impl<S: Storage> Poller<S> {
    pub fn new(storage: S) -> Self {
        Self::with_ttl(storage, CLIENT_TTL)
    }

    pub fn with_ttl(storage: S, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    /// The stored list if it is younger than the TTL. Unreadable entries are a miss.
    pub fn cached(&self, now: u64) -> Option<Vec<Message>> {
        let raw = self.storage.load(STORAGE_KEY)?;
        let stored: StoredMessages = serde_json::from_str(&raw).ok()?;
        let entry = CacheEntry::from(stored);
        entry
            .is_fresh(now, self.ttl)
            .then_some(entry.payload)
    }

    /// Validates and normalizes a `/api/messages` body, then persists it.
    ///
    /// The body must be an object whose `data` is an array; anything else is a
    /// `FetchError::Shape` and nothing is stored.
    pub fn accept(&self, body: &Value, now: u64) -> Result<Refreshed, FetchError> {
        let rows = body
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| FetchError::Shape("response has no `data` array".to_string()))?;

        let messages: Vec<Message> = rows
            .iter()
            .map(|row| match row {
                Value::Object(record) => normalize(record),
                _ => normalize(&Default::default()),
            })
            .collect();

        let persist_error = self.persist(&messages, now).err();

        Ok(Refreshed {
            messages,
            persist_error,
        })
    }

    fn persist(&self, messages: &[Message], now: u64) -> Result<(), String> {
        let stored = StoredMessages {
            data: messages.to_vec(),
            timestamp: now,
        };
        let json = serde_json::to_string(&stored).map_err(|e| e.to_string())?;
        self.storage.store(STORAGE_KEY, &json)
    }
}

/// Bookkeeping for proxy requests issued by poll ticks.
///
/// A request that has not settled holds back further requests for one
/// `POLL_INTERVAL`; after that the next tick sends a new one. Requests are
/// numbered, and a response older than one already applied is stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTracker {
    retry_after_ms: u64,
    next_seq: u64,
    pending: Option<(u64, u64)>,
    settled: u64,
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::new(POLL_INTERVAL)
    }
}

impl RequestTracker {
    pub fn new(retry_after: Duration) -> Self {
        Self {
            retry_after_ms: retry_after.as_millis() as u64,
            next_seq: 0,
            pending: None,
            settled: 0,
        }
    }

    /// Sequence number for a new request, or `None` while the last one is
    /// still younger than the retry delay.
    pub fn begin(&mut self, now: u64) -> Option<u64> {
        if let Some((_, started_at)) = self.pending {
            if now.saturating_sub(started_at) < self.retry_after_ms {
                return None;
            }
        }
        self.next_seq += 1;
        self.pending = Some((self.next_seq, now));
        Some(self.next_seq)
    }

    /// Records that request `seq` came back. Returns false when a newer
    /// request has already settled, in which case its result must be dropped.
    pub fn settle(&mut self, seq: u64) -> bool {
        if seq <= self.settled {
            return false;
        }
        self.settled = seq;
        if matches!(self.pending, Some((pending, _)) if pending <= seq) {
            self.pending = None;
        }
        true
    }
}
