//! `window.localStorage` behind the poller's `Storage` trait.
//!
//! Some kiosk browsers disable localStorage (private mode, locked-down
//! profiles). The gallery then keeps its copy in memory for the lifetime of
//! the page, which still spares the proxy most requests.

use common::poller::{MemoryStorage, Storage};

pub struct BrowserStorage {
    local: Option<web_sys::Storage>,
    fallback: MemoryStorage,
}

impl BrowserStorage {
    pub fn new() -> Self {
        let local = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if local.is_none() {
            gloo_console::warn!("localStorage unavailable, caching messages in memory");
        }
        Self {
            local,
            fallback: MemoryStorage::default(),
        }
    }
}

impl Storage for BrowserStorage {
    fn load(&self, key: &str) -> Option<String> {
        match &self.local {
            Some(storage) => storage.get_item(key).ok().flatten(),
            None => self.fallback.load(key),
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<(), String> {
        match &self.local {
            Some(storage) => storage
                .set_item(key, value)
                .map_err(|e| format!("localStorage write failed: {:?}", e)),
            None => self.fallback.store(key, value),
        }
    }
}
