//! Application state shared by every actix worker.
//!
//! Built once in `main.rs` and handed to the app as `web::Data`, so all workers
//! read and refresh the same cached upstream response.

use common::clock::Clock;

use super::cache::MessageProxy;
use super::upstream::Upstream;
use crate::config::Config;

pub struct GalleryState<U, C> {
    /// Cached access to the spreadsheet script.
    pub proxy: MessageProxy<U, C>,
    /// The upstream URL in here is the source the cache entry is checked against.
    pub config: Config,
}

impl<U: Upstream, C: Clock> GalleryState<U, C> {
    pub fn new(proxy: MessageProxy<U, C>, config: Config) -> Self {
        Self { proxy, config }
    }
}
