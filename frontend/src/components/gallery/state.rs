//! Runtime state of the gallery and the bookkeeping that keeps it consistent
//! when a new message list arrives.

use std::collections::HashMap;

use common::display::{dimensions_by_index, ImageDimensions, Rotation, ROTATION_INTERVAL};
use common::model::message::Message;
use common::poller::{Poller, RequestTracker, POLL_INTERVAL};
use common::schedule::Schedule;
use gloo_timers::callback::Interval;
use yew::prelude::*;

use crate::storage::BrowserStorage;

pub struct GalleryComponent {
    /// Normalized list currently on screen.
    pub messages: Vec<Message>,

    /// True until the first list (cached or fetched) or the first failure.
    pub loading: bool,

    /// Outstanding proxy requests and which responses are still current.
    pub requests: RequestTracker,

    /// Image shown in the full-screen viewer.
    pub selected_image: Option<String>,

    /// Natural sizes reported by `<img>` load events, keyed by image URL.
    pub measured: HashMap<String, ImageDimensions>,

    /// `measured` projected onto the current list.
    pub image_dimensions: HashMap<usize, ImageDimensions>,

    pub rotation: Rotation,
    pub poller: Poller<BrowserStorage>,
    pub poll_schedule: Schedule,
    pub rotation_schedule: Schedule,
    pub heartbeat: Option<Interval>,
    pub viewer_ref: NodeRef,
}

impl GalleryComponent {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            loading: true,
            requests: RequestTracker::default(),
            selected_image: None,
            measured: HashMap::new(),
            image_dimensions: HashMap::new(),
            rotation: Rotation::default(),
            poller: Poller::new(BrowserStorage::new()),
            poll_schedule: Schedule::new(POLL_INTERVAL),
            rotation_schedule: Schedule::new(ROTATION_INTERVAL),
            heartbeat: None,
            viewer_ref: NodeRef::default(),
        }
    }

    /// Puts `messages` on screen. An identical list only ends the loading
    /// state, so polls answered from storage do not re-render the collage.
    pub fn apply_messages(&mut self, messages: Vec<Message>) -> bool {
        let was_loading = std::mem::replace(&mut self.loading, false);
        if messages == self.messages {
            return was_loading;
        }

        self.messages = messages;
        self.rotation.clamp(self.messages.len());
        self.refresh_dimensions();
        true
    }

    /// Ends the loading state after a failed refresh. The old list stays.
    pub fn finish_loading(&mut self) -> bool {
        std::mem::replace(&mut self.loading, false)
    }

    pub fn record_dimensions(&mut self, src: String, width: u32, height: u32) -> bool {
        let dimensions = ImageDimensions::measured(width, height);
        if self.measured.get(&src) == Some(&dimensions) {
            return false;
        }
        self.measured.insert(src, dimensions);
        self.refresh_dimensions();
        true
    }

    fn refresh_dimensions(&mut self) {
        self.image_dimensions = dimensions_by_index(
            self.messages.iter().map(|m| m.image_ref.as_deref()),
            &self.measured,
        );
    }
}
