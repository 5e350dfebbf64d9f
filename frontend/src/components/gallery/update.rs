//! Elm-style update for the gallery.
//!
//! Polls are answered from local storage while the stored copy is fresh and
//! only then go to the proxy. Failures are logged and leave the current list
//! on screen; the next poll tick simply tries again. A request that never
//! answers holds back new ones for a single poll interval.

use common::clock::{Clock, SystemClock};
use gloo_console as console;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::helpers::fetch_messages;
use super::messages::Msg;
use super::state::GalleryComponent;

pub fn update(gallery: &mut GalleryComponent, ctx: &Context<GalleryComponent>, msg: Msg) -> bool {
    match msg {
        Msg::Heartbeat => {
            let now = SystemClock.now_millis();
            if gallery.poll_schedule.due(now) {
                ctx.link().send_message(Msg::Poll);
            }
            if gallery.rotation_schedule.due(now) {
                ctx.link().send_message(Msg::Rotate);
            }
            false
        }
        Msg::Poll => {
            if let Some(messages) = gallery.poller.cached(SystemClock.now_millis()) {
                console::debug!(format!("Using {} stored messages", messages.len()));
                return gallery.apply_messages(messages);
            }
            let Some(seq) = gallery.requests.begin(SystemClock.now_millis()) else {
                return false;
            };

            let link = ctx.link().clone();
            spawn_local(async move {
                match fetch_messages().await {
                    Ok(body) => link.send_message(Msg::MessagesFetched { seq, body }),
                    Err(error) => link.send_message(Msg::FetchFailed { seq, error }),
                }
            });
            false
        }
        Msg::MessagesFetched { seq, body } => {
            if !gallery.requests.settle(seq) {
                console::debug!(format!("Dropping stale response #{seq}"));
                return false;
            }
            match gallery.poller.accept(&body, SystemClock.now_millis()) {
                Ok(refreshed) => {
                    console::log!(format!("Fetched {} messages", refreshed.messages.len()));
                    if let Some(e) = refreshed.persist_error {
                        console::warn!(format!("Could not store messages: {e}"));
                    }
                    gallery.apply_messages(refreshed.messages)
                }
                Err(e) => {
                    console::error!(format!("Rejected messages response: {e}"));
                    gallery.finish_loading()
                }
            }
        }
        Msg::FetchFailed { seq, error } => {
            if !gallery.requests.settle(seq) {
                return false;
            }
            console::error!(format!("Error fetching messages: {error}"));
            gallery.finish_loading()
        }
        Msg::Rotate => gallery.rotation.advance(gallery.messages.len()),
        Msg::ImageLoaded { src, width, height } => gallery.record_dimensions(src, width, height),
        Msg::OpenViewer(src) => {
            gallery.selected_image = Some(src);
            true
        }
        Msg::CloseViewer => gallery.selected_image.take().is_some(),
    }
}
