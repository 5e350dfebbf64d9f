//! The gallery page: polls the proxy, rotates the collage and hosts the
//! full-screen viewer.
//!
//! All timing goes through one heartbeat `Interval`. On every beat the poll
//! and rotation `Schedule`s are asked whether they are due, so the component
//! owns exactly one browser timer and drops it on teardown.

use common::clock::{Clock, SystemClock};
use gloo_timers::callback::Interval;
use web_sys::HtmlElement;
use yew::prelude::*;

mod dialogs;
mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::GalleryProps;
pub use state::GalleryComponent;

/// Granularity of the heartbeat. Schedules fire on the first beat at or after
/// their due time.
const HEARTBEAT_MS: u32 = 250;

impl Component for GalleryComponent {
    type Message = Msg;
    type Properties = GalleryProps;

    fn create(_ctx: &Context<Self>) -> Self {
        GalleryComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            let now = SystemClock.now_millis();
            self.poll_schedule.start(now, true);
            self.rotation_schedule.start(now, false);

            let link = ctx.link().clone();
            self.heartbeat = Some(Interval::new(HEARTBEAT_MS, move || {
                link.send_message(Msg::Heartbeat)
            }));
            ctx.link().send_message(Msg::Heartbeat);
        }

        // Escape only reaches the overlay while it has focus.
        if self.selected_image.is_some() {
            if let Some(viewer) = self.viewer_ref.cast::<HtmlElement>() {
                let _ = viewer.focus();
            }
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.poll_schedule.stop();
        self.rotation_schedule.stop();
        // Dropping the interval cancels it.
        self.heartbeat.take();
    }
}
