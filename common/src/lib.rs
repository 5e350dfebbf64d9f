//! Shared building blocks for the wedding gallery.
//!
//! Everything here is free of I/O so it can run on the actix backend and in the
//! yew frontend alike:
//! - `model`: the canonical `Message` and the raw `{data: [...]}` payload.
//! - `normalize`: raw spreadsheet rows to `Message`, image link rewriting.
//! - `cache`, `clock`, `schedule`: time-bounded cache entries and fixed-interval tasks.
//! - `display`: rotating window, decorative angles, orientation classification.
//! - `poller`: the client-side cache in front of `/api/messages`.

pub mod cache;
pub mod clock;
pub mod display;
pub mod error;
pub mod model;
pub mod normalize;
pub mod poller;
pub mod requests;
pub mod schedule;
