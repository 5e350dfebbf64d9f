//! Server-side cache in front of the spreadsheet script.
//!
//! - `upstream`: the outbound request and response validation.
//! - `cache`: the TTL-bounded single-entry cache (`MessageProxy`).
//! - `state`: the `web::Data` wrapper shared by all workers.

pub mod cache;
pub mod state;
pub mod upstream;
