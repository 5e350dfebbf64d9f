use serde::Deserialize;

#[derive(Deserialize, Default)]
/// Query string accepted by `GET /api/messages`.
/// Only the literal `refresh=true` forces the proxy to bypass its cache.
pub struct MessagesQuery {
    pub refresh: Option<String>,
}

impl MessagesQuery {
    pub fn force_refresh(&self) -> bool {
        self.refresh.as_deref() == Some("true")
    }
}
