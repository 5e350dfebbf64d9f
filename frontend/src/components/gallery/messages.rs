use common::error::FetchError;
use serde_json::Value;

pub enum Msg {
    /// Tick of the shared interval; fans out to `Poll` and `Rotate`.
    Heartbeat,
    Poll,
    /// Responses carry the sequence number of the request that produced them.
    MessagesFetched { seq: u64, body: Value },
    FetchFailed { seq: u64, error: FetchError },
    Rotate,
    ImageLoaded { src: String, width: u32, height: u32 },
    OpenViewer(String),
    CloseViewer,
}
