//! The `{ "data": [...] }` envelope returned by the spreadsheet script and
//! relayed verbatim by `/api/messages`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One spreadsheet row keyed by column header. Cell values are kept as raw JSON
/// because the script emits dates and numbers as non-string values.
pub type RawRecord = Map<String, Value>;

/// Typed view of the upstream envelope, used by tests and fixtures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPayload {
    pub data: Vec<RawRecord>,
}
