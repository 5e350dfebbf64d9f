use serde::{Deserialize, Serialize};

/// A single guest post, as rendered by the gallery.
///
/// Produced by `normalize::normalize` from whatever column headers the
/// spreadsheet currently uses. The frontend keeps a list of these as its
/// active state and persists the same list in localStorage between polls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Display name of the guest. Falls back to a placeholder, never empty.
    pub name: String,
    /// Free-text blessing. May be empty.
    pub blessing: String,
    /// Submission time as reported by the form, or the time of normalization.
    pub timestamp: String,
    /// Renderable image URL (thumbnail or relative path), if an image was attached.
    #[serde(rename = "imageRef")]
    pub image_ref: Option<String>,
}

impl Message {
    pub fn has_image(&self) -> bool {
        self.image_ref.as_deref().is_some_and(|r| !r.is_empty())
    }
}
