use yew::prelude::*;

pub const DEFAULT_TITLE: &str = "Khun & Jan's Wedding Gallery";

/// Properties for the `GalleryComponent`.
#[derive(Properties, PartialEq, Clone)]
pub struct GalleryProps {
    /// Heading shown above the collage.
    #[prop_or(AttrValue::Static(DEFAULT_TITLE))]
    pub title: AttrValue,

    /// Number of collage columns on wide screens.
    #[prop_or(5)]
    pub columns: usize,
}
