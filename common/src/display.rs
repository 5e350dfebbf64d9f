//! Layout math for the polaroid collage.
//!
//! The gallery only ever shows `WINDOW_SIZE` cards. When more posts exist the
//! window slides forward by one on every rotation tick, wrapping around the
//! list. Each card gets a fixed tilt picked from its message index so the
//! collage looks hand-placed but renders identically on every refresh.

use std::collections::HashMap;
use std::time::Duration;

/// Cards on screen at once.
pub const WINDOW_SIZE: usize = 10;

/// Time between window advances.
pub const ROTATION_INTERVAL: Duration = Duration::from_millis(2000);

/// Tilt in degrees, picked by `index % 6`.
pub const ROTATION_ANGLES: [i8; 6] = [-2, 1, -1, 2, -3, 3];

/// Width/height ratio above which an image is landscape.
pub const LANDSCAPE_RATIO: f64 = 1.1;

/// Width/height ratio below which an image is portrait.
pub const PORTRAIT_RATIO: f64 = 0.9;

/// Dimensions assumed for a card without a photo.
pub const PLACEHOLDER_DIMENSIONS: ImageDimensions = ImageDimensions {
    width: 300,
    height: 300,
    orientation: ImageOrientation::Square,
};

/// Indices into the message list shown at `offset`: `(offset + i) % len` for
/// `i in 0..window`. Wraps around (repeating entries) when the list is shorter
/// than the window. Empty for an empty list.
pub fn display_window(len: usize, offset: usize, window: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    (0..window).map(|i| (offset + i) % len).collect()
}

/// Decorative tilt of the card for `index`.
pub fn rotation_angle(index: usize) -> i8 {
    ROTATION_ANGLES[index % ROTATION_ANGLES.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageOrientation {
    Portrait,
    Landscape,
    #[default]
    Square,
}

impl ImageOrientation {
    /// Buckets natural pixel dimensions. Both thresholds are strict, so a ratio
    /// of exactly 1.1 or 0.9 is square. A zero height is treated as square.
    pub fn classify(width: u32, height: u32) -> Self {
        if height == 0 {
            return ImageOrientation::Square;
        }
        let aspect_ratio = f64::from(width) / f64::from(height);
        if aspect_ratio > LANDSCAPE_RATIO {
            ImageOrientation::Landscape
        } else if aspect_ratio < PORTRAIT_RATIO {
            ImageOrientation::Portrait
        } else {
            ImageOrientation::Square
        }
    }

    /// CSS `aspect-ratio` of the photo frame.
    pub fn frame_aspect(self) -> &'static str {
        match self {
            ImageOrientation::Portrait => "3 / 4",
            ImageOrientation::Landscape => "4 / 3",
            ImageOrientation::Square => "1 / 1",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
    pub orientation: ImageOrientation,
}

impl ImageDimensions {
    pub fn measured(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            orientation: ImageOrientation::classify(width, height),
        }
    }
}

/// Orientation of the card at `index`; unknown entries are square.
pub fn orientation_of(dimensions: &HashMap<usize, ImageDimensions>, index: usize) -> ImageOrientation {
    dimensions
        .get(&index)
        .map(|d| d.orientation)
        .unwrap_or_default()
}

/// Per-index dimensions for `images` (one entry per message, `None` without a
/// photo). Photos take their measured size by URL, so a list refresh that only
/// shifts positions keeps what the browser already reported. Cards without a
/// photo get `PLACEHOLDER_DIMENSIONS`; unmeasured photos are left out.
pub fn dimensions_by_index<'a>(
    images: impl IntoIterator<Item = Option<&'a str>>,
    measured: &HashMap<String, ImageDimensions>,
) -> HashMap<usize, ImageDimensions> {
    images
        .into_iter()
        .enumerate()
        .filter_map(|(index, image)| match image {
            None => Some((index, PLACEHOLDER_DIMENSIONS)),
            Some(src) => measured.get(src).map(|d| (index, *d)),
        })
        .collect()
}

/// Sliding-window position. Frozen while everything fits on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    offset: usize,
    window: usize,
}

impl Default for Rotation {
    fn default() -> Self {
        Self::new(WINDOW_SIZE)
    }
}

impl Rotation {
    pub fn new(window: usize) -> Self {
        Self { offset: 0, window }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether a list of `len` posts rotates at all.
    pub fn is_active(&self, len: usize) -> bool {
        len > self.window
    }

    /// Moves the window forward by one. Returns whether anything changed.
    pub fn advance(&mut self, len: usize) -> bool {
        if !self.is_active(len) {
            return false;
        }
        self.offset = (self.offset + 1) % len;
        true
    }

    /// Keeps the offset in range after the list was replaced.
    pub fn clamp(&mut self, len: usize) {
        self.offset = if len == 0 { 0 } else { self.offset % len };
    }

    /// Message indices to render for a list of `len` posts. A list shorter
    /// than the window is shown once, without repeats.
    pub fn indices(&self, len: usize) -> Vec<usize> {
        display_window(len, self.offset, self.window.min(len))
    }
}
