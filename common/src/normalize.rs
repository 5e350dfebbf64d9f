//! Raw spreadsheet rows to canonical `Message`s.
//!
//! The form behind the spreadsheet has been edited more than once, so the same
//! field can arrive under different column headers depending on which version
//! of the sheet a deployment points at. Each canonical field lists the headers
//! it accepts in priority order and the first non-empty cell wins.
//!
//! Image cells hold Google Drive share links, which browsers cannot embed.
//! `resolve_image` extracts the file id and points at the thumbnail endpoint
//! instead.

use std::sync::LazyLock;

use chrono::{SecondsFormat, Utc};
use regex::Regex;
use serde_json::Value;

use crate::model::message::Message;
use crate::model::payload::RawRecord;

/// Shown when a guest left the name column empty.
pub const PLACEHOLDER_NAME: &str = "ไม่ระบุชื่อ";

/// Canonical field of a `Message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Blessing,
    Timestamp,
    ImageRef,
}

/// Accepted column headers per field, newest form layout first.
/// The last entry of each list is the `Message` serialization key, so a
/// serialized `Message` normalizes back to itself.
pub const FIELD_ALIASES: [(Field, &[&str]); 4] = [
    (Field::Name, &["ชื่อผู้เข้าร่วมงาน", "ชื่อ-นามสกุล", "name"]),
    (
        Field::Blessing,
        &["ข้อความอวยพร (Paragraph)", "ข้อความอวยพร", "blessing"],
    ),
    (Field::Timestamp, &["ประทับเวลา", "Timestamp", "timestamp"]),
    (
        Field::ImageRef,
        &["อัพโหลดรูปภาพ (File upload)", "รูปภาพ", "imageRef"],
    ),
];

/// Thumbnail URL served for a Drive file id.
const THUMBNAIL_TEMPLATE: &str = "https://drive.google.com/thumbnail?id={id}&sz=w1000";

/// How form upload cells join several file links.
const UPLOAD_SEPARATOR: &str = ", ";

/// Drive link shapes, tried in order: `/file/d/<id>`, `?id=<id>`, `/d/<id>`.
static DRIVE_ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"/file/d/([a-zA-Z0-9_-]+)",
        r"[?&]id=([a-zA-Z0-9_-]+)",
        r"/d/([a-zA-Z0-9_-]+)",
    ]
    .map(|p| Regex::new(p).expect("drive id pattern is valid"))
});

/// Normalizes with the current time as the fallback timestamp.
pub fn normalize(raw: &RawRecord) -> Message {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    normalize_at(raw, &now)
}

/// Normalizes a record, using `now` when the row carries no timestamp.
///
/// Total: any record, including an empty one, yields a complete `Message`.
pub fn normalize_at(raw: &RawRecord, now: &str) -> Message {
    Message {
        name: resolve_field(raw, Field::Name).unwrap_or_else(|| PLACEHOLDER_NAME.to_string()),
        blessing: resolve_field(raw, Field::Blessing).unwrap_or_default(),
        timestamp: resolve_field(raw, Field::Timestamp).unwrap_or_else(|| now.to_string()),
        image_ref: resolve_image(resolve_field(raw, Field::ImageRef).as_deref()),
    }
}

/// First non-empty cell among the headers accepted for `field`.
pub fn resolve_field(raw: &RawRecord, field: Field) -> Option<String> {
    FIELD_ALIASES
        .iter()
        .find(|(f, _)| *f == field)
        .into_iter()
        .flat_map(|(_, keys)| keys.iter())
        .find_map(|key| raw.get(*key).and_then(cell_text))
}

/// Cell value as text. `null`, empty strings and nested values count as absent.
fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Turns an image cell into something an `<img>` can load.
///
/// - empty or absent: `None`
/// - several uploads joined with `", "`: the first one is used
/// - absolute URL with a recognizable Drive file id: the thumbnail URL
/// - any other absolute URL, or a relative path: unchanged
pub fn resolve_image(reference: Option<&str>) -> Option<String> {
    let first = first_upload(reference?.trim());
    if first.is_empty() {
        return None;
    }

    if !is_absolute_url(first) {
        return Some(first.to_string());
    }

    match drive_file_id(first) {
        Some(id) => Some(THUMBNAIL_TEMPLATE.replace("{id}", id)),
        None => Some(first.to_string()),
    }
}

/// Form uploads list every file as a URL joined with `", "`. A cell is only
/// split when each part is such a URL; commas inside a single link stay.
fn first_upload(cell: &str) -> &str {
    let mut parts = cell.split(UPLOAD_SEPARATOR).map(str::trim);
    let is_upload_list =
        cell.contains(UPLOAD_SEPARATOR) && parts.clone().all(is_absolute_url);
    match parts.next() {
        Some(first) if is_upload_list => first,
        _ => cell,
    }
}

fn is_absolute_url(reference: &str) -> bool {
    reference.starts_with("https://") || reference.starts_with("http://")
}

/// The Drive file id embedded in `url`, if any of the known link shapes match.
pub fn drive_file_id(url: &str) -> Option<&str> {
    DRIVE_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(url).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: &str = "2025-02-14T10:00:00.000Z";

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn empty_record_gets_every_default() {
        let msg = normalize_at(&RawRecord::new(), NOW);
        assert_eq!(msg.name, PLACEHOLDER_NAME);
        assert_eq!(msg.blessing, "");
        assert_eq!(msg.timestamp, NOW);
        assert_eq!(msg.image_ref, None);
    }

    #[test]
    fn current_form_headers() {
        let msg = normalize_at(
            &record(json!({
                "ประทับเวลา": "14/2/2025, 19:02:11",
                "ชื่อผู้เข้าร่วมงาน": "A",
                "ข้อความอวยพร (Paragraph)": "hi",
                "อัพโหลดรูปภาพ (File upload)": "https://drive.google.com/open?id=1AbC_d-9"
            })),
            NOW,
        );
        assert_eq!(msg.name, "A");
        assert_eq!(msg.blessing, "hi");
        assert_eq!(msg.timestamp, "14/2/2025, 19:02:11");
        assert_eq!(
            msg.image_ref.as_deref(),
            Some("https://drive.google.com/thumbnail?id=1AbC_d-9&sz=w1000")
        );
    }

    #[test]
    fn legacy_headers_are_used_when_current_ones_are_missing_or_empty() {
        let msg = normalize_at(
            &record(json!({
                "ชื่อผู้เข้าร่วมงาน": "",
                "ชื่อ-นามสกุล": "สมชาย",
                "ข้อความอวยพร": "ยินดีด้วย",
                "Timestamp": "2025-02-14T12:00:00Z",
                "รูปภาพ": "/IMG_2385.jpg"
            })),
            NOW,
        );
        assert_eq!(msg.name, "สมชาย");
        assert_eq!(msg.blessing, "ยินดีด้วย");
        assert_eq!(msg.timestamp, "2025-02-14T12:00:00Z");
        assert_eq!(msg.image_ref.as_deref(), Some("/IMG_2385.jpg"));
    }

    #[test]
    fn non_string_cells_are_stringified_or_ignored() {
        let msg = normalize_at(
            &record(json!({
                "ชื่อผู้เข้าร่วมงาน": 42,
                "ข้อความอวยพร (Paragraph)": null,
                "รูปภาพ": { "nested": true }
            })),
            NOW,
        );
        assert_eq!(msg.name, "42");
        assert_eq!(msg.blessing, "");
        assert_eq!(msg.image_ref, None);
    }

    #[test]
    fn normalizing_a_serialized_message_is_a_no_op() {
        let once = normalize_at(
            &record(json!({
                "ชื่อ-นามสกุล": "B",
                "ข้อความอวยพร": "congrats",
                "รูปภาพ": "https://drive.google.com/file/d/XYZ123/view?usp=sharing"
            })),
            NOW,
        );
        let raw = record(serde_json::to_value(&once).unwrap());
        let twice = normalize_at(&raw, "2030-01-01T00:00:00.000Z");
        assert_eq!(once, twice);
    }

    #[test]
    fn drive_link_shapes() {
        assert_eq!(
            drive_file_id("https://drive.google.com/file/d/abc-DEF_1/view"),
            Some("abc-DEF_1")
        );
        assert_eq!(
            drive_file_id("https://drive.google.com/open?id=q9"),
            Some("q9")
        );
        assert_eq!(
            drive_file_id("https://drive.google.com/uc?export=view&id=z_0"),
            Some("z_0")
        );
        assert_eq!(
            drive_file_id("https://docs.google.com/d/short1"),
            Some("short1")
        );
        assert_eq!(drive_file_id("https://example.com/photo.jpg"), None);
    }

    #[test]
    fn image_resolution_passes_through_what_it_cannot_rewrite() {
        assert_eq!(resolve_image(None), None);
        assert_eq!(resolve_image(Some("")), None);
        assert_eq!(resolve_image(Some("   ")), None);
        assert_eq!(
            resolve_image(Some("https://example.com/photo.jpg")).as_deref(),
            Some("https://example.com/photo.jpg")
        );
        assert_eq!(
            resolve_image(Some("/photos/d/not-a-drive-id.jpg")).as_deref(),
            Some("/photos/d/not-a-drive-id.jpg")
        );
    }

    #[test]
    fn commas_inside_a_single_link_are_kept() {
        let cdn = "https://res.cloudinary.com/demo/image/upload/w_300,h_200/photo.jpg";
        assert_eq!(resolve_image(Some(cdn)).as_deref(), Some(cdn));
        assert_eq!(
            resolve_image(Some("/photos/khun,jan.jpg")).as_deref(),
            Some("/photos/khun,jan.jpg")
        );
        assert_eq!(
            resolve_image(Some("/photos/a.jpg, not-a-url")).as_deref(),
            Some("/photos/a.jpg, not-a-url")
        );
    }

    #[test]
    fn multiple_uploads_use_the_first() {
        assert_eq!(
            resolve_image(Some(
                "https://drive.google.com/open?id=first, https://drive.google.com/open?id=second"
            ))
            .as_deref(),
            Some("https://drive.google.com/thumbnail?id=first&sz=w1000")
        );
    }
}
