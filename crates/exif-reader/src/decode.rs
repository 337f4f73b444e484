//! EXIF container parsing via `kamadak-exif`.

use std::io::Cursor;
use std::sync::Arc;

use exif::{Field, In, Value};

use exifcard_card_model::tags::{TagMap, TagValue};
use exifcard_common::error::{CardError, CardResult};

/// Parse the EXIF block of an encoded image into a [`TagMap`].
///
/// Images without an EXIF block yield an empty map. Malformed EXIF data is a
/// [`CardError::DecodeFailure`]. Only primary-IFD fields are kept, so
/// thumbnail tags never shadow the photo's own values.
pub fn decode_tags_blocking(bytes: &[u8]) -> CardResult<TagMap> {
    let mut cursor = Cursor::new(bytes);
    let exif = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(container)) => {
            tracing::debug!(container, "no EXIF block present");
            return Ok(TagMap::new());
        }
        Err(e) => return Err(CardError::decode_failure(e.to_string())),
    };

    let tags: TagMap = exif
        .fields()
        .filter(|field| field.ifd_num == In::PRIMARY)
        .filter_map(|field| convert_field(field).map(|value| (field.tag.to_string(), value)))
        .collect();

    tracing::debug!(tags = tags.len(), "decoded EXIF tags");
    Ok(tags)
}

/// Parse EXIF off the async runtime's worker threads.
pub async fn decode_tags(bytes: Arc<[u8]>) -> CardResult<TagMap> {
    tokio::task::spawn_blocking(move || decode_tags_blocking(&bytes))
        .await
        .map_err(|e| CardError::decode_failure(format!("EXIF decode task failed: {e}")))?
}

fn convert_field(field: &Field) -> Option<TagValue> {
    match &field.value {
        Value::Ascii(parts) => parts
            .iter()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .find(|s| !s.trim_matches(|c: char| c == '\0' || c.is_whitespace()).is_empty())
            .map(TagValue::Text),
        Value::Byte(v) => v.first().map(|&n| TagValue::Integer(n as u32)),
        Value::Short(v) => v.first().map(|&n| TagValue::Integer(n as u32)),
        Value::Long(v) => v.first().map(|&n| TagValue::Integer(n)),
        Value::Rational(v) => v.first().map(|r| TagValue::Rational {
            num: r.num,
            denom: r.denom,
        }),
        // Maker notes and other opaque blobs carry nothing displayable.
        Value::Undefined(..) | Value::Unknown(..) => None,
        _ => Some(TagValue::Text(field.display_value().to_string())),
    }
}
