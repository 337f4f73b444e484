//! Show the metadata a card would print for a photo.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use exifcard_card_model::metadata::{Field, MetadataFields};
use exifcard_card_model::orientation::Orientation;
use exifcard_card_model::tags::TagMap;
use exifcard_common::error::CardResult;
use exifcard_exif_reader::{KamadakDecoder, TagDecoder};

pub async fn run(input: PathBuf, show_tags: bool) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(&input)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", input.display()))?;

    let decoder = KamadakDecoder;
    let tags = tags_or_empty(decoder.decode(Arc::from(bytes)).await, &input);

    println!("Photo: {}", input.display());
    println!("  Decoder: {}", decoder.name());
    println!("  Tags: {}", tags.len());
    println!("  Orientation: {:?}", Orientation::from_tags(&tags));
    println!();

    if tags.is_empty() {
        println!("No EXIF metadata; the metadata panel would be hidden.");
        return Ok(());
    }

    let derived = MetadataFields::derive(&tags);
    println!("Fields:");
    for field in Field::ALL {
        println!("  {:<14} {}", field.label(), derived.fields.get(field));
    }
    if !derived.fallbacks.is_empty() {
        println!();
        println!("Placeholders:");
        for fallback in &derived.fallbacks {
            println!("  {}: {}", fallback.field.label(), fallback.reason);
        }
    }
    println!();
    println!("Card text:");
    println!("  {}", derived.fields.camera_line());
    println!("  {}", derived.fields.settings_line());

    if show_tags {
        println!();
        println!("Decoded tags:");
        for (name, value) in tags.iter() {
            println!("  {name} = {value:?}");
        }
    }

    Ok(())
}

/// A corrupt EXIF block reads as no metadata, the same as in the editor.
fn tags_or_empty(decoded: CardResult<TagMap>, input: &Path) -> TagMap {
    decoded.unwrap_or_else(|e| {
        tracing::warn!(photo = %input.display(), error = %e, "EXIF decode failed; treating as no metadata");
        TagMap::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use exifcard_card_model::tags::TagValue;
    use exifcard_common::error::CardError;

    #[test]
    fn test_decode_failure_reads_as_no_metadata() {
        let tags = tags_or_empty(
            Err(CardError::decode_failure("truncated IFD")),
            Path::new("broken.jpg"),
        );
        assert!(tags.is_empty());
    }

    #[test]
    fn test_decoded_tags_pass_through() {
        let mut decoded = TagMap::new();
        decoded.insert("Make", TagValue::Text("Fujifilm".into()));
        let tags = tags_or_empty(Ok(decoded.clone()), Path::new("ok.jpg"));
        assert_eq!(tags, decoded);
    }

    #[tokio::test]
    async fn test_undecodable_file_prints_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not an image").unwrap();
        assert!(run(path, false).await.is_ok());
    }
}
