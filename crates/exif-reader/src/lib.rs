//! exifcard EXIF Reader
//!
//! Adapter around the external EXIF parser. The rest of the workspace only
//! sees the [`TagDecoder`] seam: one awaited call that resolves once with a
//! [`TagMap`] or an error.

pub mod decode;

use std::sync::Arc;

use exifcard_card_model::tags::TagMap;
use exifcard_common::error::CardResult;

pub use decode::{decode_tags, decode_tags_blocking};

/// Turns encoded image bytes into a tag map.
#[async_trait::async_trait]
pub trait TagDecoder: Send + Sync {
    /// Decode the tags of one image. An image without EXIF data resolves to
    /// an empty map rather than an error.
    async fn decode(&self, bytes: Arc<[u8]>) -> CardResult<TagMap>;

    /// Decoder name for logs.
    fn name(&self) -> &str;
}

/// [`TagDecoder`] backed by `kamadak-exif`.
#[derive(Debug, Default, Clone, Copy)]
pub struct KamadakDecoder;

#[async_trait::async_trait]
impl TagDecoder for KamadakDecoder {
    async fn decode(&self, bytes: Arc<[u8]>) -> CardResult<TagMap> {
        decode_tags(bytes).await
    }

    fn name(&self) -> &str {
        "kamadak-exif"
    }
}
