//! Editor session: the current photo, its metadata and the live layout.
//!
//! A session holds at most one photo. Loading a new photo replaces the old
//! one and derives its metadata exactly once; the layout stays mutable
//! throughout. Every compose reads the current state afresh.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use exifcard_card_model::layout::LayoutConfig;
use exifcard_card_model::metadata::{DerivedMetadata, FieldFallback, MetadataFields};
use exifcard_card_model::orientation::Orientation;
use exifcard_card_model::tags::TagMap;
use exifcard_common::error::{CardError, CardResult};
use exifcard_exif_reader::TagDecoder;
use exifcard_render_engine::{
    export_card, ComposeRequest, Compositor, EncodedImage, ExportOutcome, SourceImage,
};

/// A loaded photo and everything derived from it at load time.
#[derive(Debug, Clone)]
pub struct LoadedPhoto {
    /// Display name (usually the file name).
    pub name: String,
    pub image: SourceImage,
    pub orientation: Orientation,
    pub tags: TagMap,
    /// `None` when the decoder found no tags; the metadata panel is hidden.
    pub metadata: Option<DerivedMetadata>,
}

impl LoadedPhoto {
    pub fn has_metadata(&self) -> bool {
        self.metadata.is_some()
    }

    /// Fields to draw; placeholders everywhere when no tags were found.
    pub fn fields(&self) -> MetadataFields {
        self.metadata
            .as_ref()
            .map(|m| m.fields.clone())
            .unwrap_or_default()
    }

    pub fn fallbacks(&self) -> &[FieldFallback] {
        self.metadata
            .as_ref()
            .map(|m| m.fallbacks.as_slice())
            .unwrap_or(&[])
    }
}

/// Editing state for one user.
pub struct EditorSession {
    decoder: Arc<dyn TagDecoder>,
    compositor: Compositor,
    layout: LayoutConfig,
    photo: Option<LoadedPhoto>,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("decoder", &self.decoder.name())
            .field("compositor", &self.compositor)
            .field("layout", &self.layout)
            .field("photo", &self.photo.as_ref().map(|p| &p.name))
            .finish()
    }
}

impl EditorSession {
    pub fn new(decoder: Arc<dyn TagDecoder>, compositor: Compositor, layout: LayoutConfig) -> Self {
        Self {
            decoder,
            compositor,
            layout,
            photo: None,
        }
    }

    /// Load a photo from disk, replacing any current one.
    pub async fn load_file(&mut self, path: &Path) -> CardResult<&LoadedPhoto> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CardError::FileNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.load_bytes(bytes, name).await
    }

    /// Load a photo from encoded bytes, replacing any current one.
    ///
    /// Pixel decoding failures are errors and leave the current photo in
    /// place. EXIF decoding failures are not: the photo loads without
    /// metadata.
    pub async fn load_bytes(
        &mut self,
        bytes: Vec<u8>,
        name: impl Into<String>,
    ) -> CardResult<&LoadedPhoto> {
        let name = name.into();
        let bytes: Arc<[u8]> = bytes.into();

        let pixel_bytes = bytes.clone();
        let decode_pixels = tokio::task::spawn_blocking(move || SourceImage::from_bytes(&pixel_bytes));
        let (pixels, tags) = tokio::join!(decode_pixels, self.decoder.decode(bytes));

        let image = pixels
            .map_err(|e| CardError::image_decode(format!("image decode task failed: {e}")))??;
        image.dimensions()?;

        let tags = match tags {
            Ok(tags) => tags,
            Err(e) => {
                tracing::warn!(photo = %name, error = %e, "EXIF decode failed; continuing without metadata");
                TagMap::new()
            }
        };

        let orientation = Orientation::from_tags(&tags);
        let image = image.oriented(orientation);
        let metadata = (!tags.is_empty()).then(|| MetadataFields::derive(&tags));

        tracing::info!(
            photo = %name,
            width = image.natural_width(),
            height = image.natural_height(),
            tags = tags.len(),
            orientation = ?orientation,
            "Photo loaded"
        );

        Ok(self.photo.insert(LoadedPhoto {
            name,
            image,
            orientation,
            tags,
            metadata,
        }))
    }

    /// Drop the current photo.
    pub fn clear(&mut self) {
        self.photo = None;
    }

    pub fn photo(&self) -> Option<&LoadedPhoto> {
        self.photo.as_ref()
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutConfig {
        &mut self.layout
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Compose the current state.
    pub fn compose(&self) -> CardResult<EncodedImage> {
        let photo = self.require_photo()?;
        let fields = photo.fields();
        self.compositor
            .compose(&ComposeRequest::new(&photo.image, &fields, self.layout))
    }

    /// Compose the current state and write it to `path`.
    pub async fn export(&self, path: &Path) -> CardResult<ExportOutcome> {
        let photo = self.require_photo()?;
        let fields = photo.fields();
        let request = ComposeRequest::new(&photo.image, &fields, self.layout);
        export_card(&self.compositor, &request, path).await
    }

    fn require_photo(&self) -> CardResult<&LoadedPhoto> {
        self.photo
            .as_ref()
            .ok_or_else(|| CardError::not_ready("load a photo before composing"))
    }
}

/// Resolve a user-supplied output location.
///
/// A directory (existing, or spelled with a trailing separator) receives
/// `default_name`; anything else is used as the file path.
pub fn resolve_output_path(output: Option<&Path>, default_name: &Path) -> PathBuf {
    match output {
        None => default_name.to_path_buf(),
        Some(p) if p.is_dir() || p.as_os_str().to_string_lossy().ends_with('/') => {
            p.join(default_name)
        }
        Some(p) => p.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exifcard_card_model::tags::TagValue;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    /// Decoder returning a fixed result, standing in for the EXIF parser.
    struct FixedDecoder(Option<TagMap>);

    #[async_trait::async_trait]
    impl TagDecoder for FixedDecoder {
        async fn decode(&self, _bytes: Arc<[u8]>) -> CardResult<TagMap> {
            self.0
                .clone()
                .ok_or_else(|| CardError::decode_failure("corrupt EXIF block"))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(w, h, Rgb([10, 200, 10]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    fn session(tags: Option<TagMap>) -> EditorSession {
        EditorSession::new(
            Arc::new(FixedDecoder(tags)),
            Compositor::default(),
            LayoutConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_compose_before_load_is_not_ready() {
        let session = session(Some(TagMap::new()));
        assert!(session.compose().unwrap_err().is_not_ready());
    }

    #[tokio::test]
    async fn test_no_tags_hides_metadata() {
        let mut session = session(Some(TagMap::new()));
        let photo = session.load_bytes(png_bytes(20, 10), "a.png").await.unwrap();
        assert!(!photo.has_metadata());
        assert_eq!(photo.fields(), MetadataFields::default());
        assert!(session.compose().is_ok());
    }

    #[tokio::test]
    async fn test_decode_failure_degrades_to_no_metadata() {
        let mut session = session(None);
        let photo = session.load_bytes(png_bytes(20, 10), "b.png").await.unwrap();
        assert!(!photo.has_metadata());
    }

    #[tokio::test]
    async fn test_tags_derive_fields_and_orientation() {
        let mut tags = TagMap::new();
        tags.insert("Make", TagValue::Text("Canon".into()));
        tags.insert("Orientation", TagValue::Integer(6));
        let mut session = session(Some(tags));

        let photo = session.load_bytes(png_bytes(20, 10), "c.png").await.unwrap();
        assert!(photo.has_metadata());
        assert_eq!(photo.fields().camera_line(), "Canon Unknown Model");
        assert_eq!(photo.orientation, Orientation::Rotate90);
        assert_eq!(
            (photo.image.natural_width(), photo.image.natural_height()),
            (10, 20)
        );
        assert_eq!(photo.fallbacks().len(), 5);
    }

    #[tokio::test]
    async fn test_bad_pixels_keep_previous_photo() {
        let mut session = session(Some(TagMap::new()));
        session.load_bytes(png_bytes(8, 8), "first.png").await.unwrap();
        let err = session
            .load_bytes(b"garbage".to_vec(), "second.png")
            .await
            .unwrap_err();
        assert!(matches!(err, CardError::ImageDecode { .. }));
        assert_eq!(session.photo().unwrap().name, "first.png");
    }

    #[tokio::test]
    async fn test_layout_changes_apply_to_next_compose() {
        let mut session = session(Some(TagMap::new()));
        session.load_bytes(png_bytes(40, 40), "d.png").await.unwrap();

        let before = session.compose().unwrap();
        session.layout_mut().set_padding(0);
        session.layout_mut().show_metadata = false;
        let after = session.compose().unwrap();

        assert_eq!((before.width, before.height), (80, 40 + 40 + 60 + 16));
        assert_eq!((after.width, after.height), (40, 40));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let mut session = session(Some(TagMap::new()));
        let err = session
            .load_file(Path::new("/definitely/not/here.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, CardError::FileNotFound { .. }));
    }

    #[test]
    fn test_resolve_output_path() {
        let default = Path::new("exif-card.jpg");
        assert_eq!(resolve_output_path(None, default), PathBuf::from("exif-card.jpg"));
        assert_eq!(
            resolve_output_path(Some(Path::new("out/")), default),
            PathBuf::from("out/exif-card.jpg")
        );
        assert_eq!(
            resolve_output_path(Some(Path::new("card.png")), default),
            PathBuf::from("card.png")
        );
    }
}
