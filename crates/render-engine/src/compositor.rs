//! Card compositor: combines the scaled photo with its metadata lines.
//!
//! A compose call is a pure function of its [`ComposeRequest`]. It owns its
//! canvas for the duration of the call and never caches the result, so
//! identical requests produce byte-identical output.

use std::sync::Arc;

use image::imageops::FilterType;
use image::{Rgb, RgbImage};

use exifcard_card_model::geometry::{CanvasGeometry, CAMERA_LINE_HEIGHT, SETTINGS_LINE_HEIGHT};
use exifcard_card_model::layout::LayoutConfig;
use exifcard_card_model::metadata::MetadataFields;
use exifcard_common::error::{CardError, CardResult};

use crate::encode::{encode_canvas, EncodedImage, OutputOptions};
use crate::source::SourceImage;
use crate::text::{draw_centered_line, fit_style, BitmapFace, TextStyle, Typeface};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Everything one compose call reads.
#[derive(Debug, Clone, Copy)]
pub struct ComposeRequest<'a> {
    /// The loaded photo, `None` until one is loaded.
    pub image: Option<&'a SourceImage>,
    pub metadata: &'a MetadataFields,
    pub layout: LayoutConfig,
}

impl<'a> ComposeRequest<'a> {
    pub fn new(image: &'a SourceImage, metadata: &'a MetadataFields, layout: LayoutConfig) -> Self {
        Self {
            image: Some(image),
            metadata,
            layout,
        }
    }

    fn source(&self) -> CardResult<&'a SourceImage> {
        self.image
            .ok_or_else(|| CardError::not_ready("no source image loaded"))
    }
}

/// Draws cards with a fixed typeface and output encoding.
#[derive(Clone)]
pub struct Compositor {
    typeface: Arc<dyn Typeface>,
    output: OutputOptions,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("typeface", &self.typeface.name())
            .field("output", &self.output)
            .finish()
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(Arc::new(BitmapFace::new()))
    }
}

impl Compositor {
    pub fn new(typeface: Arc<dyn Typeface>) -> Self {
        Self {
            typeface,
            output: OutputOptions::default(),
        }
    }

    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    pub fn output(&self) -> OutputOptions {
        self.output
    }

    pub fn typeface_name(&self) -> &str {
        self.typeface.name()
    }

    /// Resolve the canvas geometry for a request.
    pub fn geometry(&self, request: &ComposeRequest<'_>) -> CardResult<CanvasGeometry> {
        let (w, h) = request.source()?.dimensions()?;
        Ok(CanvasGeometry::compute(w, h, &request.layout))
    }

    /// Draw the card into a fresh canvas without encoding it.
    pub fn render(&self, request: &ComposeRequest<'_>) -> CardResult<RgbImage> {
        let source = request.source()?;
        let geometry = self.geometry(request)?;
        let layout = &request.layout;

        tracing::debug!(
            natural_width = source.natural_width(),
            natural_height = source.natural_height(),
            scale = geometry.scale,
            canvas_width = geometry.canvas_width,
            canvas_height = geometry.canvas_height,
            "Composing card"
        );

        let mut canvas =
            RgbImage::from_pixel(geometry.canvas_width, geometry.canvas_height, BACKGROUND);

        let scaled = scale_photo(source, &geometry);
        let (ox, oy) = geometry.image_origin();
        image::imageops::replace(&mut canvas, &scaled, ox as i64, oy as i64);

        // Text keeps inside the padding whenever the face can shrink enough.
        let text_width = geometry.canvas_width - 2 * geometry.padding;
        if layout.camera_visible() {
            self.draw_line(
                &mut canvas,
                geometry.camera_line_y(),
                CAMERA_LINE_HEIGHT,
                &request.metadata.camera_line(),
                &TextStyle::CAMERA,
                text_width,
            );
        }
        if layout.settings_visible() {
            self.draw_line(
                &mut canvas,
                geometry.settings_line_y(),
                SETTINGS_LINE_HEIGHT,
                &request.metadata.settings_line(),
                &TextStyle::SETTINGS,
                text_width,
            );
        }

        Ok(canvas)
    }

    fn draw_line(
        &self,
        canvas: &mut RgbImage,
        slot_y: u32,
        slot_height: u32,
        text: &str,
        style: &TextStyle,
        max_width: u32,
    ) {
        let face = self.typeface.as_ref();
        let fitted = fit_style(face, text, style, max_width);
        if fitted.size_px != style.size_px {
            tracing::debug!(
                text,
                nominal_px = style.size_px,
                fitted_px = fitted.size_px,
                max_width,
                "Shrunk metadata line to fit"
            );
        }
        draw_centered_line(face, canvas, slot_y, slot_height, text, &fitted);
    }

    /// Draw and encode the card.
    pub fn compose(&self, request: &ComposeRequest<'_>) -> CardResult<EncodedImage> {
        let canvas = self.render(request)?;
        let encoded = encode_canvas(&canvas, self.output)?;
        tracing::info!(
            width = encoded.width,
            height = encoded.height,
            bytes = encoded.bytes.len(),
            format = ?encoded.format,
            "Card composed"
        );
        Ok(encoded)
    }
}

/// Compose with the built-in face and maximum-quality JPEG output.
pub fn compose(
    image: Option<&SourceImage>,
    metadata: &MetadataFields,
    layout: LayoutConfig,
) -> CardResult<Vec<u8>> {
    let request = ComposeRequest {
        image,
        metadata,
        layout,
    };
    Ok(Compositor::default().compose(&request)?.bytes)
}

fn scale_photo(source: &SourceImage, geometry: &CanvasGeometry) -> RgbImage {
    let pixels = source.pixels();
    if pixels.dimensions() == (geometry.scaled_width, geometry.scaled_height) {
        return pixels.clone();
    }
    image::imageops::resize(
        pixels,
        geometry.scaled_width,
        geometry.scaled_height,
        FilterType::Lanczos3,
    )
}
