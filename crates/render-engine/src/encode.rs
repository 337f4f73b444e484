//! Serialization of the finished canvas.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::RgbImage;
use serde::{Deserialize, Serialize};

use exifcard_common::error::{CardError, CardResult};

/// Encoded output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Parse a user-supplied format name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// Format and quality for the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputOptions {
    pub format: OutputFormat,
    /// JPEG quality, 1-100. Ignored for PNG.
    pub quality: u8,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: 100,
        }
    }
}

/// An encoded card image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Encode an RGB canvas.
pub fn encode_canvas(canvas: &RgbImage, options: OutputOptions) -> CardResult<EncodedImage> {
    let mut buf = Cursor::new(Vec::new());

    match options.format {
        OutputFormat::Jpeg => {
            let quality = options.quality.clamp(1, 100);
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
            canvas
                .write_with_encoder(encoder)
                .map_err(|e| CardError::encode(format!("JPEG encode failed: {e}")))?;
        }
        OutputFormat::Png => {
            let encoder = PngEncoder::new(&mut buf);
            canvas
                .write_with_encoder(encoder)
                .map_err(|e| CardError::encode(format!("PNG encode failed: {e}")))?;
        }
    }

    Ok(EncodedImage {
        bytes: buf.into_inner(),
        format: options.format,
        width: canvas.width(),
        height: canvas.height(),
    })
}
