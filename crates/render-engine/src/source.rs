//! Decoded source photos.

use std::io::Cursor;

use image::{DynamicImage, ImageReader, Rgb, RgbImage};

use exifcard_card_model::orientation::Orientation;
use exifcard_common::error::{CardError, CardResult};

/// Background that transparent source pixels are flattened onto.
const FLATTEN_BACKGROUND: [u8; 3] = [255, 255, 255];

/// An upright RGB photo with its natural size. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: RgbImage,
}

impl SourceImage {
    /// Decode an encoded image (format sniffed from content).
    pub fn from_bytes(bytes: &[u8]) -> CardResult<Self> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CardError::image_decode(format!("failed to guess format: {e}")))?;
        let format = reader.format();
        let img = reader
            .decode()
            .map_err(|e| CardError::image_decode(format!("decode failed: {e}")))?;

        tracing::debug!(
            format = ?format,
            width = img.width(),
            height = img.height(),
            "decoded source image"
        );
        Ok(Self::from_dynamic(&img))
    }

    /// Wrap a decoded image, flattening any alpha onto white.
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        let pixels = if img.color().has_alpha() {
            flatten_alpha(img)
        } else {
            img.to_rgb8()
        };
        Self { pixels }
    }

    pub fn from_rgb(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    /// Rotate/flip into the upright orientation recorded in EXIF.
    pub fn oriented(self, orientation: Orientation) -> Self {
        if orientation == Orientation::Normal {
            return self;
        }
        let img = &self.pixels;
        let pixels = match orientation {
            Orientation::Normal => img.clone(),
            Orientation::FlipHorizontal => image::imageops::flip_horizontal(img),
            Orientation::Rotate180 => image::imageops::rotate180(img),
            Orientation::FlipVertical => image::imageops::flip_vertical(img),
            Orientation::Transpose => {
                image::imageops::flip_horizontal(&image::imageops::rotate90(img))
            }
            Orientation::Rotate90 => image::imageops::rotate90(img),
            Orientation::Transverse => {
                image::imageops::flip_horizontal(&image::imageops::rotate270(img))
            }
            Orientation::Rotate270 => image::imageops::rotate270(img),
        };
        Self { pixels }
    }

    pub fn natural_width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn natural_height(&self) -> u32 {
        self.pixels.height()
    }

    /// Natural dimensions, or `NotReady` when either is zero.
    pub fn dimensions(&self) -> CardResult<(u32, u32)> {
        let (w, h) = self.pixels.dimensions();
        if w == 0 || h == 0 {
            return Err(CardError::not_ready(format!(
                "source image has no pixels ({w}x{h})"
            )));
        }
        Ok((w, h))
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }
}

fn flatten_alpha(img: &DynamicImage) -> RgbImage {
    let rgba = img.to_rgba8();
    let [br, bg, bb] = FLATTEN_BACKGROUND;
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let a = a as u32;
        let mix = |fg: u8, bg: u8| ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8;
        Rgb([mix(r, br), mix(g, bg), mix(b, bb)])
    })
}
