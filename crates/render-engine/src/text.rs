//! Text rasterization for the metadata lines.
//!
//! Two faces are available behind the [`Typeface`] trait:
//! - [`BitmapFace`]: the built-in 8×8 bitmap font, scaled by whole pixels.
//!   Always available and byte-for-byte deterministic.
//! - [`TrueTypeFace`]: any TrueType/OpenType file, rasterized with
//!   anti-aliasing.
//!
//! Lines wider than the available width are drawn in the largest smaller
//! size that fits (see [`fit_style`]); anything still too wide clips at the
//! canvas edges.

use std::path::Path;

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use rusttype::{point, Font, Scale};

use exifcard_common::error::{CardError, CardResult};

/// Size, weight and color of one line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Nominal glyph height in pixels.
    pub size_px: f32,
    pub bold: bool,
    pub color: Rgb<u8>,
}

impl TextStyle {
    /// Large bold black: the `"<make> <model>"` line.
    pub const CAMERA: TextStyle = TextStyle {
        size_px: 24.0,
        bold: true,
        color: Rgb([0, 0, 0]),
    };

    /// Small gray: the exposure settings line.
    pub const SETTINGS: TextStyle = TextStyle {
        size_px: 14.0,
        bold: false,
        color: Rgb([0x4B, 0x55, 0x63]),
    };
}

/// Pixel extent of a rendered string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
}

/// A face that can measure and draw a single line of text.
pub trait Typeface: Send + Sync {
    /// Extent of `text` in `style`.
    fn measure(&self, text: &str, style: &TextStyle) -> TextExtent;

    /// Draw `text` with its top-left corner at `(x, y)`.
    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, style: &TextStyle);

    /// The next smaller size this face can render `style` at, or `None`
    /// at the smallest size.
    fn smaller(&self, style: &TextStyle) -> Option<TextStyle>;

    /// Face name for logs.
    fn name(&self) -> &str;
}

/// Shrink `style` until `text` fits in `max_width` or the face has no
/// smaller size.
pub fn fit_style(face: &dyn Typeface, text: &str, style: &TextStyle, max_width: u32) -> TextStyle {
    let mut fitted = *style;
    while face.measure(text, &fitted).width > max_width {
        match face.smaller(&fitted) {
            Some(next) => fitted = next,
            None => break,
        }
    }
    fitted
}

/// Draw `text` horizontally centered on the canvas and vertically centered
/// in the slot `[slot_y, slot_y + slot_height)`.
pub fn draw_centered_line(
    face: &dyn Typeface,
    canvas: &mut RgbImage,
    slot_y: u32,
    slot_height: u32,
    text: &str,
    style: &TextStyle,
) {
    let extent = face.measure(text, style);
    let x = (canvas.width() as i64 - extent.width as i64) / 2;
    let y = slot_y as i64 + (slot_height as i64 - extent.height as i64) / 2;
    face.draw(canvas, x as i32, y as i32, text, style);
}

const GLYPH_CELLS: u32 = 8;

/// The built-in 8×8 bitmap font.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitmapFace;

impl BitmapFace {
    pub fn new() -> Self {
        Self
    }

    /// Whole-pixel magnification for a nominal size.
    fn pixel_scale(style: &TextStyle) -> u32 {
        ((style.size_px / GLYPH_CELLS as f32).round() as u32).max(1)
    }

    fn glyph(ch: char) -> [u8; 8] {
        BASIC_FONTS
            .get(ch)
            .or_else(|| LATIN_FONTS.get(ch))
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8])
    }
}

impl Typeface for BitmapFace {
    fn measure(&self, text: &str, style: &TextStyle) -> TextExtent {
        let scale = Self::pixel_scale(style);
        let chars = text.chars().count() as u32;
        let mut width = chars * GLYPH_CELLS * scale;
        if style.bold && chars > 0 {
            width += 1;
        }
        TextExtent {
            width,
            height: GLYPH_CELLS * scale,
        }
    }

    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, style: &TextStyle) {
        let scale = Self::pixel_scale(style);
        let advance = (GLYPH_CELLS * scale) as i32;
        // Double strike one pixel to the right for bold.
        let strikes: &[i32] = if style.bold { &[0, 1] } else { &[0] };

        for (i, ch) in text.chars().enumerate() {
            let glyph = Self::glyph(ch);
            let origin_x = x + i as i32 * advance;
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH_CELLS {
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    for dx in strikes {
                        let rect = Rect::at(
                            origin_x + (col * scale) as i32 + dx,
                            y + (row as u32 * scale) as i32,
                        )
                        .of_size(scale, scale);
                        draw_filled_rect_mut(canvas, rect, style.color);
                    }
                }
            }
        }
    }

    fn smaller(&self, style: &TextStyle) -> Option<TextStyle> {
        let scale = Self::pixel_scale(style);
        (scale > 1).then(|| TextStyle {
            size_px: ((scale - 1) * GLYPH_CELLS) as f32,
            ..*style
        })
    }

    fn name(&self) -> &str {
        "builtin-8x8"
    }
}

/// A TrueType/OpenType face.
pub struct TrueTypeFace {
    font: Font<'static>,
    name: String,
}

impl std::fmt::Debug for TrueTypeFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrueTypeFace").field("name", &self.name).finish()
    }
}

impl TrueTypeFace {
    /// Parse font data.
    pub fn from_bytes(data: Vec<u8>, name: impl Into<String>) -> CardResult<Self> {
        let name = name.into();
        let font = Font::try_from_vec(data)
            .ok_or_else(|| CardError::config(format!("{name} is not a usable font file")))?;
        Ok(Self { font, name })
    }

    /// Load a font file from disk.
    pub fn load(path: &Path) -> CardResult<Self> {
        if !path.exists() {
            return Err(CardError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let data = std::fs::read(path)?;
        Self::from_bytes(data, path.display().to_string())
    }

    fn layout_width(&self, text: &str, scale: Scale) -> f32 {
        let mut width: f32 = 0.0;
        let mut last = None;
        for ch in text.chars() {
            let glyph = self.font.glyph(ch).scaled(scale);
            if let Some(prev) = last {
                width += self.font.pair_kerning(scale, prev, glyph.id());
            }
            width += glyph.h_metrics().advance_width;
            last = Some(glyph.id());
        }
        width
    }
}

impl Typeface for TrueTypeFace {
    fn measure(&self, text: &str, style: &TextStyle) -> TextExtent {
        let scale = Scale::uniform(style.size_px);
        let v = self.font.v_metrics(scale);
        let mut width = self.layout_width(text, scale).ceil() as u32;
        if style.bold && !text.is_empty() {
            width += 1;
        }
        TextExtent {
            width,
            height: (v.ascent - v.descent).ceil().max(0.0) as u32,
        }
    }

    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, style: &TextStyle) {
        let scale = Scale::uniform(style.size_px);
        let v = self.font.v_metrics(scale);
        let strikes: &[f32] = if style.bold { &[0.0, 1.0] } else { &[0.0] };

        for dx in strikes {
            let start = point(x as f32 + dx, y as f32 + v.ascent);
            for glyph in self.font.layout(text, scale, start) {
                let Some(bb) = glyph.pixel_bounding_box() else {
                    continue;
                };
                glyph.draw(|gx, gy, coverage| {
                    let px = gx as i32 + bb.min.x;
                    let py = gy as i32 + bb.min.y;
                    blend_pixel(canvas, px, py, style.color, coverage);
                });
            }
        }
    }

    fn smaller(&self, style: &TextStyle) -> Option<TextStyle> {
        smaller_outline_size(style.size_px).map(|size_px| TextStyle { size_px, ..*style })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Smallest size an outline face is shrunk to.
const MIN_OUTLINE_SIZE_PX: f32 = 6.0;

fn smaller_outline_size(size_px: f32) -> Option<f32> {
    (size_px > MIN_OUTLINE_SIZE_PX).then(|| (size_px - 1.0).max(MIN_OUTLINE_SIZE_PX))
}

/// Alpha-blend `color` over the pixel at `(x, y)`; out-of-bounds is a no-op.
fn blend_pixel(canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }
    let a = coverage.clamp(0.0, 1.0);
    if a == 0.0 {
        return;
    }
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    for c in 0..3 {
        let blended = color.0[c] as f32 * a + dst.0[c] as f32 * (1.0 - a);
        dst.0[c] = blended.round() as u8;
    }
}

/// Open the configured face: the TrueType file when `path` is set,
/// otherwise the built-in bitmap face.
pub fn load_typeface(path: Option<&Path>) -> CardResult<Box<dyn Typeface>> {
    match path {
        Some(path) => {
            let face = TrueTypeFace::load(path)?;
            tracing::debug!(font = %path.display(), "loaded TrueType face");
            Ok(Box::new(face))
        }
        None => Ok(Box::new(BitmapFace::new())),
    }
}
