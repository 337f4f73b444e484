//! Canvas geometry for a card.
//!
//! All values are integer pixels. The relationships are fixed:
//!
//! ```text
//! canvas_width  = scaled_width  + 2 * padding
//! canvas_height = scaled_height + text_band + 2 * padding + text_margin
//! ```
//!
//! `text_band` and `text_margin` are both zero when metadata is hidden.

use serde::{Deserialize, Serialize};

use crate::layout::{LayoutConfig, ScalePolicy, MAX_PADDING};

/// Gap between the bottom of the photo and the first text line.
pub const TEXT_MARGIN: u32 = 16;
/// Vertical space reserved for the camera line.
pub const CAMERA_LINE_HEIGHT: u32 = 32;
/// Gap between the camera line and the settings line.
pub const LINE_GAP: u32 = 8;
/// Vertical space reserved for the settings line.
pub const SETTINGS_LINE_HEIGHT: u32 = 20;
/// Total height of the text band when metadata is shown.
pub const TEXT_BAND_HEIGHT: u32 = CAMERA_LINE_HEIGHT + LINE_GAP + SETTINGS_LINE_HEIGHT;

/// Resolved pixel layout for one compose call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasGeometry {
    /// Scale applied to the natural size.
    pub scale: f64,
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub padding: u32,
    pub text_band: u32,
    pub text_margin: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl CanvasGeometry {
    /// Resolve the geometry for a photo of `natural_width` × `natural_height`.
    ///
    /// Both natural dimensions must be non-zero; callers check this and
    /// report the image as not ready otherwise.
    pub fn compute(natural_width: u32, natural_height: u32, layout: &LayoutConfig) -> Self {
        let scale = scale_factor(natural_width, natural_height, layout.scale);
        let (scaled_width, scaled_height) = apply_scale(natural_width, natural_height, scale);
        let padding = layout.padding().min(MAX_PADDING);

        let (text_band, text_margin) = if layout.show_metadata {
            (TEXT_BAND_HEIGHT, TEXT_MARGIN)
        } else {
            (0, 0)
        };

        Self {
            scale,
            scaled_width,
            scaled_height,
            padding,
            text_band,
            text_margin,
            canvas_width: scaled_width + 2 * padding,
            canvas_height: scaled_height + text_band + 2 * padding + text_margin,
        }
    }

    /// Top-left corner of the photo on the canvas.
    pub fn image_origin(&self) -> (u32, u32) {
        (self.padding, self.padding)
    }

    /// Top of the camera line's slot.
    pub fn camera_line_y(&self) -> u32 {
        self.padding + self.scaled_height + self.text_margin
    }

    /// Top of the settings line's slot. Independent of the camera line's
    /// visibility.
    pub fn settings_line_y(&self) -> u32 {
        self.camera_line_y() + CAMERA_LINE_HEIGHT + LINE_GAP
    }
}

/// Scale factor for a policy, never enlarging.
pub fn scale_factor(natural_width: u32, natural_height: u32, policy: ScalePolicy) -> f64 {
    match policy {
        ScalePolicy::FitWithin {
            max_width,
            max_height,
        } => {
            let scale_w = max_width.max(1) as f64 / natural_width.max(1) as f64;
            let scale_h = max_height.max(1) as f64 / natural_height.max(1) as f64;
            scale_w.min(scale_h).min(1.0)
        }
        ScalePolicy::Fixed { factor } => {
            if factor.is_finite() && factor > 0.0 {
                factor.min(1.0)
            } else {
                1.0
            }
        }
    }
}

/// Apply a scale, rounding to whole pixels with a 1 px minimum.
pub fn apply_scale(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let new_w = (width as f64 * scale).round() as u32;
    let new_h = (height as f64 * scale).round() as u32;
    (new_w.max(1), new_h.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fit_within_landscape() {
        let layout = LayoutConfig::new(10);
        let g = CanvasGeometry::compute(4000, 3000, &layout);
        assert!((g.scale - 0.2).abs() < 1e-12);
        assert_eq!((g.scaled_width, g.scaled_height), (800, 600));
        assert_eq!(g.canvas_width, 800 + 20);
        assert_eq!(g.canvas_height, 600 + TEXT_BAND_HEIGHT + 20 + TEXT_MARGIN);
    }

    #[test]
    fn test_fit_within_never_enlarges() {
        let g = CanvasGeometry::compute(320, 240, &LayoutConfig::new(0));
        assert_eq!(g.scale, 1.0);
        assert_eq!((g.scaled_width, g.scaled_height), (320, 240));
    }

    #[test]
    fn test_fixed_half() {
        let layout = LayoutConfig::new(5).with_scale(ScalePolicy::HALF);
        let g = CanvasGeometry::compute(1001, 600, &layout);
        assert_eq!((g.scaled_width, g.scaled_height), (501, 300));
    }

    #[test]
    fn test_invalid_fixed_factor_is_identity() {
        assert_eq!(
            scale_factor(100, 100, ScalePolicy::Fixed { factor: f64::NAN }),
            1.0
        );
        assert_eq!(scale_factor(100, 100, ScalePolicy::Fixed { factor: 0.0 }), 1.0);
        assert_eq!(scale_factor(100, 100, ScalePolicy::Fixed { factor: 3.0 }), 1.0);
    }

    #[test]
    fn test_hidden_metadata_reserves_no_text_space() {
        let mut layout = LayoutConfig::new(12);
        layout.show_metadata = false;
        let g = CanvasGeometry::compute(400, 300, &layout);
        assert_eq!(g.text_band, 0);
        assert_eq!(g.text_margin, 0);
        assert_eq!(g.canvas_height, 300 + 24);
    }

    #[test]
    fn test_line_slots_fit_inside_band() {
        let g = CanvasGeometry::compute(400, 300, &LayoutConfig::new(20));
        assert_eq!(g.camera_line_y(), 20 + 300 + TEXT_MARGIN);
        assert_eq!(
            g.settings_line_y() + SETTINGS_LINE_HEIGHT,
            g.camera_line_y() + TEXT_BAND_HEIGHT
        );
        assert!(g.settings_line_y() + SETTINGS_LINE_HEIGHT <= g.canvas_height - g.padding);
    }

    #[test]
    fn test_apply_scale_minimum_pixel() {
        assert_eq!(apply_scale(10, 10, 0.01), (1, 1));
    }

    proptest! {
        #[test]
        fn canvas_matches_formula(
            width in 1u32..6000,
            height in 1u32..6000,
            padding in 0u32..=100,
            show in any::<bool>(),
            max_w in 1u32..2000,
            max_h in 1u32..2000,
        ) {
            let mut layout = LayoutConfig::new(padding)
                .with_scale(ScalePolicy::fit_within(max_w, max_h));
            layout.show_metadata = show;
            let g = CanvasGeometry::compute(width, height, &layout);

            prop_assert_eq!(g.canvas_width, g.scaled_width + 2 * padding);
            prop_assert_eq!(
                g.canvas_height,
                g.scaled_height + g.text_band + 2 * padding + g.text_margin
            );
            prop_assert!(g.scaled_width <= width && g.scaled_height <= height);
            prop_assert!(g.scaled_width <= max_w.max(1) || g.scaled_width == 1);
            prop_assert!(g.scaled_height <= max_h.max(1) || g.scaled_height == 1);
            if !show {
                prop_assert_eq!(g.text_band + g.text_margin, 0);
            }
        }
    }
}
