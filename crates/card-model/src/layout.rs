//! User-adjustable layout settings for a card.

use serde::{Deserialize, Serialize};

/// Largest padding accepted, in pixels.
pub const MAX_PADDING: u32 = 100;

/// Padding, visibility and scaling choices for one compose call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Padding around the photo in pixels, `0..=MAX_PADDING`.
    padding: u32,

    /// Master switch for all metadata text.
    pub show_metadata: bool,

    /// Draw the `"<make> <model>"` line.
    pub show_camera: bool,

    /// Draw the exposure settings line.
    pub show_settings: bool,

    /// How the photo is scaled onto the canvas.
    #[serde(default)]
    pub scale: ScalePolicy,
}

impl LayoutConfig {
    /// Create a layout; `padding` is clamped to `0..=MAX_PADDING`.
    pub fn new(padding: u32) -> Self {
        Self {
            padding: padding.min(MAX_PADDING),
            ..Self::default()
        }
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Set the padding, clamping to `0..=MAX_PADDING`.
    pub fn set_padding(&mut self, padding: u32) {
        self.padding = padding.min(MAX_PADDING);
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.set_padding(padding);
        self
    }

    pub fn with_scale(mut self, scale: ScalePolicy) -> Self {
        self.scale = scale;
        self
    }

    /// Whether the camera line is actually drawn.
    pub fn camera_visible(&self) -> bool {
        self.show_metadata && self.show_camera
    }

    /// Whether the settings line is actually drawn.
    pub fn settings_visible(&self) -> bool {
        self.show_metadata && self.show_settings
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 20,
            show_metadata: true,
            show_camera: true,
            show_settings: true,
            scale: ScalePolicy::default(),
        }
    }
}

/// Scaling policy for the photo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScalePolicy {
    /// Largest scale that fits the box, never enlarging.
    FitWithin { max_width: u32, max_height: u32 },
    /// Constant factor in `(0, 1]`.
    Fixed { factor: f64 },
}

impl ScalePolicy {
    /// The fixed 50% reduction.
    pub const HALF: ScalePolicy = ScalePolicy::Fixed { factor: 0.5 };

    pub fn fit_within(max_width: u32, max_height: u32) -> Self {
        ScalePolicy::FitWithin {
            max_width: max_width.max(1),
            max_height: max_height.max(1),
        }
    }
}

impl Default for ScalePolicy {
    fn default() -> Self {
        ScalePolicy::FitWithin {
            max_width: 800,
            max_height: 800,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_is_clamped() {
        assert_eq!(LayoutConfig::new(250).padding(), MAX_PADDING);
        let mut layout = LayoutConfig::default();
        layout.set_padding(42);
        assert_eq!(layout.padding(), 42);
        layout.set_padding(101);
        assert_eq!(layout.padding(), 100);
    }

    #[test]
    fn test_line_visibility_respects_master_switch() {
        let mut layout = LayoutConfig::default();
        assert!(layout.camera_visible());
        assert!(layout.settings_visible());

        layout.show_camera = false;
        assert!(!layout.camera_visible());
        assert!(layout.settings_visible());

        layout.show_metadata = false;
        layout.show_camera = true;
        assert!(!layout.camera_visible());
        assert!(!layout.settings_visible());
    }

    #[test]
    fn test_scale_policy_serde_shape() {
        let json = serde_json::to_string(&ScalePolicy::HALF).unwrap();
        assert_eq!(json, r#"{"mode":"fixed","factor":0.5}"#);
        let parsed: ScalePolicy =
            serde_json::from_str(r#"{"mode":"fit_within","max_width":640,"max_height":480}"#)
                .unwrap();
        assert_eq!(parsed, ScalePolicy::fit_within(640, 480));
    }
}
