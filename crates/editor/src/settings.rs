//! Mapping persisted configuration onto the card model.

use std::sync::Arc;

use exifcard_card_model::layout::{LayoutConfig, ScalePolicy};
use exifcard_common::config::{AppConfig, LayoutDefaults, OutputDefaults, ScalingDefaults};
use exifcard_common::error::{CardError, CardResult};
use exifcard_exif_reader::KamadakDecoder;
use exifcard_render_engine::{load_typeface, Compositor, OutputFormat, OutputOptions};

use crate::session::EditorSession;

/// Resolve the scaling policy. A fixed factor, when set, wins over the box.
pub fn scale_policy(scaling: &ScalingDefaults) -> CardResult<ScalePolicy> {
    match scaling.fixed_factor {
        Some(factor) if factor.is_finite() && factor > 0.0 => Ok(ScalePolicy::Fixed { factor }),
        Some(factor) => Err(CardError::config(format!(
            "scaling.fixed_factor must be positive, got {factor}"
        ))),
        None if scaling.max_width == 0 || scaling.max_height == 0 => Err(CardError::config(
            "scaling.max_width and scaling.max_height must be non-zero",
        )),
        None => Ok(ScalePolicy::fit_within(scaling.max_width, scaling.max_height)),
    }
}

/// Build the initial layout. Padding above the maximum is clamped.
pub fn layout_config(layout: &LayoutDefaults, scaling: &ScalingDefaults) -> CardResult<LayoutConfig> {
    let mut config = LayoutConfig::new(layout.padding).with_scale(scale_policy(scaling)?);
    config.show_metadata = layout.show_metadata;
    config.show_camera = layout.show_camera;
    config.show_settings = layout.show_settings;
    Ok(config)
}

pub fn output_options(output: &OutputDefaults) -> CardResult<OutputOptions> {
    let format = OutputFormat::parse(&output.format).ok_or_else(|| {
        CardError::config(format!(
            "unsupported output.format {:?} (expected \"jpeg\" or \"png\")",
            output.format
        ))
    })?;
    Ok(OutputOptions {
        format,
        quality: output.quality.clamp(1, 100),
    })
}

/// Build a session from configuration, using the EXIF decoder and the
/// configured typeface.
pub fn session_from_config(config: &AppConfig) -> CardResult<EditorSession> {
    let layout = layout_config(&config.layout, &config.scaling)?;
    let output = output_options(&config.output)?;
    let typeface = load_typeface(config.font.path.as_deref())?;
    let compositor = Compositor::new(Arc::from(typeface)).with_output(output);

    tracing::debug!(
        padding = layout.padding(),
        scale = ?layout.scale,
        format = ?output.format,
        typeface = compositor.typeface_name(),
        "Editor session configured"
    );

    Ok(EditorSession::new(
        Arc::new(KamadakDecoder),
        compositor,
        layout,
    ))
}
