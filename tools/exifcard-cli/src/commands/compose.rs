//! Compose a card from a photo.

use std::path::{Path, PathBuf};

use exifcard_common::config::AppConfig;
use exifcard_editor::{output_options, resolve_output_path, session_from_config};
use exifcard_render_engine::output_path_in;

use crate::ComposeArgs;

pub async fn run(mut config: AppConfig, args: ComposeArgs) -> anyhow::Result<()> {
    apply_overrides(&mut config, &args);

    let mut session = session_from_config(&config)
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    let photo = session
        .load_file(&args.input)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load {}: {e}", args.input.display()))?;

    println!("Photo: {}", args.input.display());
    println!(
        "  Size: {}x{}",
        photo.image.natural_width(),
        photo.image.natural_height()
    );
    if photo.has_metadata() {
        let fields = photo.fields();
        println!("  Camera: {}", fields.camera_line());
        println!("  Settings: {}", fields.settings_line());
        for fallback in photo.fallbacks() {
            tracing::debug!(field = ?fallback.field, reason = %fallback.reason, "Using placeholder");
        }
    } else {
        println!("  No EXIF metadata found; placeholders will be shown");
    }

    let format = output_options(&config.output)?.format;
    let default_name = output_path_in(Path::new(""), &config.output.file_name, format);
    let output_path: PathBuf = resolve_output_path(args.output.as_deref(), &default_name);

    let outcome = session
        .export(&output_path)
        .await
        .map_err(|e| anyhow::anyhow!("Compose failed: {e}"))?;

    println!();
    println!("Card written: {}", outcome.path.display());
    println!(
        "  {}x{} {} ({} bytes)",
        outcome.width, outcome.height, outcome.content_type, outcome.bytes_written
    );

    Ok(())
}

/// Fold command-line flags over the loaded configuration.
fn apply_overrides(config: &mut AppConfig, args: &ComposeArgs) {
    if let Some(padding) = args.padding {
        config.layout.padding = padding;
    }
    if args.no_metadata {
        config.layout.show_metadata = false;
    }
    if args.hide_camera {
        config.layout.show_camera = false;
    }
    if args.hide_settings {
        config.layout.show_settings = false;
    }
    if args.half {
        config.scaling.fixed_factor = Some(0.5);
    } else if args.max_width.is_some() || args.max_height.is_some() {
        config.scaling.fixed_factor = None;
    }
    if let Some(w) = args.max_width {
        config.scaling.max_width = w;
    }
    if let Some(h) = args.max_height {
        config.scaling.max_height = h;
    }
    if let Some(format) = &args.format {
        config.output.format = format.clone();
    }
    if let Some(font) = &args.font {
        config.font.path = Some(font.clone());
    }
}
