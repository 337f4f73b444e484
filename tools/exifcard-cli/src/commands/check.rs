//! Show the effective configuration.

use exifcard_common::config::{config_file_path, AppConfig};
use exifcard_editor::{layout_config, output_options};
use exifcard_render_engine::load_typeface;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("exifcard Configuration Check");
    println!("{}", "=".repeat(50));

    let path = config_file_path();
    if path.exists() {
        println!("[OK] Config file: {}", path.display());
    } else {
        println!("[INFO] Config file: {} (not found, using defaults)", path.display());
    }

    let mut all_ok = true;

    match layout_config(&config.layout, &config.scaling) {
        Ok(layout) => {
            println!("[OK] Padding: {}px", layout.padding());
            println!(
                "[OK] Metadata: {} (camera: {}, settings: {})",
                on_off(layout.show_metadata),
                on_off(layout.camera_visible()),
                on_off(layout.settings_visible())
            );
            println!("[OK] Scaling: {:?}", layout.scale);
        }
        Err(e) => {
            all_ok = false;
            println!("[FAIL] Layout: {e}");
        }
    }

    match output_options(&config.output) {
        Ok(output) => println!(
            "[OK] Output: {} as {:?} (quality {})",
            config.output.file_name, output.format, output.quality
        ),
        Err(e) => {
            all_ok = false;
            println!("[FAIL] Output: {e}");
        }
    }

    match load_typeface(config.font.path.as_deref()) {
        Ok(face) => println!("[OK] Font: {}", face.name()),
        Err(e) => {
            all_ok = false;
            println!("[FAIL] Font: {e}");
        }
    }

    println!();
    if all_ok {
        println!("Configuration is valid. exifcard is ready.");
    } else {
        println!("Configuration has errors. See above for details.");
    }

    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
