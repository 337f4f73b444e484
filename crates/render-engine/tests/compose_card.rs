use image::{Rgb, RgbImage};
use proptest::prelude::*;

use exifcard_card_model::geometry::{
    CanvasGeometry, CAMERA_LINE_HEIGHT, LINE_GAP, SETTINGS_LINE_HEIGHT, TEXT_BAND_HEIGHT,
    TEXT_MARGIN,
};
use exifcard_card_model::layout::{LayoutConfig, ScalePolicy};
use exifcard_card_model::metadata::MetadataFields;
use exifcard_card_model::tags::{TagMap, TagValue};
use exifcard_render_engine::{ComposeRequest, Compositor, SourceImage};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

fn gradient_photo(w: u32, h: u32) -> SourceImage {
    SourceImage::from_rgb(RgbImage::from_fn(w, h, |x, y| {
        Rgb([(x * 255 / w.max(1)) as u8, (y * 255 / h.max(1)) as u8, 96])
    }))
}

fn sample_fields() -> MetadataFields {
    let mut tags = TagMap::new();
    tags.insert("Make", TagValue::Text("SONY".into()));
    tags.insert("Model", TagValue::Text("ILCE-7M4".into()));
    tags.insert("FocalLength", TagValue::Rational { num: 50, denom: 1 });
    tags.insert("FNumber", TagValue::Rational { num: 18, denom: 10 });
    tags.insert("ExposureTime", TagValue::Rational { num: 1, denom: 125 });
    tags.insert("PhotographicSensitivity", TagValue::Integer(200));
    MetadataFields::from_tags(&tags)
}

fn render(src: &SourceImage, fields: &MetadataFields, layout: LayoutConfig) -> RgbImage {
    Compositor::default()
        .render(&ComposeRequest::new(src, fields, layout))
        .expect("render should succeed")
}

fn rows_equal(a: &RgbImage, b: &RgbImage, rows: std::ops::Range<u32>) -> bool {
    rows.into_iter()
        .all(|y| (0..a.width()).all(|x| a.get_pixel(x, y) == b.get_pixel(x, y)))
}

fn rows_blank(img: &RgbImage, rows: std::ops::Range<u32>) -> bool {
    rows.into_iter()
        .all(|y| (0..img.width()).all(|x| *img.get_pixel(x, y) == WHITE))
}

#[test]
fn compose_is_idempotent() {
    let src = gradient_photo(640, 427);
    let fields = sample_fields();
    let compositor = Compositor::default();
    let request = ComposeRequest::new(&src, &fields, LayoutConfig::new(24));

    let first = compositor.compose(&request).unwrap();
    let second = compositor.compose(&request).unwrap();
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn camera_toggle_removes_only_camera_line() {
    let src = gradient_photo(300, 200);
    let fields = sample_fields();
    let layout = LayoutConfig::new(20);
    let g = CanvasGeometry::compute(300, 200, &layout);

    let full = render(&src, &fields, layout);
    let mut no_camera_layout = layout;
    no_camera_layout.show_camera = false;
    let no_camera = render(&src, &fields, no_camera_layout);

    let camera_rows = g.camera_line_y()..g.camera_line_y() + CAMERA_LINE_HEIGHT;
    assert!(!rows_blank(&full, camera_rows.clone()));
    assert!(rows_blank(&no_camera, camera_rows.clone()));

    assert_eq!(full.dimensions(), no_camera.dimensions());
    assert!(rows_equal(&full, &no_camera, 0..camera_rows.start));
    assert!(rows_equal(&full, &no_camera, camera_rows.end..full.height()));
}

#[test]
fn settings_toggle_removes_only_settings_line() {
    let src = gradient_photo(300, 200);
    let fields = sample_fields();
    let layout = LayoutConfig::new(20);
    let g = CanvasGeometry::compute(300, 200, &layout);

    let full = render(&src, &fields, layout);
    let mut no_settings_layout = layout;
    no_settings_layout.show_settings = false;
    let no_settings = render(&src, &fields, no_settings_layout);

    let settings_rows = g.settings_line_y()..g.settings_line_y() + SETTINGS_LINE_HEIGHT;
    assert!(!rows_blank(&full, settings_rows.clone()));
    assert!(rows_blank(&no_settings, settings_rows.clone()));
    assert!(rows_equal(&full, &no_settings, 0..settings_rows.start));
    assert!(rows_equal(
        &full,
        &no_settings,
        settings_rows.end..full.height()
    ));
}

#[test]
fn text_band_layout_constants_are_consistent() {
    assert_eq!(
        TEXT_BAND_HEIGHT,
        CAMERA_LINE_HEIGHT + LINE_GAP + SETTINGS_LINE_HEIGHT
    );
    let g = CanvasGeometry::compute(100, 100, &LayoutConfig::new(0));
    assert_eq!(g.canvas_height, 100 + TEXT_MARGIN + TEXT_BAND_HEIGHT);
}

#[test]
fn large_photo_fits_default_box() {
    let src = SourceImage::from_rgb(RgbImage::new(4000, 3000));
    let fields = MetadataFields::default();
    let layout = LayoutConfig::new(30).with_scale(ScalePolicy::fit_within(800, 800));
    let g = Compositor::default()
        .geometry(&ComposeRequest::new(&src, &fields, layout))
        .unwrap();
    assert_eq!((g.scaled_width, g.scaled_height), (800, 600));
    assert_eq!(g.canvas_width, 800 + 2 * 30);
}

#[test]
fn missing_model_renders_placeholder() {
    let mut tags = TagMap::new();
    tags.insert("Make", TagValue::Text("Leica".into()));
    let fields = MetadataFields::from_tags(&tags);
    assert_eq!(fields.camera_line(), "Leica Unknown Model");

    let src = gradient_photo(120, 80);
    let canvas = render(&src, &fields, LayoutConfig::new(10));
    let g = CanvasGeometry::compute(120, 80, &LayoutConfig::new(10));
    assert!(!rows_blank(
        &canvas,
        g.camera_line_y()..g.camera_line_y() + CAMERA_LINE_HEIGHT
    ));
}

/// Text rows must leave the padding columns untouched.
fn assert_text_inside_padding(canvas: &RgbImage, g: &CanvasGeometry) {
    let rows = g.camera_line_y()..g.settings_line_y() + SETTINGS_LINE_HEIGHT;
    for y in rows {
        for x in (0..g.padding).chain(g.canvas_width - g.padding..g.canvas_width) {
            assert_eq!(
                *canvas.get_pixel(x, y),
                WHITE,
                "ink at ({x}, {y}) outside the text area"
            );
        }
    }
}

#[test]
fn long_camera_line_fits_portrait_card() {
    let mut tags = TagMap::new();
    tags.insert("Make", TagValue::Text("NIKON CORPORATION".into()));
    let fields = MetadataFields::from_tags(&tags);
    assert_eq!(fields.camera_line(), "NIKON CORPORATION Unknown Model");

    let src = gradient_photo(600, 800);
    let layout = LayoutConfig::default();
    let canvas = render(&src, &fields, layout);
    let g = CanvasGeometry::compute(600, 800, &layout);
    assert_eq!(g.canvas_width, 640);

    assert!(!rows_blank(
        &canvas,
        g.camera_line_y()..g.camera_line_y() + CAMERA_LINE_HEIGHT
    ));
    assert_text_inside_padding(&canvas, &g);
}

#[test]
fn placeholder_settings_line_fits_landscape_card() {
    let fields = MetadataFields::default();
    let src = gradient_photo(800, 600);
    let layout = LayoutConfig::default();
    let canvas = render(&src, &fields, layout);
    let g = CanvasGeometry::compute(800, 600, &layout);

    assert!(!rows_blank(
        &canvas,
        g.settings_line_y()..g.settings_line_y() + SETTINGS_LINE_HEIGHT
    ));
    assert_text_inside_padding(&canvas, &g);
}

#[test]
fn png_output_is_lossless() {
    use exifcard_render_engine::{OutputFormat, OutputOptions};

    let src = gradient_photo(64, 48);
    let fields = sample_fields();
    let compositor = Compositor::default().with_output(OutputOptions {
        format: OutputFormat::Png,
        quality: 100,
    });
    let request = ComposeRequest::new(&src, &fields, LayoutConfig::new(6));

    let encoded = compositor.compose(&request).unwrap();
    let decoded = image::load_from_memory(&encoded.bytes).unwrap().to_rgb8();
    assert_eq!(decoded, compositor.render(&request).unwrap());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn rendered_canvas_matches_formula(
        w in 1u32..120,
        h in 1u32..120,
        padding in 0u32..=100,
        show in any::<bool>(),
    ) {
        let src = gradient_photo(w, h);
        let fields = MetadataFields::default();
        let mut layout = LayoutConfig::new(padding);
        layout.show_metadata = show;
        let canvas = render(&src, &fields, layout);
        let g = CanvasGeometry::compute(w, h, &layout);

        prop_assert_eq!(canvas.width(), g.scaled_width + 2 * padding);
        prop_assert_eq!(
            canvas.height(),
            g.scaled_height + g.text_band + 2 * padding + g.text_margin
        );
    }
}
