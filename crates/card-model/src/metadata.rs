//! Display-ready metadata fields derived from decoded EXIF tags.
//!
//! Every field always holds a renderable string: values absent from the tag
//! map, or values that cannot be formatted (zero divisors, non-finite
//! numbers), are replaced by a fixed `"Unknown <Field>"` placeholder. Each
//! substitution is recorded as a [`FieldFallback`] so callers can report it,
//! but none of them is an error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tags::{TagMap, TagValue};

/// Tag names consulted for each field, in priority order.
pub const MAKE_TAGS: &[&str] = &["Make"];
pub const MODEL_TAGS: &[&str] = &["Model"];
pub const FOCAL_LENGTH_TAGS: &[&str] = &["FocalLength"];
pub const APERTURE_TAGS: &[&str] = &["FNumber"];
pub const EXPOSURE_TIME_TAGS: &[&str] = &["ExposureTime"];
pub const ISO_TAGS: &[&str] = &["PhotographicSensitivity", "ISOSpeedRatings"];

/// The six metadata fields shown on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Manufacturer,
    Model,
    FocalLength,
    Aperture,
    ShutterSpeed,
    Iso,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Manufacturer,
        Field::Model,
        Field::FocalLength,
        Field::Aperture,
        Field::ShutterSpeed,
        Field::Iso,
    ];

    /// Placeholder text used when the field cannot be derived.
    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Manufacturer => "Unknown Manufacturer",
            Field::Model => "Unknown Model",
            Field::FocalLength => "Unknown Focal Length",
            Field::Aperture => "Unknown Aperture",
            Field::ShutterSpeed => "Unknown Shutter Speed",
            Field::Iso => "Unknown ISO",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Manufacturer => "Manufacturer",
            Field::Model => "Model",
            Field::FocalLength => "Focal length",
            Field::Aperture => "Aperture",
            Field::ShutterSpeed => "Shutter speed",
            Field::Iso => "ISO",
        }
    }
}

/// Why a field fell back to its placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No tag for the field was present.
    Missing,
    /// The tag was present but held no usable number or text.
    Unreadable,
    /// The value would have been divided by zero.
    ZeroDivisor,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Missing => f.write_str("tag missing"),
            FallbackReason::Unreadable => f.write_str("value unreadable"),
            FallbackReason::ZeroDivisor => f.write_str("zero divisor"),
        }
    }
}

/// A placeholder substitution made while deriving [`MetadataFields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFallback {
    pub field: Field,
    pub reason: FallbackReason,
}

/// Renderable metadata strings. Immutable once derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFields {
    pub manufacturer: String,
    pub model: String,
    pub focal_length: String,
    pub aperture: String,
    pub shutter_speed: String,
    pub iso: String,
}

impl Default for MetadataFields {
    /// All placeholders.
    fn default() -> Self {
        Self {
            manufacturer: Field::Manufacturer.placeholder().to_string(),
            model: Field::Model.placeholder().to_string(),
            focal_length: Field::FocalLength.placeholder().to_string(),
            aperture: Field::Aperture.placeholder().to_string(),
            shutter_speed: Field::ShutterSpeed.placeholder().to_string(),
            iso: Field::Iso.placeholder().to_string(),
        }
    }
}

/// Result of deriving fields from a tag map.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetadata {
    pub fields: MetadataFields,
    pub fallbacks: Vec<FieldFallback>,
}

impl MetadataFields {
    /// Derive fields, discarding the fallback report.
    pub fn from_tags(tags: &TagMap) -> Self {
        Self::derive(tags).fields
    }

    /// Derive fields and report every placeholder substitution.
    pub fn derive(tags: &TagMap) -> DerivedMetadata {
        let mut fallbacks = Vec::new();
        let mut resolve = |field: Field, value: Result<String, FallbackReason>| match value {
            Ok(v) => v,
            Err(reason) => {
                tracing::debug!(field = ?field, reason = %reason, "metadata field uses placeholder");
                fallbacks.push(FieldFallback { field, reason });
                field.placeholder().to_string()
            }
        };

        let fields = MetadataFields {
            manufacturer: resolve(Field::Manufacturer, text_field(tags, MAKE_TAGS)),
            model: resolve(Field::Model, text_field(tags, MODEL_TAGS)),
            focal_length: resolve(
                Field::FocalLength,
                numeric_field(tags, FOCAL_LENGTH_TAGS).map(|v| format!("{}mm", format_number(v))),
            ),
            aperture: resolve(
                Field::Aperture,
                numeric_field(tags, APERTURE_TAGS).map(|v| format!("f/{}", format_number(v))),
            ),
            shutter_speed: resolve(Field::ShutterSpeed, shutter_field(tags)),
            iso: resolve(
                Field::Iso,
                numeric_field(tags, ISO_TAGS).map(|v| format!("ISO {}", format_number(v))),
            ),
        };

        DerivedMetadata { fields, fallbacks }
    }

    /// The value shown for `field`.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Manufacturer => &self.manufacturer,
            Field::Model => &self.model,
            Field::FocalLength => &self.focal_length,
            Field::Aperture => &self.aperture,
            Field::ShutterSpeed => &self.shutter_speed,
            Field::Iso => &self.iso,
        }
    }

    /// `"<manufacturer> <model>"`.
    pub fn camera_line(&self) -> String {
        format!("{} {}", self.manufacturer, self.model)
    }

    /// `"<focal> <aperture> <shutter> <iso>"`.
    pub fn settings_line(&self) -> String {
        format!(
            "{} {} {} {}",
            self.focal_length, self.aperture, self.shutter_speed, self.iso
        )
    }
}

fn text_field(tags: &TagMap, names: &[&str]) -> Result<String, FallbackReason> {
    let value = tags.get_any(names).ok_or(FallbackReason::Missing)?;
    value.as_text().ok_or(FallbackReason::Unreadable)
}

fn numeric_field(tags: &TagMap, names: &[&str]) -> Result<f64, FallbackReason> {
    let value = tags.get_any(names).ok_or(FallbackReason::Missing)?;
    match value {
        TagValue::Rational { denom: 0, .. } => Err(FallbackReason::ZeroDivisor),
        other => other.as_f64().ok_or(FallbackReason::Unreadable),
    }
}

fn shutter_field(tags: &TagMap) -> Result<String, FallbackReason> {
    let seconds = numeric_field(tags, EXPOSURE_TIME_TAGS)?;
    format_shutter_speed(seconds)
}

/// Format an exposure time in seconds as `1/<round(1/t)>s`.
///
/// Zero, negative and non-finite times are rejected. Exposures long enough
/// that the reciprocal rounds to zero are written in whole seconds instead.
pub fn format_shutter_speed(seconds: f64) -> Result<String, FallbackReason> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(FallbackReason::Unreadable);
    }
    if seconds == 0.0 {
        return Err(FallbackReason::ZeroDivisor);
    }
    let reciprocal = (1.0 / seconds).round();
    if !reciprocal.is_finite() {
        return Err(FallbackReason::Unreadable);
    }
    if reciprocal < 1.0 {
        return Ok(format!("{}s", format_number(seconds)));
    }
    Ok(format!("1/{}s", reciprocal as u64))
}

/// One decimal place at most, without a trailing `.0`.
pub fn format_number(value: f64) -> String {
    let s = format!("{value:.1}");
    match s.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => s,
    }
}
