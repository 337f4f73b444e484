//! Decoded EXIF tags as a name → value mapping.
//!
//! The decoder collaborator fills a [`TagMap`]; everything downstream treats
//! it as read-only and must tolerate any key being absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single decoded tag value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum TagValue {
    /// ASCII / UTF-8 text (make, model, dates).
    Text(String),
    /// Unsigned integer (ISO, orientation).
    Integer(u32),
    /// Unsigned rational (exposure time, f-number, focal length).
    Rational { num: u32, denom: u32 },
}

impl TagValue {
    /// Numeric view of the value.
    ///
    /// Returns `None` for text that does not parse, zero denominators and
    /// anything non-finite.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            TagValue::Text(s) => s.trim().parse::<f64>().ok()?,
            TagValue::Integer(n) => *n as f64,
            TagValue::Rational { num, denom } => {
                if *denom == 0 {
                    return None;
                }
                *num as f64 / *denom as f64
            }
        };
        v.is_finite().then_some(v)
    }

    /// Text view of the value, trimmed of padding and NULs.
    ///
    /// Returns `None` when the trimmed text is empty.
    pub fn as_text(&self) -> Option<String> {
        let s = match self {
            TagValue::Text(s) => s.trim_matches(|c: char| c == '\0' || c.is_whitespace()).to_string(),
            TagValue::Integer(n) => n.to_string(),
            TagValue::Rational { num, denom } => format!("{num}/{denom}"),
        };
        (!s.is_empty()).then_some(s)
    }
}

/// Mapping of EXIF tag name (e.g. `"Make"`, `"FNumber"`) to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagMap {
    entries: BTreeMap<String, TagValue>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag. The first value seen for a name wins, matching the
    /// decoder's primary-IFD-first iteration order.
    pub fn insert(&mut self, name: impl Into<String>, value: TagValue) {
        self.entries.entry(name.into()).or_insert(value);
    }

    pub fn get(&self, name: &str) -> Option<&TagValue> {
        self.entries.get(name)
    }

    /// First present tag among `names`.
    pub fn get_any(&self, names: &[&str]) -> Option<&TagValue> {
        names.iter().find_map(|name| self.entries.get(*name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, TagValue)> for TagMap {
    fn from_iter<I: IntoIterator<Item = (String, TagValue)>>(iter: I) -> Self {
        let mut map = TagMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}
