//! exifcard Render Engine
//!
//! Draws a photo card from a source image, its metadata fields and a
//! layout, then encodes the result.
//!
//! # Pipeline Architecture
//!
//! ```text
//! photo bytes ── decode ── orient ──┐
//!                                   ├── Scale (ScalePolicy)
//! layout ───────────────────────────┘         │
//!                                             ├── Pad onto white canvas
//! metadata fields ────────────────────────────┘         │
//!                                                       ├── Camera line
//!                                                       ├── Settings line
//!                                                       ▼
//!                                                Encode (JPEG q100)
//!                                                       │
//!                                                       ▼
//!                                                 exif-card.jpg
//! ```

pub mod compositor;
pub mod encode;
pub mod export;
pub mod source;
pub mod text;

pub use compositor::{compose, ComposeRequest, Compositor};
pub use encode::{encode_canvas, EncodedImage, OutputFormat, OutputOptions};
pub use export::*;
pub use source::SourceImage;
pub use text::{fit_style, load_typeface, BitmapFace, TextStyle, TrueTypeFace, Typeface};
