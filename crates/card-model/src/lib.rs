//! exifcard Card Model
//!
//! Defines the core data contracts for a photo card:
//! - **Tags:** The decoded EXIF name → value mapping
//! - **Metadata:** The six display fields, with placeholder substitution
//! - **Orientation:** The EXIF rotation/flip applied before layout
//! - **Layout:** Padding, visibility switches and scaling policy
//! - **Geometry:** The resolved pixel layout of the output canvas
//!
//! Nothing here touches pixels; the render engine draws into the
//! geometry this crate computes.

pub mod geometry;
pub mod layout;
pub mod metadata;
pub mod orientation;
pub mod tags;

pub use geometry::*;
pub use layout::*;
pub use metadata::*;
pub use orientation::*;
pub use tags::*;
