//! exifcard Editor
//!
//! Holds the per-user editing state: the loaded photo, the metadata derived
//! from it once at load time, and the layout the user keeps adjusting. A
//! session composes on demand and never caches the result.

pub mod session;
pub mod settings;

pub use session::{resolve_output_path, EditorSession, LoadedPhoto};
pub use settings::{layout_config, output_options, scale_policy, session_from_config};
